//! # Run Orchestrator
//!
//! Orchestratore principale: decide la modalità in base agli input
//! (singolo file, directory, lista di file), invoca il core e raccoglie
//! le statistiche.
//!
//! ## Modalità:
//! - **Singolo file**: output è un file, o una directory esistente
//! - **Directory**: walk ricorsivo, struttura replicata sotto l'output
//! - **Lista di file**: tutti i file in una directory, prefisso `compressed_`
//!
//! L'output è una progress bar + log, oppure righe JSON se `json_output`.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

use crate::batch::{self, PathResolver};
use crate::compressor::{CompressionResult, CompressionSettings, Compressor};
use crate::config::Config;
use crate::error::{CompressError, Result};
use crate::file_manager::FileManager;
use crate::json_output::JsonMessage;
use crate::progress::{CompressionStats, ProgressManager};

/// Runs one invocation of the tool
pub struct ShrinkRunner {
    config: Config,
    settings: CompressionSettings,
    compressor: Compressor,
}

impl ShrinkRunner {
    pub fn new(config: Config) -> Result<Self> {
        let settings = config.settings()?;
        let compressor = Compressor::new(config.retry_policy());
        Ok(Self {
            config,
            settings,
            compressor,
        })
    }

    /// Processes `inputs` into `output` and returns the aggregate statistics
    pub fn run(&self, inputs: &[PathBuf], output: &Path) -> Result<CompressionStats> {
        let start_time = Instant::now();

        let stats = match inputs {
            [] => return Err(CompressError::InvalidParameter("no input given".to_string())),
            [single] if single.is_dir() => self.run_directory(single, output)?,
            [single] => self.run_single(single, output)?,
            many => self.run_file_list(many, output)?,
        };

        if self.config.json_output {
            JsonMessage::complete(&stats, start_time.elapsed().as_secs_f64()).emit();
        } else {
            info!("{}", stats.format_summary());
        }
        Ok(stats)
    }

    fn run_single(&self, input: &Path, output: &Path) -> Result<CompressionStats> {
        if !input.exists() {
            return Err(CompressError::InputNotFound(input.to_path_buf()));
        }
        let output_path = PathResolver::single_output_path(input, output, self.settings.output_format)?;
        self.emit_start(&[input.to_path_buf()], &output_path, Some(1));

        let result = self.compressor.compress(&self.settings.request(input, &output_path));

        let mut stats = CompressionStats::new();
        self.report(&mut stats, input, Some(&output_path), &result);
        Ok(stats)
    }

    fn run_directory(&self, input_root: &Path, output_root: &Path) -> Result<CompressionStats> {
        let total_files = FileManager::find_image_files(input_root, Some(output_root)).len();
        self.emit_start(&[input_root.to_path_buf()], output_root, Some(total_files));

        let mut stats = CompressionStats::new();
        let progress = self.progress_manager(total_files as u64);
        for outcome in batch::walk(&self.compressor, input_root, output_root, self.settings)? {
            progress.update(&outcome.relative_path.display().to_string());
            self.report(&mut stats, &outcome.input_path, Some(&outcome.output_path), &outcome.result);
        }
        progress.finish(&stats.format_summary());

        Ok(stats)
    }

    fn run_file_list(&self, inputs: &[PathBuf], output_dir: &Path) -> Result<CompressionStats> {
        self.emit_start(inputs, output_dir, Some(inputs.len()));

        let mut stats = CompressionStats::new();
        let progress = self.progress_manager(inputs.len() as u64);
        for outcome in batch::compress_files(&self.compressor, inputs, output_dir, self.settings)? {
            progress.update(&outcome.input_path.display().to_string());
            self.report(&mut stats, &outcome.input_path, outcome.output_path.as_deref(), &outcome.result);
        }
        progress.finish(&stats.format_summary());

        Ok(stats)
    }

    fn progress_manager(&self, total_files: u64) -> ProgressManager {
        if self.config.json_output {
            ProgressManager::hidden(total_files)
        } else {
            ProgressManager::new(total_files)
        }
    }

    fn emit_start(&self, inputs: &[PathBuf], output: &Path, total_files: Option<usize>) {
        if self.config.json_output {
            JsonMessage::start(inputs.to_vec(), output.to_path_buf(), total_files, &self.config).emit();
        } else {
            info!(
                "Compressing to {} KB (min quality {}, {}) -> {}",
                self.config.target_size_kb,
                self.config.min_quality,
                self.config.output_format,
                output.display()
            );
        }
    }

    fn report(
        &self,
        stats: &mut CompressionStats,
        input: &Path,
        output: Option<&Path>,
        result: &Result<CompressionResult>,
    ) {
        match result {
            Ok(r) => stats.record(r),
            Err(e) => {
                stats.add_error();
                if !self.config.json_output {
                    error!("❌ {}: {}", input.display(), e);
                }
            }
        }
        if self.config.json_output {
            JsonMessage::file_complete(input, output, result).emit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::tests::noisy_rgb;
    use crate::format::OutputFormat;
    use image::ImageFormat;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> Config {
        Config {
            target_size_kb: 4,
            min_quality: 5,
            output_format: OutputFormat::Jpeg,
            write_retries: 0,
            retry_delay_ms: 0,
            json_output: true,
        }
    }

    #[test]
    fn test_single_file_into_directory() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("cat.png");
        noisy_rgb(64, 64, 8).save_with_format(&input, ImageFormat::Png).unwrap();
        let out = temp_dir.path().join("out");
        fs::create_dir_all(&out).unwrap();

        let stats = ShrinkRunner::new(config()).unwrap().run(&[input], &out).unwrap();

        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.errors, 0);
        assert!(out.join("cat.jpg").is_file());
    }

    #[test]
    fn test_directory_run_counts_failures() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        fs::create_dir_all(input.join("sub")).unwrap();
        noisy_rgb(64, 64, 1).save_with_format(input.join("a.png"), ImageFormat::Png).unwrap();
        noisy_rgb(64, 64, 2).save_with_format(input.join("sub/b.png"), ImageFormat::Png).unwrap();
        fs::write(input.join("sub/broken.webp"), vec![1u8; 9000]).unwrap();
        let out = temp_dir.path().join("out");

        let stats = ShrinkRunner::new(config()).unwrap().run(&[input], &out).unwrap();

        assert_eq!(stats.files_processed, 3);
        assert_eq!(stats.errors, 1);
        assert!(stats.has_failures());
        assert!(out.join("sub/b.jpg").is_file());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = Config {
            min_quality: 0,
            ..config()
        };
        assert!(matches!(ShrinkRunner::new(bad), Err(CompressError::InvalidParameter(_))));
    }

    #[test]
    fn test_missing_single_input() {
        let temp_dir = TempDir::new().unwrap();
        let runner = ShrinkRunner::new(config()).unwrap();
        let err = runner
            .run(&[temp_dir.path().join("nope.jpg")], temp_dir.path())
            .unwrap_err();
        assert!(matches!(err, CompressError::InputNotFound(_)));
    }

    #[test]
    fn test_file_list_run_writes_prefixed_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.png");
        let b = temp_dir.path().join("b.png");
        let notes = temp_dir.path().join("notes.txt");
        noisy_rgb(64, 64, 11).save_with_format(&a, ImageFormat::Png).unwrap();
        noisy_rgb(64, 64, 12).save_with_format(&b, ImageFormat::Png).unwrap();
        fs::write(&notes, b"not an image").unwrap();
        let out = temp_dir.path().join("compressed_images");

        let stats = ShrinkRunner::new(config()).unwrap().run(&[a, b, notes], &out).unwrap();

        assert_eq!(stats.files_processed, 3);
        assert_eq!(stats.errors, 1);
        assert!(out.join("compressed_a.jpg").is_file());
        assert!(out.join("compressed_b.jpg").is_file());
        assert!(!out.join("compressed_notes.jpg").exists());
    }
}

//! # Directory Walker
//!
//! Applica il compressore a un albero di immagini, replicando la struttura
//! delle directory sotto la root di output.
//!
//! Il walk è lazy: ogni chiamata a `next()` scopre e comprime un solo file.
//! Un errore su un file finisce nel suo `WalkOutcome` e non interrompe gli altri.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::batch::path_resolver::PathResolver;
use crate::compressor::{CompressionResult, CompressionSettings, Compressor};
use crate::error::{CompressError, Result};
use crate::file_manager::FileManager;
use crate::writer::OutputSink;

/// Outcome of one discovered image
#[derive(Debug)]
pub struct WalkOutcome {
    pub input_path: PathBuf,
    pub relative_path: PathBuf,
    pub output_path: PathBuf,
    pub result: Result<CompressionResult>,
}

/// Lazy, single-pass sequence of per-file outcomes
pub struct DirectoryWalk<'c, S> {
    compressor: &'c Compressor<S>,
    files: Box<dyn Iterator<Item = PathBuf>>,
    input_root: PathBuf,
    output_root: PathBuf,
    settings: CompressionSettings,
}

/// Starts a walk of `input_root`. The output root is created up-front and,
/// when it lies inside `input_root`, excluded from the walk.
pub fn walk<'c, S: OutputSink>(
    compressor: &'c Compressor<S>,
    input_root: &Path,
    output_root: &Path,
    settings: CompressionSettings,
) -> Result<DirectoryWalk<'c, S>> {
    settings.validate()?;
    if !input_root.is_dir() {
        return Err(CompressError::InputNotFound(input_root.to_path_buf()));
    }
    fs::create_dir_all(output_root)?;

    info!(
        "Walking {} -> {} (target {}, min quality {}, {})",
        input_root.display(),
        output_root.display(),
        FileManager::format_size(settings.target_size_bytes),
        settings.min_quality,
        settings.output_format
    );

    Ok(DirectoryWalk {
        compressor,
        files: Box::new(FileManager::image_files(input_root, Some(output_root))),
        input_root: input_root.to_path_buf(),
        output_root: output_root.to_path_buf(),
        settings,
    })
}

impl<S: OutputSink> Iterator for DirectoryWalk<'_, S> {
    type Item = WalkOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        let input_path = self.files.next()?;
        let relative_path = match PathResolver::relative_path(&input_path, &self.input_root) {
            Ok(rel) => rel,
            Err(_) => input_path.file_name().map(PathBuf::from).unwrap_or_default(),
        };
        let output_path =
            PathResolver::mirrored_output_path(&relative_path, &self.output_root, self.settings.output_format);

        info!("Processing {}", relative_path.display());
        let result = self
            .compressor
            .compress(&self.settings.request(&input_path, &output_path));
        if let Err(ref e) = result {
            error!("Failed to process {}: {}", relative_path.display(), e);
        }

        Some(WalkOutcome {
            input_path,
            relative_path,
            output_path,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::tests::noisy_rgb;
    use crate::format::OutputFormat;
    use crate::retry::RetryPolicy;
    use image::ImageFormat;
    use std::time::Duration;
    use tempfile::TempDir;

    fn settings(format: OutputFormat) -> CompressionSettings {
        CompressionSettings {
            target_size_bytes: 4 * 1024,
            min_quality: 5,
            output_format: format,
        }
    }

    #[test]
    fn test_walk_mirrors_tree_and_ignores_other_files() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        fs::create_dir_all(input.join("holiday/beach")).unwrap();

        noisy_rgb(64, 64, 1).save_with_format(input.join("a.png"), ImageFormat::Png).unwrap();
        noisy_rgb(64, 64, 2).save_with_format(input.join("holiday/b.jpg"), ImageFormat::Jpeg).unwrap();
        noisy_rgb(64, 64, 3)
            .save_with_format(input.join("holiday/beach/c.PNG"), ImageFormat::Png)
            .unwrap();
        fs::write(input.join("holiday/notes.txt"), b"not an image").unwrap();

        let compressor = Compressor::new(RetryPolicy::none());
        let outcomes: Vec<_> = walk(&compressor, &input, &output, settings(OutputFormat::Jpeg))
            .unwrap()
            .collect();

        assert_eq!(outcomes.len(), 3);
        let relative: Vec<_> = outcomes.iter().map(|o| o.relative_path.clone()).collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.png"),
                PathBuf::from("holiday/b.jpg"),
                PathBuf::from("holiday/beach/c.PNG"),
            ]
        );

        assert_eq!(outcomes[0].output_path, output.join("a.jpg"));
        assert_eq!(outcomes[1].output_path, output.join("holiday/b.jpg"));
        assert_eq!(outcomes[2].output_path, output.join("holiday/beach/c.jpg"));
        assert!(output.join("holiday/beach").is_dir());
        assert!(!output.join("holiday/notes.txt").exists());

        for outcome in &outcomes {
            if outcome.result.is_ok() {
                assert!(outcome.output_path.is_file());
            }
        }
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[2].result.is_ok());
    }

    #[test]
    fn test_failure_does_not_abort_walk() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        fs::create_dir_all(&input).unwrap();

        fs::write(input.join("a_broken.jpg"), vec![0u8; 8192]).unwrap();
        noisy_rgb(64, 64, 9).save_with_format(input.join("b_ok.png"), ImageFormat::Png).unwrap();

        let compressor = Compressor::new(RetryPolicy::none());
        let outcomes: Vec<_> = walk(&compressor, &input, &output, settings(OutputFormat::Webp))
            .unwrap()
            .collect();

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0].result, Err(CompressError::Decode { .. })));
        assert!(outcomes[1].result.is_ok());
        assert_eq!(outcomes[1].output_path, output.join("b_ok.webp"));
    }

    #[test]
    fn test_walk_is_lazy() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        fs::create_dir_all(&input).unwrap();
        noisy_rgb(64, 64, 4).save_with_format(input.join("a.png"), ImageFormat::Png).unwrap();
        noisy_rgb(64, 64, 5).save_with_format(input.join("b.png"), ImageFormat::Png).unwrap();

        let compressor = Compressor::new(RetryPolicy::new(0, Duration::ZERO));
        let mut walker = walk(&compressor, &input, &output, settings(OutputFormat::Jpeg)).unwrap();

        assert!(output.is_dir());
        assert!(!output.join("a.jpg").exists());
        walker.next().unwrap();
        assert!(output.join("a.jpg").exists());
        assert!(!output.join("b.jpg").exists());
    }

    #[test]
    fn test_output_nested_in_input_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("photos");
        let output = input.join("z_out");
        fs::create_dir_all(&input).unwrap();
        noisy_rgb(64, 64, 6).save_with_format(input.join("a.png"), ImageFormat::Png).unwrap();

        let compressor = Compressor::new(RetryPolicy::none());
        let outcomes: Vec<_> = walk(&compressor, &input, &output, settings(OutputFormat::Jpeg))
            .unwrap()
            .collect();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].relative_path, PathBuf::from("a.png"));
        assert!(outcomes[0].result.is_ok());
        assert!(output.join("a.jpg").is_file());
        assert!(!output.join("z_out").exists());
    }

    #[test]
    fn test_missing_input_root() {
        let temp_dir = TempDir::new().unwrap();
        let compressor = Compressor::default();
        let result = walk(
            &compressor,
            &temp_dir.path().join("missing"),
            &temp_dir.path().join("out"),
            settings(OutputFormat::Jpeg),
        );
        assert!(matches!(result, Err(CompressError::InputNotFound(_))));
    }
}

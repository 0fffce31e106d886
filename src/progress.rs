//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di compressione.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per i batch
//! - Tracking statistiche (file compressi, fuori target, errori)
//! - Calcolo percentuali di riduzione e byte risparmiati
//!
//! ## Statistiche tracciate:
//! - **files_processed**: Totale file elaborati
//! - **files_compressed**: File scritti entro il target
//! - **files_over_target**: File scritti ma sopra il target (best effort)
//! - **errors**: Numero di errori durante processing
//! - **total_bytes_saved**: Byte totali risparmiati
//!
//! ## Esempio:
//! ```ignore
//! let progress = ProgressManager::new(total_files);
//! let mut stats = CompressionStats::new();
//!
//! stats.record(&result);
//! progress.update("photo.jpg");
//!
//! progress.finish(&stats.format_summary());
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::compressor::CompressionResult;
use crate::file_manager::FileManager;

/// Manages progress reporting for batch runs
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Progress manager that draws nothing (JSON mode, tests)
    pub fn hidden(total_files: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total_files);
        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

/// Statistics tracker for compression results
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CompressionStats {
    pub files_processed: usize,
    pub files_compressed: usize,
    pub files_over_target: usize,
    pub errors: usize,
    pub total_bytes_saved: u64,
    pub total_original_size: u64,
}

impl CompressionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &CompressionResult) {
        self.files_processed += 1;
        if result.within_target {
            self.files_compressed += 1;
        } else {
            self.files_over_target += 1;
        }
        self.total_original_size += result.original_size;
        self.total_bytes_saved += result.original_size.saturating_sub(result.final_size);
    }

    pub fn add_error(&mut self) {
        self.files_processed += 1;
        self.errors += 1;
    }

    pub fn has_failures(&self) -> bool {
        self.errors > 0
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        if self.total_original_size > 0 {
            (self.total_bytes_saved as f64 / self.total_original_size as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Compressed: {} | Over target: {} | Errors: {} | Total saved: {} ({:.2}%)",
            self.files_processed,
            self.files_compressed,
            self.files_over_target,
            self.errors,
            FileManager::format_size(self.total_bytes_saved),
            self.overall_reduction_percent()
        )
    }
}

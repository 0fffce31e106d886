//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e la discovery delle immagini.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva di immagini in una directory
//! - Riconoscimento formato tramite estensione (case-insensitive)
//! - Utilità per calcoli dimensioni e percentuali
//! - Formattazione human-readable delle dimensioni
//!
//! ## Formati supportati:
//! - **Immagini**: JPG, JPEG, PNG, WebP
//!
//! ## Esempio:
//! ```ignore
//! let files = FileManager::find_image_files(Path::new("/path/to/photos"), None);
//! for file in files {
//!     println!("{}", file.display());
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::format::OutputFormat;

/// File discovery and size helpers
pub struct FileManager;

impl FileManager {
    /// Walks `root` recursively, yielding supported images sorted by file name.
    /// The `skip_dir` subtree (typically an output directory nested inside
    /// `root`) is not entered. Unreadable entries are logged and skipped.
    pub fn image_files(root: &Path, skip_dir: Option<&Path>) -> impl Iterator<Item = PathBuf> {
        let skip_dir = skip_dir.and_then(|dir| fs::canonicalize(dir).ok());

        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| match &skip_dir {
                Some(skip) if entry.file_type().is_dir() => {
                    fs::canonicalize(entry.path()).map_or(true, |dir| &dir != skip)
                }
                _ => true,
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| Self::is_image(path))
    }

    /// Find all supported images in a directory
    pub fn find_image_files(root: &Path, skip_dir: Option<&Path>) -> Vec<PathBuf> {
        Self::image_files(root, skip_dir).collect()
    }

    /// Check if a file has a supported image extension
    pub fn is_image(path: &Path) -> bool {
        OutputFormat::from_path(path).is_some()
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}

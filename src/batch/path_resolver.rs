//! # Path Resolution Module
//!
//! Centralizza il calcolo dei path di output per i batch.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CompressError, Result};
use crate::format::OutputFormat;

/// Prefix used when a list of files is compressed into one directory
pub const COMPRESSED_PREFIX: &str = "compressed_";

/// Output path computations shared by the batch drivers
pub struct PathResolver;

impl PathResolver {
    /// Extension to write for `input_path`: the source extension is kept when
    /// it already denotes `format`, otherwise the format's canonical one.
    pub fn output_extension(input_path: &Path, format: OutputFormat) -> String {
        match input_path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if OutputFormat::from_extension(ext) == Some(format) => ext.to_string(),
            _ => format.extension().to_string(),
        }
    }

    /// Path of `input_path` relative to `input_root`
    pub fn relative_path(input_path: &Path, input_root: &Path) -> Result<PathBuf> {
        input_path
            .strip_prefix(input_root)
            .map(Path::to_path_buf)
            .map_err(|_| {
                CompressError::InvalidParameter(format!(
                    "{} is not inside {}",
                    input_path.display(),
                    input_root.display()
                ))
            })
    }

    /// Mirrors `relative_path` under `output_root`, re-extensioned for `format`
    pub fn mirrored_output_path(relative_path: &Path, output_root: &Path, format: OutputFormat) -> PathBuf {
        let extension = Self::output_extension(relative_path, format);
        let result = output_root.join(relative_path).with_extension(extension);
        debug!("Resolved output path: {} -> {}", relative_path.display(), result.display());
        result
    }

    /// `output_dir/compressed_<stem>.<ext>` for file list batches
    pub fn prefixed_output_path(input_path: &Path, output_dir: &Path, format: OutputFormat) -> Result<PathBuf> {
        let file_stem = input_path
            .file_stem()
            .ok_or_else(|| CompressError::InvalidParameter(format!("Invalid file name: {}", input_path.display())))?
            .to_string_lossy();
        let extension = Self::output_extension(input_path, format);
        Ok(output_dir.join(format!("{COMPRESSED_PREFIX}{file_stem}.{extension}")))
    }

    /// Output path for a single-file run: inside `output` when it is an
    /// existing directory, `output` itself otherwise.
    pub fn single_output_path(input_path: &Path, output: &Path, format: OutputFormat) -> Result<PathBuf> {
        if !output.is_dir() {
            return Ok(output.to_path_buf());
        }
        let file_stem = input_path
            .file_stem()
            .ok_or_else(|| CompressError::InvalidParameter(format!("Invalid file name: {}", input_path.display())))?
            .to_string_lossy();
        Ok(output.join(format!("{}.{}", file_stem, format.extension())))
    }
}

//! Compression of an explicit list of files into one output directory.
//!
//! The caller owns the list (a selection, a drop of files, command-line
//! arguments); this module only turns it into per-file outcomes.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::batch::path_resolver::PathResolver;
use crate::compressor::{CompressionResult, CompressionSettings, Compressor};
use crate::error::{CompressError, Result};
use crate::file_manager::FileManager;
use crate::writer::OutputSink;

/// Outcome of one listed file
#[derive(Debug)]
pub struct FileOutcome {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub result: Result<CompressionResult>,
}

/// Compresses every path of `paths` into `output_dir` as `compressed_<stem>.<ext>`.
/// Duplicates are processed once; failures are reported per file.
pub fn compress_files<S, I, P>(
    compressor: &Compressor<S>,
    paths: I,
    output_dir: &Path,
    settings: CompressionSettings,
) -> Result<Vec<FileOutcome>>
where
    S: OutputSink,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    settings.validate()?;
    fs::create_dir_all(output_dir)?;

    let mut seen = HashSet::new();
    let mut outcomes = Vec::new();

    for path in paths {
        let input_path = path.as_ref().to_path_buf();
        if !seen.insert(input_path.clone()) {
            continue;
        }

        if !FileManager::is_image(&input_path) {
            error!("Skipping unsupported file: {}", input_path.display());
            outcomes.push(FileOutcome {
                result: Err(CompressError::UnsupportedFormat(input_path.clone())),
                input_path,
                output_path: None,
            });
            continue;
        }

        let output_path = match PathResolver::prefixed_output_path(&input_path, output_dir, settings.output_format) {
            Ok(path) => path,
            Err(e) => {
                outcomes.push(FileOutcome {
                    input_path,
                    output_path: None,
                    result: Err(e),
                });
                continue;
            }
        };

        info!("Processing {}", input_path.display());
        let result = compressor.compress(&settings.request(&input_path, &output_path));
        if let Err(ref e) = result {
            error!("Failed to process {}: {}", input_path.display(), e);
        }

        outcomes.push(FileOutcome {
            input_path,
            output_path: Some(output_path),
            result,
        });
    }

    Ok(outcomes)
}

//! # Single-File Compressor
//!
//! Orchestra la compressione di un singolo file verso una dimensione target.
//!
//! ## Pipeline:
//! 1. **Validazione input**: il file deve esistere ed essere più grande del target
//! 2. **Decode**: `image::open`, errore `Decode` se non è un'immagine leggibile
//! 3. **Conversione colore**: una sola volta, prima della ricerca
//! 4. **Ricerca qualità**: binary search (solo formati lossy)
//! 5. **Scrittura**: atomica, con retry se la destinazione è bloccata
//!
//! Se nessuna qualità rientra nel target il file viene comunque scritto alla
//! qualità minima e `quality_used` resta `None`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::encoder::{ImageEncoder, QualityEncoder};
use crate::error::{CompressError, Result};
use crate::file_manager::FileManager;
use crate::format::OutputFormat;
use crate::retry::{is_lock_error, RetryPolicy};
use crate::search::{self, MAX_QUALITY};
use crate::writer::{AtomicFileSink, OutputSink};

/// Parameters shared by every file of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionSettings {
    pub target_size_bytes: u64,
    pub min_quality: u8,
    pub output_format: OutputFormat,
}

impl CompressionSettings {
    /// Settings for a target expressed in KB (1 KB = 1024 bytes)
    pub fn from_kb(target_size_kb: u64, min_quality: u8, output_format: OutputFormat) -> Result<Self> {
        let target_size_bytes = target_size_kb
            .checked_mul(1024)
            .ok_or_else(|| CompressError::InvalidParameter(format!("target size too large: {target_size_kb} KB")))?;
        let settings = Self {
            target_size_bytes,
            min_quality,
            output_format,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_size_bytes == 0 {
            return Err(CompressError::InvalidParameter("target size must be greater than 0".to_string()));
        }
        if !(1..=100).contains(&self.min_quality) {
            return Err(CompressError::InvalidParameter(format!(
                "minimum quality must be between 1 and 100, got {}",
                self.min_quality
            )));
        }
        Ok(())
    }

    /// Builds the request for one input/output pair
    pub fn request(&self, input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> CompressionRequest {
        CompressionRequest {
            input_path: input_path.into(),
            output_path: output_path.into(),
            target_size_bytes: self.target_size_bytes,
            min_quality: self.min_quality,
            output_format: self.output_format,
        }
    }
}

/// One compression job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub target_size_bytes: u64,
    pub min_quality: u8,
    pub output_format: OutputFormat,
}

impl CompressionRequest {
    fn settings(&self) -> CompressionSettings {
        CompressionSettings {
            target_size_bytes: self.target_size_bytes,
            min_quality: self.min_quality,
            output_format: self.output_format,
        }
    }
}

/// What ended up on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionResult {
    pub original_size: u64,
    pub final_size: u64,
    /// Chosen quality; `None` when no quality fit the target or the format is lossless
    pub quality_used: Option<u8>,
    pub within_target: bool,
}

impl CompressionResult {
    pub fn reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.original_size, self.final_size)
    }
}

/// Compresses single files. Stateless apart from its write policy.
pub struct Compressor<S = AtomicFileSink> {
    sink: S,
    retry: RetryPolicy,
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl Compressor {
    pub fn new(retry: RetryPolicy) -> Self {
        Self::with_sink(AtomicFileSink, retry)
    }
}

impl<S: OutputSink> Compressor<S> {
    pub fn with_sink(sink: S, retry: RetryPolicy) -> Self {
        Self { sink, retry }
    }

    /// Compresses `request.input_path` into `request.output_path`
    pub fn compress(&self, request: &CompressionRequest) -> Result<CompressionResult> {
        request.settings().validate()?;

        let input = request.input_path.as_path();
        if !input.is_file() {
            return Err(CompressError::InputNotFound(input.to_path_buf()));
        }

        let original_size = fs::metadata(input)?.len();
        let target_size = request.target_size_bytes;
        if original_size <= target_size {
            return Err(CompressError::AlreadyUnderTarget {
                path: input.to_path_buf(),
                original_size,
                target_size,
            });
        }

        let image = image::open(input).map_err(|source| CompressError::Decode {
            path: input.to_path_buf(),
            source,
        })?;
        debug!(
            "Decoded {} ({}x{}, {:?})",
            input.display(),
            image.width(),
            image.height(),
            image.color()
        );

        let encoder = ImageEncoder::new(image, request.output_format);
        let (encoded, quality_used) = self.choose_encoding(&encoder, request)?;
        let within_target = encoded.len() as u64 <= target_size;

        self.write_output(&request.output_path, &encoded)?;
        let final_size = fs::metadata(&request.output_path)?.len();

        let result = CompressionResult {
            original_size,
            final_size,
            quality_used,
            within_target,
        };

        if within_target {
            info!(
                "✅ {} -> {}: {} -> {} ({:.1}% saved, quality {})",
                input.display(),
                request.output_path.display(),
                FileManager::format_size(original_size),
                FileManager::format_size(final_size),
                result.reduction_percent(),
                quality_used.map_or_else(|| "lossless".to_string(), |q| q.to_string())
            );
        } else {
            warn!(
                "⚠️ {}: could not reach {} (best effort {})",
                input.display(),
                FileManager::format_size(target_size),
                FileManager::format_size(final_size)
            );
        }

        Ok(result)
    }

    /// Picks the bytes to write and the quality that produced them
    fn choose_encoding<E: QualityEncoder>(
        &self,
        encoder: &E,
        request: &CompressionRequest,
    ) -> Result<(Vec<u8>, Option<u8>)> {
        if !request.output_format.is_lossy() {
            debug!("{} has no quality scale, single lossless pass", request.output_format);
            return Ok((encoder.encode(MAX_QUALITY)?, None));
        }

        match search::search(encoder, request.target_size_bytes, request.min_quality, MAX_QUALITY)? {
            Some(candidate) => {
                debug!("Best quality {} ({} bytes)", candidate.quality, candidate.size());
                Ok((candidate.encoded, Some(candidate.quality)))
            }
            None => {
                let floor = request.min_quality.min(MAX_QUALITY);
                debug!("No quality fits {} bytes, keeping quality {}", request.target_size_bytes, floor);
                Ok((encoder.encode(floor)?, None))
            }
        }
    }

    fn write_output(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| CompressError::WriteDenied {
                path: path.to_path_buf(),
                attempts: 0,
                source,
            })?;
        }

        self.retry
            .run(|_| self.sink.write(path, data), is_lock_error)
            .map_err(|exhausted| CompressError::WriteDenied {
                path: path.to_path_buf(),
                attempts: exhausted.attempts,
                source: exhausted.last_error,
            })
    }
}

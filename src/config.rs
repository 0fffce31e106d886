//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione di una esecuzione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di compressione
//! - Fornisce validazione dei parametri di input
//! - Fornisce valori di default sensati per tutti i parametri
//! - Converte la configurazione in `CompressionSettings` e `RetryPolicy`
//!
//! ## Parametri di configurazione:
//! - `target_size_kb`: Dimensione target in KB (1 KB = 1024 byte)
//! - `min_quality`: Qualità minima (1-100, default: 5)
//! - `output_format`: Formato di output (JPEG, PNG, WEBP, default: JPEG)
//! - `write_retries`: Retry di scrittura se il file è bloccato (default: 3)
//! - `retry_delay_ms`: Pausa fra i retry (default: 500ms)
//! - `json_output`: Output JSON per uso programmatico (default: false)
//!
//! ## Esempio:
//! ```ignore
//! let config = Config {
//!     target_size_kb: 200,
//!     output_format: OutputFormat::Webp,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::compressor::CompressionSettings;
use crate::error::{CompressError, Result};
use crate::format::OutputFormat;
use crate::retry::{RetryPolicy, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY};

/// Default quality floor
pub const DEFAULT_MIN_QUALITY: u8 = 5;

/// Configuration for a compression run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target size in KB
    pub target_size_kb: u64,
    /// Lowest quality the search may pick (1-100)
    pub min_quality: u8,
    /// Format of the written files
    pub output_format: OutputFormat,
    /// Retries when the destination is locked
    pub write_retries: u32,
    /// Delay between write retries, in milliseconds
    pub retry_delay_ms: u64,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_size_kb: 200,
            min_quality: DEFAULT_MIN_QUALITY,
            output_format: OutputFormat::Jpeg,
            write_retries: DEFAULT_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.target_size_kb == 0 {
            return Err(CompressError::InvalidParameter(
                "Target size must be greater than 0 KB".to_string(),
            ));
        }

        if self.min_quality == 0 || self.min_quality > 100 {
            return Err(CompressError::InvalidParameter(
                "Minimum quality must be between 1 and 100".to_string(),
            ));
        }

        if self.retry_delay_ms > 60_000 {
            return Err(CompressError::InvalidParameter(
                "Retry delay must be at most 60000 ms".to_string(),
            ));
        }

        Ok(())
    }

    /// Per-file parameters derived from this configuration
    pub fn settings(&self) -> Result<CompressionSettings> {
        self.validate()?;
        CompressionSettings::from_kb(self.target_size_kb, self.min_quality, self.output_format)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.write_retries, Duration::from_millis(self.retry_delay_ms))
    }
}

//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per i chiamanti
//! programmatici (una GUI, uno script).
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio della compressione
//! - `file_complete`: Fine elaborazione di un file (con eventuale errore)
//! - `complete`: Fine processo con statistiche finali
//! - `error`: Errore generale
//!
//! Un messaggio per riga su stdout.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::compressor::CompressionResult;
use crate::config::Config;
use crate::error::CompressError;
use crate::format::OutputFormat;
use crate::progress::CompressionStats;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Inizio del processo
    #[serde(rename = "start")]
    Start {
        inputs: Vec<PathBuf>,
        output: PathBuf,
        total_files: Option<usize>,
        config: JsonConfig,
    },

    /// Fine elaborazione di un file specifico
    #[serde(rename = "file_complete")]
    FileComplete {
        path: PathBuf,
        output_path: Option<PathBuf>,
        original_size: Option<u64>,
        final_size: Option<u64>,
        quality_used: Option<u8>,
        within_target: bool,
        reduction_percent: Option<f64>,
        error: Option<String>,
    },

    /// Processo completato
    #[serde(rename = "complete")]
    Complete {
        files_processed: usize,
        files_compressed: usize,
        files_over_target: usize,
        errors: usize,
        total_bytes_saved: u64,
        average_reduction: f64,
        duration_seconds: f64,
    },

    /// Errore generale
    #[serde(rename = "error")]
    Error {
        message: String,
        details: Option<String>,
    },
}

/// Configurazione per output JSON
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonConfig {
    pub target_size_kb: u64,
    pub min_quality: u8,
    pub output_format: OutputFormat,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(inputs: Vec<PathBuf>, output: PathBuf, total_files: Option<usize>, config: &Config) -> Self {
        Self::Start {
            inputs,
            output,
            total_files,
            config: JsonConfig::from(config),
        }
    }

    /// Crea un messaggio di completamento file
    pub fn file_complete(
        path: &Path,
        output_path: Option<&Path>,
        result: &Result<CompressionResult, CompressError>,
    ) -> Self {
        match result {
            Ok(r) => Self::FileComplete {
                path: path.to_path_buf(),
                output_path: output_path.map(Path::to_path_buf),
                original_size: Some(r.original_size),
                final_size: Some(r.final_size),
                quality_used: r.quality_used,
                within_target: r.within_target,
                reduction_percent: Some(r.reduction_percent()),
                error: None,
            },
            Err(e) => Self::FileComplete {
                path: path.to_path_buf(),
                output_path: output_path.map(Path::to_path_buf),
                original_size: None,
                final_size: None,
                quality_used: None,
                within_target: false,
                reduction_percent: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Crea un messaggio di completamento generale
    pub fn complete(stats: &CompressionStats, duration_seconds: f64) -> Self {
        Self::Complete {
            files_processed: stats.files_processed,
            files_compressed: stats.files_compressed,
            files_over_target: stats.files_over_target,
            errors: stats.errors,
            total_bytes_saved: stats.total_bytes_saved,
            average_reduction: stats.overall_reduction_percent(),
            duration_seconds,
        }
    }

    /// Crea un messaggio di errore
    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }
}

impl From<&Config> for JsonConfig {
    fn from(config: &Config) -> Self {
        Self {
            target_size_kb: config.target_size_kb,
            min_quality: config.min_quality,
            output_format: config.output_format,
        }
    }
}

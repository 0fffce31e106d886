//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore della compressione.
//!
//! ## Responsabilità:
//! - Definisce `CompressError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//! - Mantiene il path del file coinvolto per i report dei batch
//!
//! ## Categorie di errori:
//! - `InputNotFound`: Il file sorgente non esiste
//! - `AlreadyUnderTarget`: Il file è già sotto la dimensione target
//! - `Decode`: Il file non è un'immagine leggibile
//! - `Encode`: L'encoder ha fallito
//! - `WriteDenied`: Destinazione non scrivibile dopo i retry
//! - `InvalidParameter`: Parametro di input non valido
//! - `UnsupportedFormat`: Estensione non supportata
//! - `Io`: Altri errori di I/O
//!
//! ## Esempio:
//! ```ignore
//! if !input.exists() {
//!     return Err(CompressError::InputNotFound(input.to_path_buf()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for image compression
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("{} is already under the target size ({original_size} <= {target_size} bytes)", .path.display())]
    AlreadyUnderTarget {
        path: PathBuf,
        original_size: u64,
        target_size: u64,
    },

    #[error("Cannot decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Cannot write {} after {attempts} attempt(s): {source}", .path.display())]
    WriteDenied {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for CompressError {
    fn from(err: image::ImageError) -> Self {
        CompressError::Encode(err.to_string())
    }
}

pub type Result<T, E = CompressError> = std::result::Result<T, E>;

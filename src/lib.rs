//! # Image Shrinker Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri chiamanti (GUI, script)
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom
//! - `format`: Formati di output supportati (JPEG, PNG, WebP)
//! - `encoder`: Adapter verso i codec (`image`, `webp`)
//! - `search`: Binary search della qualità sotto una dimensione target
//! - `retry`: Retry limitato con pausa fissa
//! - `writer`: Scrittura atomica dell'output
//! - `compressor`: Compressione di un singolo file
//! - `batch`: Directory walker e liste di file
//! - `file_manager`: Discovery immagini e utilità dimensioni
//! - `progress`: Progress bar e statistiche
//! - `json_output`: Eventi JSON per uso programmatico
//! - `runner`: Orchestratore di una esecuzione
//!
//! ## Utilizzo:
//! ```ignore
//! use image_shrinker::{CompressionSettings, Compressor, OutputFormat};
//!
//! let settings = CompressionSettings::from_kb(100, 5, OutputFormat::Jpeg)?;
//! let result = Compressor::default().compress(&settings.request("in.png", "out.jpg"))?;
//! println!("quality: {:?}", result.quality_used);
//! ```

pub mod batch;
pub mod compressor;
pub mod config;
pub mod encoder;
pub mod error;
pub mod file_manager;
pub mod format;
pub mod json_output;
pub mod progress;
pub mod retry;
pub mod runner;
pub mod search;
pub mod writer;

pub use batch::{compress_files, walk, FileOutcome, WalkOutcome};
pub use compressor::{CompressionRequest, CompressionResult, CompressionSettings, Compressor};
pub use config::Config;
pub use encoder::{ImageEncoder, QualityEncoder};
pub use error::CompressError;
pub use format::OutputFormat;
pub use retry::RetryPolicy;
pub use runner::ShrinkRunner;
pub use search::{search, search_quality, Candidate, MAX_QUALITY};

//! # Image Shrinker - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Creazione della configurazione e avvio del runner
//! - Exit code: 0 se tutto ok, 1 se almeno un file è fallito
//!
//! ## Esempio di utilizzo:
//! ```bash
//! image-shrinker photos/ -o small/ --size 200 --min-quality 10 --format webp
//! image-shrinker cat.png -o cat.jpg -s 100
//! image-shrinker a.png b.jpg c.webp -o compressed_images -s 150 --json
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use image_shrinker::config::DEFAULT_MIN_QUALITY;
use image_shrinker::json_output::JsonMessage;
use image_shrinker::retry::DEFAULT_RETRIES;
use image_shrinker::{Config, OutputFormat, ShrinkRunner};

#[derive(Parser)]
#[command(name = "image-shrinker")]
#[command(about = "Shrink images to a target file size by searching the encoder quality")]
struct Args {
    /// Image file, directory of images, or several image files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file or directory
    #[arg(short, long)]
    output: PathBuf,

    /// Target file size in KB
    #[arg(short, long)]
    size: u64,

    /// Minimum quality the search may pick (1-100)
    #[arg(short = 'q', long, default_value_t = DEFAULT_MIN_QUALITY)]
    min_quality: u8,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Jpeg)]
    format: OutputFormat,

    /// Retries when the output file is locked by another process
    #[arg(long, default_value_t = DEFAULT_RETRIES)]
    retries: u32,

    /// Delay between write retries in milliseconds
    #[arg(long, default_value = "500")]
    retry_delay_ms: u64,

    /// Output progress and results as JSON lines
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose, args.json) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let json = args.json;
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            if json {
                JsonMessage::error(e.to_string(), e.chain().nth(1).map(|s| s.to_string())).emit();
            } else {
                error!("{:#}", e);
            }
            ExitCode::from(1)
        }
    }
}

/// Returns `Ok(false)` when at least one file failed
fn run(args: Args) -> Result<bool> {
    let config = Config {
        target_size_kb: args.size,
        min_quality: args.min_quality,
        output_format: args.format,
        write_retries: args.retries,
        retry_delay_ms: args.retry_delay_ms,
        json_output: args.json,
    };

    let runner = ShrinkRunner::new(config)?;
    let stats = runner.run(&args.inputs, &args.output)?;
    Ok(!stats.has_failures())
}

fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // In JSON mode stdout is reserved for the event stream
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!json)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

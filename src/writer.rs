//! Destination writes.
//!
//! The encoded bytes go to a temporary file next to the destination, which
//! is then renamed over it. A failed attempt drops the temporary file, so the
//! output path only ever holds a complete image.

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Where the compressor sends its final bytes
pub trait OutputSink {
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for &S {
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        (**self).write(path, data)
    }
}

/// Temp file + rename in the destination directory
#[derive(Debug, Default, Clone, Copy)]
pub struct AtomicFileSink;

impl OutputSink for AtomicFileSink {
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(data)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;

        debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

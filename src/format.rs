//! Output formats supported by the encoder adapter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::CompressError;

/// Target container/codec for compressed output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[value(alias = "jpg")]
    Jpeg,
    Png,
    Webp,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Jpeg
    }
}

impl OutputFormat {
    /// Canonical file extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    /// Whether the encoder exposes a quality knob
    pub fn is_lossy(&self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::Webp)
    }

    /// Format denoted by a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::Webp),
            _ => None,
        }
    }

    /// Format denoted by the extension of `path`
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Webp => "WEBP",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = CompressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim())
            .ok_or_else(|| CompressError::InvalidParameter(format!("unknown output format: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("JPEG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("WebP".parse::<OutputFormat>().unwrap(), OutputFormat::Webp);
        assert!(matches!(
            "gif".parse::<OutputFormat>(),
            Err(CompressError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.PNG")), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("a/b.jpeg")), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_path(Path::new("a/b.txt")), None);
        assert_eq!(OutputFormat::from_path(Path::new("a/noext")), None);
    }

    #[test]
    fn test_png_is_not_lossy() {
        assert!(OutputFormat::Jpeg.is_lossy());
        assert!(OutputFormat::Webp.is_lossy());
        assert!(!OutputFormat::Png.is_lossy());
    }
}

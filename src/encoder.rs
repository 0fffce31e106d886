//! # Encoder Adapter
//!
//! Wraps the codec libraries behind a single operation: encode an already
//! decoded image at a given quality and return the encoded bytes.
//!
//! | Formato | Encoder                          | Quality |
//! |---------|----------------------------------|---------|
//! | JPEG    | `image::codecs::jpeg`            | 1-100   |
//! | PNG     | `image::codecs::png` (Best)      | ignored |
//! | WebP    | `webp` (libwebp, lossy)          | 1-100   |
//!
//! The color-mode conversion required by the target format happens once in
//! [`ImageEncoder::new`], never inside the search loop.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageEncoder as _};
use tracing::debug;

use crate::error::{CompressError, Result};
use crate::format::OutputFormat;

/// Anything that can produce an encoded image for a quality value.
///
/// The quality search only depends on this trait, so it can be driven by a
/// synthetic encoder in tests.
pub trait QualityEncoder {
    fn encode(&self, quality: u8) -> Result<Vec<u8>>;
}

impl<E: QualityEncoder + ?Sized> QualityEncoder for &E {
    fn encode(&self, quality: u8) -> Result<Vec<u8>> {
        (**self).encode(quality)
    }
}

/// Real encoder backed by `image` and `webp`
pub struct ImageEncoder {
    image: DynamicImage,
    format: OutputFormat,
}

impl ImageEncoder {
    /// Prepares `image` for `format`, converting the pixel layout if the
    /// format cannot store it as is.
    pub fn new(image: DynamicImage, format: OutputFormat) -> Self {
        let original = image.color();
        let image = convert_for_format(image, format);
        if image.color() != original {
            debug!("Converted {:?} -> {:?} for {} output", original, image.color(), format);
        }
        Self { image, format }
    }

    pub fn color(&self) -> ColorType {
        self.image.color()
    }

    fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100)).write_image(
            self.image.as_bytes(),
            self.image.width(),
            self.image.height(),
            self.image.color(),
        )?;
        Ok(buffer)
    }

    fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive)
            .write_image(
                self.image.as_bytes(),
                self.image.width(),
                self.image.height(),
                self.image.color(),
            )?;
        Ok(buffer)
    }

    fn encode_webp(&self, quality: u8) -> Result<Vec<u8>> {
        let (width, height) = (self.image.width(), self.image.height());
        let encoder = match &self.image {
            DynamicImage::ImageRgb8(rgb) => webp::Encoder::from_rgb(rgb.as_raw(), width, height),
            DynamicImage::ImageRgba8(rgba) => webp::Encoder::from_rgba(rgba.as_raw(), width, height),
            other => {
                return Err(CompressError::Encode(format!(
                    "WebP encoder cannot take {:?} pixels",
                    other.color()
                )))
            }
        };
        let memory = encoder
            .encode_simple(false, f32::from(quality.clamp(1, 100)))
            .map_err(|e| CompressError::Encode(format!("libwebp rejected a {width}x{height} image: {e:?}")))?;
        Ok(memory.to_vec())
    }
}

impl QualityEncoder for ImageEncoder {
    fn encode(&self, quality: u8) -> Result<Vec<u8>> {
        match self.format {
            OutputFormat::Jpeg => self.encode_jpeg(quality),
            OutputFormat::Png => self.encode_png(),
            OutputFormat::Webp => self.encode_webp(quality),
        }
    }
}

/// Converts to a pixel layout the target encoder accepts
fn convert_for_format(image: DynamicImage, format: OutputFormat) -> DynamicImage {
    match (format, image.color()) {
        (OutputFormat::Jpeg, ColorType::L8 | ColorType::Rgb8) => image,
        (OutputFormat::Jpeg, _) => DynamicImage::ImageRgb8(image.to_rgb8()),

        (OutputFormat::Webp, ColorType::Rgb8 | ColorType::Rgba8) => image,
        (OutputFormat::Webp, color) if color.has_alpha() => DynamicImage::ImageRgba8(image.to_rgba8()),
        (OutputFormat::Webp, _) => DynamicImage::ImageRgb8(image.to_rgb8()),

        (
            OutputFormat::Png,
            ColorType::L8
            | ColorType::La8
            | ColorType::Rgb8
            | ColorType::Rgba8
            | ColorType::L16
            | ColorType::La16
            | ColorType::Rgb16
            | ColorType::Rgba16,
        ) => image,
        (OutputFormat::Png, color) if color.has_alpha() => DynamicImage::ImageRgba8(image.to_rgba8()),
        (OutputFormat::Png, _) => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    /// Deterministic noise so encoded sizes react strongly to quality
    pub(crate) fn noisy_rgb(width: u32, height: u32, seed: u32) -> RgbImage {
        let mut state = seed.wrapping_mul(2_654_435_761).max(1);
        RgbImage::from_fn(width, height, |_, _| {
            let mut next = || {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state & 0xff) as u8
            };
            Rgb([next(), next(), next()])
        })
    }

    #[test]
    fn test_jpeg_drops_alpha_once() {
        let rgba = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 128]));
        let encoder = ImageEncoder::new(DynamicImage::ImageRgba8(rgba), OutputFormat::Jpeg);
        assert_eq!(encoder.color(), ColorType::Rgb8);

        let bytes = encoder.encode(80).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_webp_keeps_alpha() {
        let rgba = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 128]));
        let encoder = ImageEncoder::new(DynamicImage::ImageRgba8(rgba), OutputFormat::Webp);
        assert_eq!(encoder.color(), ColorType::Rgba8);

        let bytes = encoder.encode(50).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_webp_oversize_is_an_error() {
        // libwebp caps each dimension at 16383 px
        let wide = RgbImage::from_pixel(16_400, 4, Rgb([200, 100, 50]));
        let encoder = ImageEncoder::new(DynamicImage::ImageRgb8(wide), OutputFormat::Webp);

        let err = encoder.encode(50).unwrap_err();
        assert!(matches!(err, CompressError::Encode(_)));
    }

    #[test]
    fn test_png_ignores_quality() {
        let image = DynamicImage::ImageRgb8(noisy_rgb(32, 32, 7));
        let encoder = ImageEncoder::new(image, OutputFormat::Png);

        let low = encoder.encode(5).unwrap();
        let high = encoder.encode(95).unwrap();
        assert_eq!(low, high);
    }

    #[test]
    fn test_jpeg_size_shrinks_with_quality() {
        let image = DynamicImage::ImageRgb8(noisy_rgb(64, 64, 3));
        let encoder = ImageEncoder::new(image, OutputFormat::Jpeg);

        let low = encoder.encode(10).unwrap();
        let high = encoder.encode(95).unwrap();
        assert!(low.len() < high.len());
    }
}

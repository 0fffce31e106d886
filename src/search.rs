//! # Quality Search
//!
//! Binary search over the encoder quality domain for the largest quality
//! whose encoded output fits a byte budget.
//!
//! Each probe depends on the outcome of the previous one, so the loop is
//! strictly sequential. Encoded bytes of the best feasible probe are kept in
//! memory: the caller writes them directly instead of re-encoding.

use tracing::debug;

use crate::encoder::QualityEncoder;
use crate::error::Result;

/// Upper bound of the search; a practical ceiling below lossless
pub const MAX_QUALITY: u8 = 95;

/// Best feasible probe found by [`search`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub quality: u8,
    pub encoded: Vec<u8>,
}

impl Candidate {
    pub fn size(&self) -> u64 {
        self.encoded.len() as u64
    }
}

/// Finds the highest quality in `[min_quality, max_quality]` whose encoding
/// is at most `target_size` bytes.
///
/// Returns `None` when no probed quality was feasible. Assumes the encoded
/// size does not grow as quality decreases.
pub fn search<E: QualityEncoder + ?Sized>(
    encoder: &E,
    target_size: u64,
    min_quality: u8,
    max_quality: u8,
) -> Result<Option<Candidate>> {
    // i16 so that `mid - 1` cannot underflow at quality 0
    let mut low = i16::from(min_quality);
    let mut high = i16::from(max_quality);
    let mut best: Option<Candidate> = None;

    while low <= high {
        let mid = (low + high) / 2;
        let quality = mid as u8;
        let encoded = encoder.encode(quality)?;
        let size = encoded.len() as u64;

        if size <= target_size {
            debug!("quality {:>3}: {} bytes <= {} (feasible)", quality, size, target_size);
            best = Some(Candidate { quality, encoded });
            low = mid + 1;
        } else {
            debug!("quality {:>3}: {} bytes > {}", quality, size, target_size);
            high = mid - 1;
        }
    }

    Ok(best)
}

/// Same as [`search`] but only reports the chosen quality
pub fn search_quality<E: QualityEncoder + ?Sized>(
    encoder: &E,
    target_size: u64,
    min_quality: u8,
    max_quality: u8,
) -> Result<Option<u8>> {
    Ok(search(encoder, target_size, min_quality, max_quality)?.map(|c| c.quality))
}

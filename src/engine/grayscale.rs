//! RGB to single-channel luma conversion.

use std::collections::TryReserveError;

use crate::utils::config::LumaWeights;

/// Weighted luma of one pixel, truncated toward zero.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    (LumaWeights::R * r as f64 + LumaWeights::G * g as f64 + LumaWeights::B * b as f64) as u8
}

/// Convert interleaved RGB bytes into a newly allocated gray buffer with one byte per
/// pixel. Trailing bytes that do not form a full pixel are ignored.
///
/// The output is reserved up front so an allocation failure is reported instead of aborting.
pub fn rgb_to_gray(rgb: &[u8]) -> Result<Vec<u8>, TryReserveError> {
    let mut gray = Vec::new();
    gray.try_reserve_exact(rgb.len() / 3)?;
    gray.extend(rgb.chunks_exact(3).map(|px| luma(px[0], px[1], px[2])));
    Ok(gray)
}

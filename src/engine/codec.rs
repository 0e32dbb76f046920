//! Image decode/encode collaborators backed by the `image` crate.
//!
//! These are leaf operations: the pipeline only needs "file to 3-channel raster" and
//! "1-channel raster to PNG file". Failures come back as the decoder/encoder's message.

use image::{ExtendedColorType, ImageFormat, ImageReader};
use std::path::Path;

use crate::types::{Channels, WorkItem};

/// A decoded image with interleaved RGB bytes.
#[derive(Debug)]
pub struct RgbRaster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode `path` to 3 interleaved channels regardless of the source channel count.
/// The format is guessed from content, so extensions do not matter.
pub fn decode_rgb(path: &Path) -> Result<RgbRaster, String> {
    let reader = ImageReader::open(path)
        .map_err(|e| e.to_string())?
        .with_guessed_format()
        .map_err(|e| format!("cannot detect image format: {e}"))?;
    let image = reader.decode().map_err(|e| e.to_string())?.into_rgb8();
    let (width, height) = image.dimensions();
    Ok(RgbRaster {
        width,
        height,
        pixels: image.into_raw(),
    })
}

/// Encode a single-channel item as PNG at `path` (stride = width).
pub fn encode_gray_png(path: &Path, item: &WorkItem) -> Result<(), String> {
    if item.channels() != Channels::Gray {
        return Err(format!(
            "expected 1 channel, got {}",
            item.channels().count()
        ));
    }
    image::save_buffer_with_format(
        path,
        item.pixels(),
        item.width(),
        item.height(),
        ExtendedColorType::L8,
        ImageFormat::Png,
    )
    .map_err(|e| e.to_string())
}

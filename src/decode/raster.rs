//! Raster decoding for embedded bitmap assets.

use std::sync::Arc;

use crate::foundation::error::{DecodeKind, SvgaError, SvgaResult};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Turns encoded image bytes into a [`RasterImage`].
///
/// Implementations run on decode worker threads.
pub trait RasterDecoder: Send + Sync {
    /// Decode `bytes`, failing when the format is unknown or corrupt.
    fn decode(&self, bytes: &[u8]) -> SvgaResult<RasterImage>;
}

/// Default decoder backed by the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateDecoder;

impl RasterDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> SvgaResult<RasterImage> {
        decode_image(bytes)
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> SvgaResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SvgaError::decode(DecodeKind::Structured, format!("decode image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(RasterImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/raster.rs"]
mod tests;

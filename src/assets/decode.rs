use std::io::Cursor;

use anyhow::Context;

use crate::assets::raster::Image;
use crate::foundation::error::{MockupError, MockupResult};

/// Decode encoded image bytes (PNG, JPEG, or anything `image` recognizes) into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> MockupResult<Image> {
    if bytes.is_empty() {
        return Err(MockupError::image_decode("input is empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| MockupError::image_decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Image::from_rgba8(width, height, rgba.into_raw())
}

/// Encode an image as PNG. PNG is lossless, so the alpha channel survives unchanged.
pub fn encode_png(img: &Image) -> MockupResult<Vec<u8>> {
    let rgba = img.to_rgba_image()?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")
        .map_err(|e| MockupError::image_encode(format!("{e:#}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

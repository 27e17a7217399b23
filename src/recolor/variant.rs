//! Single-image recolor: flat alpha-bounded fill or shaded tint.

use crate::assets::color::parse_hex_rgb;
use crate::assets::decode::{decode_image, encode_png};
use crate::assets::raster::Image;
use crate::composition::model::ColorSpec;
use crate::effects::composite::composite_over_rgba8_premul;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{MockupError, MockupResult};
use crate::foundation::math::unit_to_u8;

/// Recolor `image` to `spec.hex_color`.
///
/// With `preserve_transparency` the result is a flat fill of the target color bounded by the
/// source alpha. Otherwise a fill layer of the target color at `intensity` is blended over the
/// source with `blend_mode`, keeping its shading visible.
#[tracing::instrument(skip(image), fields(size = ?image.dimensions()))]
pub fn generate_color_variant(image: &Image, spec: &ColorSpec) -> MockupResult<Image> {
    let rgb = parse_hex_rgb(&spec.hex_color)?;
    let (w, h) = image.dimensions();

    if spec.preserve_transparency {
        let alpha = extract_alpha(image);
        let flat = flat_color_layer(w, h, rgb)?;
        return join_alpha(&flat, &alpha);
    }

    let fill_alpha = intensity_to_alpha(spec.intensity)?;
    let fill = Rgba8Premul::from_straight_rgba(rgb[0], rgb[1], rgb[2], fill_alpha).to_array();
    let layer = fill.repeat((w as usize) * (h as usize));

    let mut out = image.to_premul_vec();
    composite_over_rgba8_premul(&mut out, &layer, 1.0, spec.blend_mode)?;
    Image::from_premul(w, h, out)
}

/// Decode `bytes`, run [`generate_color_variant`], and encode the result as PNG.
pub fn generate_color_variant_bytes(bytes: &[u8], spec: &ColorSpec) -> MockupResult<Vec<u8>> {
    let image = decode_image(bytes)?;
    let out = generate_color_variant(&image, spec)?;
    encode_png(&out)
}

pub(crate) fn extract_alpha(image: &Image) -> Vec<u8> {
    image.alpha_channel()
}

/// Opaque `width x height` image of a single color.
pub(crate) fn flat_color_layer(width: u32, height: u32, rgb: [u8; 3]) -> MockupResult<Image> {
    Image::solid(width, height, [rgb[0], rgb[1], rgb[2], 255])
}

/// RGB of `color` with `alpha` as the alpha channel.
pub(crate) fn join_alpha(color: &Image, alpha: &[u8]) -> MockupResult<Image> {
    let (w, h) = color.dimensions();
    if alpha.len() != (w as usize) * (h as usize) {
        return Err(MockupError::validation(
            "alpha channel does not match color layer dimensions",
        ));
    }
    let mut out = color.as_rgba8().to_vec();
    for (px, &a) in out.chunks_exact_mut(4).zip(alpha) {
        px[3] = a;
    }
    Image::from_rgba8(w, h, out)
}

fn intensity_to_alpha(intensity: f32) -> MockupResult<u8> {
    if intensity.is_nan() {
        return Err(MockupError::invalid_color_spec("intensity must be a number"));
    }
    Ok(unit_to_u8(intensity))
}

#[cfg(test)]
#[path = "../../tests/unit/recolor/variant.rs"]
mod tests;

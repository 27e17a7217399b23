use crate::assets::decode::{decode_image, encode_png};
use crate::assets::raster::Image;
use crate::composition::presentation::PresentationConfig;
use crate::effects::composite::{composite_over_rgba8_premul, over_in_place};
use crate::effects::shadow::{ShadowOpts, shadow_layer_rgba8_premul};
use crate::foundation::core::Canvas;
use crate::foundation::error::MockupResult;
use crate::render::stage::{
    Resample, design_center, design_size, draw_background, place_design_layer, resize_premul,
};

/// Output and rendering options shared by [`composite`] and the overlay fallback.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositorOpts {
    /// Fixed output size.
    pub canvas: Canvas,
    /// Straight RGBA color behind the background (visible in letterbox areas).
    pub background_fill: [u8; 4],
    /// Keep the background's own alpha instead of treating it as opaque.
    pub respect_background_alpha: bool,
    /// Drop shadow beneath the design; `None` disables it.
    pub shadow: Option<ShadowOpts>,
    /// Resampling filter for scaling.
    pub resample: Resample,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            background_fill: [255, 255, 255, 255],
            respect_background_alpha: false,
            shadow: Some(ShadowOpts::default()),
            resample: Resample::default(),
        }
    }
}

/// Render `foreground` (the design) onto `background` (the product photo).
///
/// The output is always `opts.canvas` sized. The background is fit within the canvas and
/// centered; the design is scaled, centered on `(left, top)`, rotated by `angle`, and blended
/// with `blend_mode` at `opacity`. Transparent design pixels leave the background untouched
/// (apart from the optional shadow).
#[tracing::instrument(skip_all, fields(
    bg = ?background.dimensions(),
    fg = ?foreground.dimensions(),
    blend = %config.blend_mode,
))]
pub fn composite(
    background: &Image,
    foreground: &Image,
    config: &PresentationConfig,
    opts: &CompositorOpts,
) -> MockupResult<Image> {
    opts.canvas.validate()?;
    config.validate()?;

    let mut surface = draw_background(
        opts.canvas,
        opts.background_fill,
        background,
        opts.respect_background_alpha,
        opts.resample,
    )?;

    let (fw, fh) = foreground.dimensions();
    let (dw, dh) = design_size(fw, fh, config, opts.canvas)?;
    let design = resize_premul(foreground.to_premul_vec(), fw, fh, dw, dh, opts.resample)?;
    let center = design_center(config, opts.canvas);
    let layer = place_design_layer(&design, dw, dh, center, config.angle, opts.canvas)?;
    tracing::debug!(dw, dh, cx = center.x, cy = center.y, angle = config.angle, "design placed");

    if let Some(shadow) = &opts.shadow {
        let shadow_layer =
            shadow_layer_rgba8_premul(&layer.data, layer.width, layer.height, shadow)?;
        over_in_place(&mut surface.data, &shadow_layer, config.opacity)?;
    }

    composite_over_rgba8_premul(
        &mut surface.data,
        &layer.data,
        config.opacity,
        config.blend_mode,
    )?;

    surface.into_image()
}

/// Decode both inputs, run [`composite`], and encode the result as PNG.
///
/// Either input failing to decode yields [`MockupError::ImageDecode`](crate::MockupError) and no
/// output.
pub fn composite_bytes(
    background: &[u8],
    foreground: &[u8],
    config: &PresentationConfig,
    opts: &CompositorOpts,
) -> MockupResult<Vec<u8>> {
    let background = decode_image(background)?;
    let foreground = decode_image(foreground)?;
    let out = composite(&background, &foreground, config, opts)?;
    encode_png(&out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;

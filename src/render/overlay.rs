use crate::assets::raster::Image;
use crate::composition::presentation::{MAX_DESIGN_SCALE, PresentationConfig};
use crate::foundation::error::MockupResult;
use crate::render::compositor::CompositorOpts;
use crate::render::stage::{design_center, design_size, draw_background, resize_premul};

/// Lower-fidelity mockup: plain alpha-over of the design, no rotation, blend mode or shadow.
///
/// Size and position follow the same category rules as [`composite`](crate::composite), so the
/// result lines up with what the full compositor would have drawn. Fields of `config` that the
/// full compositor would reject fall back to their defaults here, so this path only fails on
/// unusable canvases or buffers.
pub fn overlay_design(
    background: &Image,
    foreground: &Image,
    config: &PresentationConfig,
    opts: &CompositorOpts,
) -> MockupResult<Image> {
    opts.canvas.validate()?;
    let config = sanitized(config);

    let mut surface = draw_background(
        opts.canvas,
        opts.background_fill,
        background,
        opts.respect_background_alpha,
        opts.resample,
    )?;

    let (fw, fh) = foreground.dimensions();
    let (dw, dh) = design_size(fw, fh, &config, opts.canvas)?;
    let design = resize_premul(foreground.to_premul_vec(), fw, fh, dw, dh, opts.resample)?;
    let center = design_center(&config, opts.canvas);
    let x = (center.x - f64::from(dw) / 2.0).round() as i64;
    let y = (center.y - f64::from(dh) / 2.0).round() as i64;
    surface.blit_over(&design, dw, dh, x, y, config.opacity);

    surface.into_image()
}

fn sanitized(config: &PresentationConfig) -> PresentationConfig {
    let defaults = PresentationConfig::default();
    let scale = |v: f64, d: f64| {
        if v.is_finite() && v > 0.0 && v <= MAX_DESIGN_SCALE {
            v
        } else {
            d
        }
    };
    let finite = |v: f64, d: f64| if v.is_finite() { v } else { d };
    PresentationConfig {
        scale_x: scale(config.scale_x, defaults.scale_x),
        scale_y: scale(config.scale_y, defaults.scale_y),
        top: finite(config.top, defaults.top),
        left: finite(config.left, defaults.left),
        angle: 0.0,
        opacity: if config.opacity.is_nan() {
            defaults.opacity
        } else {
            config.opacity.clamp(0.0, 1.0)
        },
        blend_mode: config.blend_mode,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;

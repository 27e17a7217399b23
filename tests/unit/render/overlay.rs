use super::*;
use crate::composition::model::BlendMode;
use crate::foundation::core::Canvas;

fn opts() -> CompositorOpts {
    CompositorOpts {
        canvas: Canvas::new(20, 20).unwrap(),
        shadow: None,
        ..CompositorOpts::default()
    }
}

#[test]
fn overlay_uses_same_box_as_compositor_with_plain_alpha() {
    let bg = Image::solid(20, 20, [0, 0, 0, 255]).unwrap();
    let fg = Image::solid(10, 10, [255, 255, 255, 255]).unwrap();
    let cfg = PresentationConfig {
        scale_x: 0.5,
        scale_y: 0.5,
        opacity: 1.0,
        blend_mode: BlendMode::Multiply,
        ..PresentationConfig::default()
    };
    let out = overlay_design(&bg, &fg, &cfg, &opts()).unwrap();

    // Multiply is ignored: white shows on black.
    assert_eq!(out.pixel(5, 5), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(14, 14), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(4, 4), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(15, 15), Some([0, 0, 0, 255]));
}

#[test]
fn overlay_applies_opacity_and_respects_design_alpha() {
    let bg = Image::solid(20, 20, [0, 0, 0, 255]).unwrap();
    let mut px = [255u8, 255, 255, 255].repeat(100);
    // Top-left design pixel transparent.
    px[3] = 0;
    let fg = Image::from_rgba8(10, 10, px).unwrap();
    let cfg = PresentationConfig {
        scale_x: 0.5,
        scale_y: 0.5,
        opacity: 0.5,
        ..PresentationConfig::default()
    };
    let out = overlay_design(&bg, &fg, &cfg, &opts()).unwrap();
    assert_eq!(out.pixel(5, 5), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(6, 6), Some([128, 128, 128, 255]));
}

#[test]
fn overlay_tolerates_configs_the_compositor_rejects() {
    let bg = Image::solid(20, 20, [0, 0, 0, 255]).unwrap();
    let fg = Image::solid(10, 10, [255, 255, 255, 255]).unwrap();
    let cfg = PresentationConfig {
        scale_x: f64::NAN,
        scale_y: 1e6,
        opacity: 7.0,
        angle: f64::INFINITY,
        ..PresentationConfig::default()
    };
    assert!(cfg.validate().is_err());
    let out = overlay_design(&bg, &fg, &cfg, &opts()).unwrap();
    assert_eq!(out.dimensions(), (20, 20));
    assert_eq!(out.pixel(10, 10), Some([255, 255, 255, 255]));
}

use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn multiply_opaque_is_multiply() {
    let mut dst = vec![128u8, 128, 128, 255];
    let src = vec![128u8, 0, 0, 255];
    composite_over_rgba8_premul(&mut dst, &src, 1.0, BlendMode::Multiply).unwrap();
    assert_eq!(dst, vec![64, 0, 0, 255]);
}

#[test]
fn screen_opaque_lightens() {
    let mut dst = vec![128u8, 0, 255, 255];
    let src = vec![128u8, 0, 0, 255];
    composite_over_rgba8_premul(&mut dst, &src, 1.0, BlendMode::Screen).unwrap();
    // 0.502 + 0.502 - 0.252 = 0.752
    assert_eq!(dst, vec![192, 0, 255, 255]);
}

#[test]
fn overlay_switches_on_backdrop() {
    let src = vec![128u8, 128, 128, 255];

    let mut dark = vec![64u8, 64, 64, 255];
    composite_over_rgba8_premul(&mut dark, &src, 1.0, BlendMode::Overlay).unwrap();
    assert_eq!(dark[0], 64);

    let mut light = vec![192u8, 192, 192, 255];
    composite_over_rgba8_premul(&mut light, &src, 1.0, BlendMode::Overlay).unwrap();
    assert_eq!(light[0], 192);
}

#[test]
fn transparent_src_and_zero_opacity_leave_dst() {
    let mut dst = vec![10u8, 20, 30, 255];
    composite_over_rgba8_premul(&mut dst, &[255, 255, 255, 0], 1.0, BlendMode::Screen).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
    composite_over_rgba8_premul(&mut dst, &[0, 0, 0, 255], 0.0, BlendMode::Multiply).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn opacity_mixes_blend_with_backdrop() {
    let mut dst = vec![255u8, 255, 255, 255];
    let src = vec![255u8, 0, 0, 255];
    composite_over_rgba8_premul(&mut dst, &src, 0.9, BlendMode::Multiply).unwrap();
    // G: 1.0 * 0.1 + 0.0 * 0.9 = 0.1
    assert_eq!(dst, vec![255, 26, 26, 255]);
}

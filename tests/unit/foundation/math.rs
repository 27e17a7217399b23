use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_then_unpremultiply_recovers_color() {
    let mut px = vec![100u8, 50, 0, 128, 10, 20, 30, 255, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[4..8], &[10, 20, 30, 255]);
    assert_eq!(&px[8..12], &[0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[100, 50, 0, 128]);
}

#[test]
fn unit_to_u8_clamps_and_rounds() {
    assert_eq!(unit_to_u8(-1.0), 0);
    assert_eq!(unit_to_u8(0.5), 128);
    assert_eq!(unit_to_u8(2.0), 255);
}

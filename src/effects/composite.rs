use crate::composition::model::BlendMode;
use crate::foundation::error::{MockupError, MockupResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8, unit_to_u8};

pub(crate) type PremulRgba8 = [u8; 4];

/// Plain premultiplied source-over with an extra opacity factor.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub(crate) fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> MockupResult<()> {
    check_pair(dst, src, "over_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite premultiplied `src` over premultiplied `dst` with a separable blend.
pub(crate) fn composite_over_rgba8_premul(
    dst: &mut [u8],
    src: &[u8],
    opacity: f32,
    blend: BlendMode,
) -> MockupResult<()> {
    check_pair(dst, src, "composite_over_rgba8_premul")?;

    // Dispatch once per call; each arm monomorphizes its own kernel.
    match blend {
        BlendMode::Multiply => composite_over_rgba8_premul_blend(dst, src, opacity, |s, d| s * d),
        BlendMode::Screen => {
            composite_over_rgba8_premul_blend(dst, src, opacity, |s, d| s + d - s * d)
        }
        BlendMode::Overlay => composite_over_rgba8_premul_blend(dst, src, opacity, |s, d| {
            if d <= 0.5 {
                2.0 * s * d
            } else {
                1.0 - 2.0 * (1.0 - s) * (1.0 - d)
            }
        }),
    }
    Ok(())
}

#[inline(always)]
fn composite_over_rgba8_premul_blend<F>(dst: &mut [u8], src: &[u8], opacity: f32, blend_fn: F)
where
    F: Fn(f32, f32) -> f32,
{
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        // out_a = sa + da * (1 - sa)
        // out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
        let sa = (f32::from(s[3]) / 255.0) * opacity;
        let da = f32::from(d[3]) / 255.0;
        let inv_sa = 1.0 - sa;
        let out_a = (sa + da * inv_sa).clamp(0.0, 1.0);

        for c in 0..3 {
            let sp = (f32::from(s[c]) / 255.0) * opacity;
            let dp = f32::from(d[c]) / 255.0;
            let sc = if sa > 0.0 { (sp / sa).clamp(0.0, 1.0) } else { 0.0 };
            let dc = if da > 0.0 { (dp / da).clamp(0.0, 1.0) } else { 0.0 };
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out_p = (sp * (1.0 - da) + dp * inv_sa + b * sa * da).clamp(0.0, 1.0);
            d[c] = unit_to_u8(out_p);
        }
        d[3] = unit_to_u8(out_a);
    }
}

fn check_pair(dst: &[u8], src: &[u8], what: &str) -> MockupResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(MockupError::validation(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;

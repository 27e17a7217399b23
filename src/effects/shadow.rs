use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{MockupError, MockupResult};
use crate::foundation::math::mul_div255_u8;

/// Soft drop shadow drawn beneath a placed design.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShadowOpts {
    /// Offset in canvas pixels (`+x` right, `+y` down).
    pub offset: (i32, i32),
    /// Blur radius in pixels; `0` gives a hard shadow.
    pub blur_radius: u32,
    /// Gaussian sigma.
    pub sigma: f32,
    /// Shadow color as straight RGBA8.
    pub color: [u8; 4],
}

impl Default for ShadowOpts {
    fn default() -> Self {
        Self {
            offset: (4, 6),
            blur_radius: 8,
            sigma: 4.0,
            color: [0, 0, 0, 64],
        }
    }
}

/// Build a premultiplied shadow layer from the alpha of a premultiplied design layer.
///
/// The silhouette is tinted with `opts.color`, shifted by `opts.offset`, then blurred.
pub(crate) fn shadow_layer_rgba8_premul(
    layer: &[u8],
    width: u32,
    height: u32,
    opts: &ShadowOpts,
) -> MockupResult<Vec<u8>> {
    let expected_len = buffer_len(width, height)?;
    if layer.len() != expected_len {
        return Err(MockupError::validation(
            "shadow layer expects src matching width*height*4",
        ));
    }

    let tint = Rgba8Premul::from_straight_rgba(
        opts.color[0],
        opts.color[1],
        opts.color[2],
        opts.color[3],
    )
    .to_array();
    let (dx, dy) = opts.offset;
    let (w, h) = (width as i64, height as i64);

    let mut shifted = vec![0u8; expected_len];
    for y in 0..h {
        let sy = y - i64::from(dy);
        if sy < 0 || sy >= h {
            continue;
        }
        for x in 0..w {
            let sx = x - i64::from(dx);
            if sx < 0 || sx >= w {
                continue;
            }
            let a = u16::from(layer[((sy * w + sx) as usize) * 4 + 3]);
            if a == 0 {
                continue;
            }
            let idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                shifted[idx + c] = mul_div255_u8(u16::from(tint[c]), a);
            }
        }
    }

    blur_rgba8_premul(&shifted, width, height, opts.blur_radius, opts.sigma)
}

/// Separable Gaussian blur over premultiplied RGBA8 using a Q16 fixed-point kernel.
pub(crate) fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> MockupResult<Vec<u8>> {
    let expected_len = buffer_len(width, height)?;
    if src.len() != expected_len {
        return Err(MockupError::validation(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn buffer_len(width: u32, height: u32) -> MockupResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| MockupError::validation("blur buffer size overflow"))
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> MockupResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(MockupError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(MockupError::validation("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();

    // Put the rounding remainder on the center tap so the kernel sums to exactly 1.0.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shadow.rs"]
mod tests;

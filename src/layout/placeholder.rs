use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{MockupError, MockupResult};

/// Minimum side of a percentage-space placeholder.
pub const MIN_RELATIVE_SIZE: f64 = 1.0;
/// Minimum side of a pixel-space placeholder.
pub const MIN_ABSOLUTE_SIZE: f64 = 10.0;

/// Rectangle where a design is placed on a background.
///
/// `is_relative` selects the coordinate space: percentages (0..=100) of the canvas, or absolute
/// pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacementRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// `true` for percentage coordinates, `false` for pixels.
    #[serde(default, alias = "isRelative")]
    pub is_relative: bool,
}

impl PlacementRect {
    /// Pixel-space rectangle.
    pub fn absolute(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            is_relative: false,
        }
    }

    /// Percentage-space rectangle.
    pub fn relative(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            is_relative: true,
        }
    }

    /// The same rectangle as a `kurbo::Rect` (coordinates unchanged).
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

fn check_canvas(canvas_w: f64, canvas_h: f64) -> MockupResult<()> {
    if !canvas_w.is_finite() || !canvas_h.is_finite() || canvas_w <= 0.0 || canvas_h <= 0.0 {
        return Err(MockupError::validation(format!(
            "canvas size must be finite and > 0, got {canvas_w}x{canvas_h}"
        )));
    }
    Ok(())
}

/// Convert a pixel-space rectangle into percentages of `canvas_w x canvas_h`.
///
/// A rectangle that is already relative is returned unchanged.
pub fn convert_to_percentage(
    rect: PlacementRect,
    canvas_w: f64,
    canvas_h: f64,
) -> MockupResult<PlacementRect> {
    check_canvas(canvas_w, canvas_h)?;
    if rect.is_relative {
        return Ok(rect);
    }
    Ok(PlacementRect::relative(
        rect.x / canvas_w * 100.0,
        rect.y / canvas_h * 100.0,
        rect.width / canvas_w * 100.0,
        rect.height / canvas_h * 100.0,
    ))
}

/// Inverse of [`convert_to_percentage`].
///
/// A rectangle that is already absolute is returned unchanged.
pub fn convert_from_percentage(
    rect: PlacementRect,
    canvas_w: f64,
    canvas_h: f64,
) -> MockupResult<PlacementRect> {
    check_canvas(canvas_w, canvas_h)?;
    if !rect.is_relative {
        return Ok(rect);
    }
    Ok(PlacementRect::absolute(
        rect.x * canvas_w / 100.0,
        rect.y * canvas_h / 100.0,
        rect.width * canvas_w / 100.0,
        rect.height * canvas_h / 100.0,
    ))
}

/// Clamp a placeholder into its boundary.
///
/// The boundary is `100 x 100` for relative rectangles and `image_w x image_h` for absolute ones.
/// Sides are kept at least [`MIN_RELATIVE_SIZE`] / [`MIN_ABSOLUTE_SIZE`] unless the boundary
/// itself is smaller. Non-finite components are treated as `0`. The result satisfies
/// `0 <= x`, `0 <= y`, `x + width <= boundary_w`, `y + height <= boundary_h`, and normalizing it
/// again returns it unchanged.
pub fn normalize_placeholder(
    rect: PlacementRect,
    image_w: f64,
    image_h: f64,
) -> MockupResult<PlacementRect> {
    let (bound_w, bound_h, min_side) = if rect.is_relative {
        (100.0, 100.0, MIN_RELATIVE_SIZE)
    } else {
        if !image_w.is_finite() || !image_h.is_finite() || image_w < 0.0 || image_h < 0.0 {
            return Err(MockupError::validation(format!(
                "image size must be finite and >= 0, got {image_w}x{image_h}"
            )));
        }
        (image_w, image_h, MIN_ABSOLUTE_SIZE)
    };

    let (x, width) = clamp_axis(rect.x, rect.width, bound_w, min_side);
    let (y, height) = clamp_axis(rect.y, rect.height, bound_h, min_side);

    Ok(PlacementRect {
        x,
        y,
        width,
        height,
        is_relative: rect.is_relative,
    })
}

fn clamp_axis(pos: f64, len: f64, bound: f64, min_side: f64) -> (f64, f64) {
    let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
    let min_len = min_side.min(bound);
    let pos = finite_or_zero(pos).clamp(0.0, bound - min_len);
    let len = finite_or_zero(len).clamp(min_len, bound - pos);
    (pos, len)
}

/// Center point of a rectangle.
pub fn get_center(rect: PlacementRect) -> Point {
    Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

/// Rectangle of the given size centered on `center`.
pub fn create_centered_rect(
    center: Point,
    width: f64,
    height: f64,
    is_relative: bool,
) -> PlacementRect {
    PlacementRect {
        x: center.x - width / 2.0,
        y: center.y - height / 2.0,
        width,
        height,
        is_relative,
    }
}

/// Scale width and height by `factor` while keeping the center fixed.
pub fn scale_rect(rect: PlacementRect, factor: f64) -> MockupResult<PlacementRect> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(MockupError::validation(format!(
            "scale factor must be finite and >= 0, got {factor}"
        )));
    }
    Ok(create_centered_rect(
        get_center(rect),
        rect.width * factor,
        rect.height * factor,
        rect.is_relative,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placeholder.rs"]
mod tests;

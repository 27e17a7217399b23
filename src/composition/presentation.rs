//! Category-driven placement rules.
//!
//! Product photos carry presentation tags ("Closeup", "Dark", "Side View", ...). A fixed,
//! ordered rule table turns a tag set into a [`PresentationConfig`]. Each rule belongs to one
//! axis and patches only the fields it names:
//!
//! - **Size**: only the first matching rule applies.
//! - **Blend** and **Orientation**: every matching rule applies in table order, so the last
//!   match wins per field.
//!
//! The axes are independent of each other.

use crate::composition::model::BlendMode;
use crate::foundation::core::Canvas;
use crate::foundation::error::{MockupError, MockupResult};
use crate::layout::placeholder::{PlacementRect, convert_to_percentage, normalize_placeholder};

/// Largest accepted `scale_x` / `scale_y`: the design may overflow the canvas, within limits.
pub const MAX_DESIGN_SCALE: f64 = 4.0;

/// Placement and blend parameters for drawing a design onto a product.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PresentationConfig {
    /// Design width budget as a fraction of the canvas width.
    pub scale_x: f64,
    /// Design height budget as a fraction of the canvas height.
    pub scale_y: f64,
    /// Vertical position of the design center as a fraction of the canvas height.
    pub top: f64,
    /// Horizontal position of the design center as a fraction of the canvas width.
    pub left: f64,
    /// Clockwise rotation about the design center, in degrees.
    pub angle: f64,
    /// Design opacity in `[0, 1]`.
    pub opacity: f32,
    /// Blend operator.
    pub blend_mode: BlendMode,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            scale_x: 0.35,
            scale_y: 0.35,
            top: 0.5,
            left: 0.5,
            angle: 0.0,
            opacity: 0.9,
            blend_mode: BlendMode::Multiply,
        }
    }
}

impl PresentationConfig {
    /// Reject configs the renderers cannot draw.
    pub fn validate(&self) -> MockupResult<()> {
        for (name, v) in [("scale_x", self.scale_x), ("scale_y", self.scale_y)] {
            if !v.is_finite() || v <= 0.0 || v > MAX_DESIGN_SCALE {
                return Err(MockupError::validation(format!(
                    "{name} must be in (0, {MAX_DESIGN_SCALE}], got {v}"
                )));
            }
        }
        for (name, v) in [("top", self.top), ("left", self.left), ("angle", self.angle)] {
            if !v.is_finite() {
                return Err(MockupError::validation(format!(
                    "{name} must be finite, got {v}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(MockupError::validation(format!(
                "opacity must be in [0, 1], got {}",
                self.opacity
            )));
        }
        Ok(())
    }

    /// Override position and scale with an explicit placeholder on `canvas`.
    ///
    /// The rectangle is normalized first; its center becomes `left`/`top` and its size becomes
    /// the scale budget. Angle, opacity and blend mode are kept.
    pub fn with_placement(self, rect: PlacementRect, canvas: Canvas) -> MockupResult<Self> {
        canvas.validate()?;
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let rect = normalize_placeholder(rect, w, h)?;
        let pct = convert_to_percentage(rect, w, h)?;
        Ok(Self {
            scale_x: pct.width / 100.0,
            scale_y: pct.height / 100.0,
            left: (pct.x + pct.width / 2.0) / 100.0,
            top: (pct.y + pct.height / 2.0) / 100.0,
            ..self
        })
    }
}

/// Which independent group of fields a rule belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleAxis {
    /// Design scale (first match wins).
    Size,
    /// Blend mode and opacity (last match wins).
    Blend,
    /// Rotation (last match wins).
    Orientation,
}

/// Partial update of a [`PresentationConfig`]; `None` fields are left untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfigPatch {
    /// Uniform scale for both axes.
    pub scale: Option<f64>,
    /// Rotation in degrees.
    pub angle: Option<f64>,
    /// Opacity.
    pub opacity: Option<f32>,
    /// Blend operator.
    pub blend_mode: Option<BlendMode>,
}

impl ConfigPatch {
    /// Patch that changes nothing.
    pub const NONE: Self = Self {
        scale: None,
        angle: None,
        opacity: None,
        blend_mode: None,
    };

    fn apply(&self, cfg: &mut PresentationConfig) {
        if let Some(s) = self.scale {
            cfg.scale_x = s;
            cfg.scale_y = s;
        }
        if let Some(a) = self.angle {
            cfg.angle = a;
        }
        if let Some(o) = self.opacity {
            cfg.opacity = o;
        }
        if let Some(b) = self.blend_mode {
            cfg.blend_mode = b;
        }
    }
}

/// One entry of the rule table: matches when any of `any_of` is present in the tag set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryRule {
    /// Axis the rule belongs to.
    pub axis: RuleAxis,
    /// Tags that trigger the rule.
    pub any_of: &'static [&'static str],
    /// Fields to set.
    pub patch: ConfigPatch,
}

/// The ordered rule table.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        axis: RuleAxis::Size,
        any_of: &["Closeup"],
        patch: ConfigPatch {
            scale: Some(0.5),
            ..ConfigPatch::NONE
        },
    },
    CategoryRule {
        axis: RuleAxis::Size,
        any_of: &["Without People", "Blank"],
        patch: ConfigPatch {
            scale: Some(0.6),
            ..ConfigPatch::NONE
        },
    },
    CategoryRule {
        axis: RuleAxis::Size,
        any_of: &["Mannequin"],
        patch: ConfigPatch {
            scale: Some(0.45),
            angle: Some(0.0),
            ..ConfigPatch::NONE
        },
    },
    CategoryRule {
        axis: RuleAxis::Size,
        any_of: &["Oversized"],
        patch: ConfigPatch {
            scale: Some(0.3),
            ..ConfigPatch::NONE
        },
    },
    CategoryRule {
        axis: RuleAxis::Size,
        any_of: &["Boxy"],
        patch: ConfigPatch {
            scale: Some(0.45),
            ..ConfigPatch::NONE
        },
    },
    CategoryRule {
        axis: RuleAxis::Blend,
        any_of: &["Dark", "Black"],
        patch: ConfigPatch {
            opacity: Some(0.85),
            blend_mode: Some(BlendMode::Screen),
            ..ConfigPatch::NONE
        },
    },
    CategoryRule {
        axis: RuleAxis::Blend,
        any_of: &["Colored"],
        patch: ConfigPatch {
            opacity: Some(0.9),
            blend_mode: Some(BlendMode::Overlay),
            ..ConfigPatch::NONE
        },
    },
    CategoryRule {
        axis: RuleAxis::Orientation,
        any_of: &["Side View"],
        patch: ConfigPatch {
            angle: Some(15.0),
            ..ConfigPatch::NONE
        },
    },
    // Back views keep the design upright.
    CategoryRule {
        axis: RuleAxis::Orientation,
        any_of: &["Back View"],
        patch: ConfigPatch {
            angle: Some(0.0),
            ..ConfigPatch::NONE
        },
    },
];

/// Derive the presentation config for a set of category tags using [`CATEGORY_RULES`].
///
/// Tags match exactly. Unknown tags are ignored.
pub fn compute_placement_config<I, S>(categories: I) -> PresentationConfig
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tags: Vec<S> = categories.into_iter().collect();
    let has = |tag: &str| tags.iter().any(|t| t.as_ref() == tag);

    let mut cfg = PresentationConfig::default();
    let mut size_matched = false;
    for (idx, rule) in CATEGORY_RULES.iter().enumerate() {
        if rule.axis == RuleAxis::Size && size_matched {
            continue;
        }
        if !rule.any_of.iter().any(|tag| has(*tag)) {
            continue;
        }
        if rule.axis == RuleAxis::Size {
            size_matched = true;
        }
        tracing::debug!(
            rule = idx,
            axis = ?rule.axis,
            tags = ?rule.any_of,
            "category rule matched"
        );
        rule.patch.apply(&mut cfg);
    }
    cfg
}

#[cfg(test)]
#[path = "../../tests/unit/composition/presentation.rs"]
mod tests;

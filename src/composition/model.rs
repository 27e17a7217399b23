use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assets::palette;
use crate::foundation::error::{MockupError, MockupResult};

/// Separable blend operator used when layering a design or a tint over a product image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BlendMode {
    /// `s * d`: darkens, keeps the backdrop's shading.
    #[default]
    Multiply,
    /// `s + d - s * d`: lightens, used on dark garments.
    Screen,
    /// Multiply or screen depending on the backdrop value.
    Overlay,
}

impl BlendMode {
    /// Lowercase name as used in requests.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
        }
    }
}

impl FromStr for BlendMode {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multiply" => Ok(Self::Multiply),
            "screen" => Ok(Self::Screen),
            "overlay" => Ok(Self::Overlay),
            _ => Err(MockupError::unsupported_blend_mode(format!(
                "\"{s}\" (expected multiply, screen or overlay)"
            ))),
        }
    }
}

impl TryFrom<String> for BlendMode {
    type Error = MockupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BlendMode> for String {
    fn from(value: BlendMode) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_intensity() -> f32 {
    0.8
}

/// One recolor request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorSpec {
    /// Target color as `#RRGGBB`.
    #[serde(alias = "hexColor")]
    pub hex_color: String,
    /// Flat fill bounded by the source alpha (`true`) or shaded tint (`false`).
    #[serde(default, alias = "preserveTransparency")]
    pub preserve_transparency: bool,
    /// Blend used by the shaded tint.
    #[serde(default, alias = "blendMode")]
    pub blend_mode: BlendMode,
    /// Tint layer opacity in `[0, 1]`, used by the shaded tint.
    #[serde(default = "default_intensity")]
    pub intensity: f32,
}

impl ColorSpec {
    /// Flat, alpha-preserving recolor to `hex_color`.
    pub fn flat(hex_color: impl Into<String>) -> Self {
        Self {
            hex_color: hex_color.into(),
            preserve_transparency: true,
            blend_mode: BlendMode::default(),
            intensity: default_intensity(),
        }
    }

    /// Shaded tint of `hex_color` blended over the source.
    pub fn tint(hex_color: impl Into<String>, blend_mode: BlendMode, intensity: f32) -> Self {
        Self {
            hex_color: hex_color.into(),
            preserve_transparency: false,
            blend_mode,
            intensity,
        }
    }

    /// Flat recolor to a named palette color.
    pub fn from_palette(name: &str) -> MockupResult<Self> {
        palette::lookup_hex(name).map(Self::flat).ok_or_else(|| {
            MockupError::invalid_color_spec(format!("unknown palette color \"{name}\""))
        })
    }
}

/// A color request tagged with the name its result is keyed by.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedColor {
    /// Display name, e.g. `"Navy"`.
    pub name: String,
    /// Recolor parameters.
    #[serde(flatten)]
    pub spec: ColorSpec,
}

impl NamedColor {
    /// Pair a name with a spec.
    pub fn new(name: impl Into<String>, spec: ColorSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }

    /// Flat recolor request for a palette color, named after it.
    pub fn from_palette(name: &str) -> MockupResult<Self> {
        Ok(Self::new(name.trim(), ColorSpec::from_palette(name)?))
    }
}

/// A persisted color variant as attached to a product record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorVariant {
    /// Color name.
    pub color: String,
    /// Color value as `#RRGGBB`.
    pub hex: String,
    /// Reference returned by the blob store.
    pub image: String,
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;

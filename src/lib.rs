//! Mockup is a CPU image engine for product mockups.
//!
//! It does two things with product photos:
//!
//! - **Design compositing**: draw a user's design onto a product photo at a position, scale and
//!   rotation derived from the product's category tags (or an explicit placeholder), blended with
//!   `multiply | screen | overlay` and a soft drop shadow, on a fixed-size canvas.
//! - **Color variants**: recolor a product cutout to a target color, either as a flat fill bounded
//!   by the original alpha or as a shaded tint that keeps the photo's texture. Batches isolate
//!   per-color failures.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: bytes -> [`Image`] (straight RGBA8, immutable)
//! 2. **Place**: category tags -> [`PresentationConfig`] via the [`CATEGORY_RULES`] table
//! 3. **Composite**: background fit + design resize/rotate + shadow + blend, in premultiplied RGBA8
//! 4. **Encode**: [`Image`] -> PNG bytes
//!
//! [`MockupSession`] ties these to an [`ImageSource`] and a [`BlobStore`], and falls back to a
//! plain alpha overlay when the full compositor cannot render.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Stateless**: every operation is a pure function of its inputs; no caches, no globals.
//! - **Alpha-exact recolor**: the flat recolor never changes the alpha channel.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod composition;
mod effects;
mod foundation;
mod layout;
mod recolor;
mod render;
mod session;

pub use assets::color::{format_hex_rgb, parse_hex_rgb};
pub use assets::decode::{decode_image, encode_png};
pub use assets::palette::{PALETTE, lookup_hex};
pub use assets::raster::Image;
pub use assets::store::{BlobStore, FsAssetStore, ImageSource, normalize_rel_path};
pub use composition::model::{BlendMode, ColorSpec, ColorVariant, NamedColor};
pub use composition::presentation::{
    CATEGORY_RULES, CategoryRule, ConfigPatch, MAX_DESIGN_SCALE, PresentationConfig, RuleAxis,
    compute_placement_config,
};
pub use effects::shadow::ShadowOpts;
pub use foundation::core::{Affine, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use foundation::error::{MockupError, MockupResult};
pub use layout::placeholder::{
    MIN_ABSOLUTE_SIZE, MIN_RELATIVE_SIZE, PlacementRect, convert_from_percentage,
    convert_to_percentage, create_centered_rect, get_center, normalize_placeholder, scale_rect,
};
pub use recolor::batch::{
    BatchOpts, ColorFailure, ColorVariantBatch, RecoloredImage, generate_color_variants,
};
pub use recolor::variant::{generate_color_variant, generate_color_variant_bytes};
pub use render::compositor::{CompositorOpts, composite, composite_bytes};
pub use render::overlay::overlay_design;
pub use render::stage::Resample;
pub use session::mockup_session::{
    ColorVariantReport, Fidelity, MockupOutcome, MockupRequest, MockupSession, SessionOpts,
};

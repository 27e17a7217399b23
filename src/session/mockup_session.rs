use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::assets::color::format_hex_rgb;
use crate::assets::decode::{decode_image, encode_png};
use crate::assets::store::{BlobStore, ImageSource};
use crate::composition::model::{ColorVariant, NamedColor};
use crate::composition::presentation::compute_placement_config;
use crate::foundation::error::{MockupError, MockupResult};
use crate::layout::placeholder::PlacementRect;
use crate::recolor::batch::{BatchOpts, ColorFailure, RecoloredImage, generate_color_variants};
use crate::render::compositor::{CompositorOpts, composite};
use crate::render::overlay::overlay_design;

/// Options for a [`MockupSession`], loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionOpts {
    /// Canvas, shadow and resampling options.
    pub compositor: CompositorOpts,
    /// Color batch execution options.
    pub batch: BatchOpts,
}

impl SessionOpts {
    /// Parse options from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> MockupResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| MockupError::validation(format!("parse session options JSON: {e}")))
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MockupResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MockupError::validation(format!("open session options '{}': {e}", path.display()))
        })?;
        let r = BufReader::new(f);
        Self::from_reader(r)
    }

    /// Parse options from any JSON reader.
    pub fn from_reader(r: impl Read) -> MockupResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| MockupError::validation(format!("parse session options JSON: {e}")))
    }
}

/// One mockup to render.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MockupRequest {
    /// Reference to the product photo.
    pub background: String,
    /// Reference to the user's design.
    pub design: String,
    /// Product category tags driving the placement rules.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Explicit placeholder overriding the category position and scale.
    #[serde(default)]
    pub placement: Option<PlacementRect>,
    /// Name to persist the rendered PNG under.
    pub output_name: String,
}

/// Which renderer produced a mockup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fidelity {
    /// Full compositor: rotation, blend mode and shadow.
    Full,
    /// Plain alpha overlay after the compositor failed.
    Fallback,
}

/// A persisted mockup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockupOutcome {
    /// Reference returned by the blob store.
    pub reference: String,
    /// Renderer that produced it.
    pub fidelity: Fidelity,
}

/// Persisted color variants and the colors that did not make it.
#[derive(Debug, Default)]
pub struct ColorVariantReport {
    /// Variants in name order.
    pub variants: Vec<ColorVariant>,
    /// Colors that failed to render or persist.
    pub failures: Vec<ColorFailure>,
}

/// Loads inputs from an [`ImageSource`], renders, and persists to a [`BlobStore`].
pub struct MockupSession<S, B> {
    source: S,
    store: B,
    opts: SessionOpts,
}

impl<S: ImageSource, B: BlobStore> MockupSession<S, B> {
    /// Create a session over the given source and store.
    pub fn new(source: S, store: B, opts: SessionOpts) -> Self {
        Self {
            source,
            store,
            opts,
        }
    }

    /// Session options.
    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    /// Render a design onto a product and persist the PNG.
    ///
    /// Decode errors are returned as-is. Any other compositor failure drops to the overlay
    /// renderer with the same placement.
    #[tracing::instrument(skip(self), fields(out = %request.output_name))]
    pub fn render_mockup(&self, request: &MockupRequest) -> MockupResult<MockupOutcome> {
        let background = decode_image(&self.source.load_bytes(&request.background)?)?;
        let design = decode_image(&self.source.load_bytes(&request.design)?)?;

        let compositor = &self.opts.compositor;
        let mut config = compute_placement_config(&request.categories);
        if let Some(rect) = request.placement {
            config = config.with_placement(rect, compositor.canvas)?;
        }

        let (image, fidelity) = match composite(&background, &design, &config, compositor) {
            Ok(image) => (image, Fidelity::Full),
            Err(error) => {
                tracing::warn!(%error, "compositor failed, using plain overlay");
                let image = overlay_design(&background, &design, &config, compositor)?;
                (image, Fidelity::Fallback)
            }
        };

        let reference = self.store.persist(&request.output_name, &encode_png(&image)?)?;
        Ok(MockupOutcome {
            reference,
            fidelity,
        })
    }

    /// Recolor a product once per color and persist each variant as
    /// `{output_prefix}-{slug}.png`.
    ///
    /// Only loading or decoding the product, or a bad thread count, fails the whole call.
    #[tracing::instrument(skip(self, colors), fields(colors = colors.len()))]
    pub fn render_color_variants(
        &self,
        product_ref: &str,
        colors: &[NamedColor],
        output_prefix: &str,
    ) -> MockupResult<ColorVariantReport> {
        let product = decode_image(&self.source.load_bytes(product_ref)?)?;
        let batch = generate_color_variants(&product, colors, &self.opts.batch)?;

        let mut report = ColorVariantReport {
            variants: Vec::with_capacity(batch.variants.len()),
            failures: batch.failures,
        };
        for (name, recolored) in batch.variants {
            match self.persist_variant(&name, &recolored, output_prefix) {
                Ok(variant) => report.variants.push(variant),
                Err(error) => {
                    tracing::warn!(color = %name, %error, "persisting color variant failed");
                    report.failures.push(ColorFailure { name, error });
                }
            }
        }
        Ok(report)
    }

    fn persist_variant(
        &self,
        name: &str,
        recolored: &RecoloredImage,
        output_prefix: &str,
    ) -> MockupResult<ColorVariant> {
        let file = format!("{output_prefix}-{}.png", slug(name));
        let image = self.store.persist(&file, &encode_png(&recolored.image)?)?;
        Ok(ColorVariant {
            color: name.to_owned(),
            hex: format_hex_rgb(recolored.rgb),
            image,
        })
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes.
pub(crate) fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("color");
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/session/mockup_session.rs"]
mod tests;

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::assets::color::parse_hex_rgb;
use crate::assets::raster::Image;
use crate::composition::model::NamedColor;
use crate::foundation::error::{MockupError, MockupResult};
use crate::recolor::variant::generate_color_variant;

/// Execution options for [`generate_color_variants`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BatchOpts {
    /// Recolor on a dedicated rayon pool.
    pub parallel: bool,
    /// Worker count for the pool; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

/// One color that could not be generated.
#[derive(Debug)]
pub struct ColorFailure {
    /// Requested color name.
    pub name: String,
    /// Why it failed.
    pub error: MockupError,
}

/// A generated variant together with the color that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoloredImage {
    /// Target color, parsed from the request.
    pub rgb: [u8; 3],
    /// Recolored image.
    pub image: Image,
}

/// Result of a batch recolor: successes keyed by name plus per-color failures.
///
/// A name that appears more than once takes the outcome of its last request, so it is
/// either in `variants` or in `failures`, never both.
#[derive(Debug, Default)]
pub struct ColorVariantBatch {
    /// Generated variants keyed by color name.
    pub variants: BTreeMap<String, RecoloredImage>,
    /// Colors that failed, in request order.
    pub failures: Vec<ColorFailure>,
}

impl ColorVariantBatch {
    /// `true` when every requested color produced a variant.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Recolor `image` once per entry of `colors`.
///
/// Colors are independent: a bad entry is logged and recorded in
/// [`ColorVariantBatch::failures`] while the rest still render. Repeated names keep the outcome
/// of their last request. The only call-level error is an invalid thread count.
#[tracing::instrument(skip(image, colors), fields(colors = colors.len()))]
pub fn generate_color_variants(
    image: &Image,
    colors: &[NamedColor],
    opts: &BatchOpts,
) -> MockupResult<ColorVariantBatch> {
    let results: Vec<MockupResult<RecoloredImage>> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| {
            colors
                .par_iter()
                .map(|c| recolor_one(image, c))
                .collect()
        })
    } else {
        if opts.threads == Some(0) {
            return Err(threads_error());
        }
        colors
            .iter()
            .map(|c| recolor_one(image, c))
            .collect()
    };

    let mut batch = ColorVariantBatch::default();
    for (color, result) in colors.iter().zip(results) {
        batch.failures.retain(|f| f.name != color.name);
        match result {
            Ok(variant) => {
                batch.variants.insert(color.name.clone(), variant);
            }
            Err(error) => {
                tracing::warn!(color = %color.name, %error, "color variant failed");
                batch.variants.remove(&color.name);
                batch.failures.push(ColorFailure {
                    name: color.name.clone(),
                    error,
                });
            }
        }
    }
    tracing::debug!(
        ok = batch.variants.len(),
        failed = batch.failures.len(),
        "color batch finished"
    );
    Ok(batch)
}

fn recolor_one(image: &Image, color: &NamedColor) -> MockupResult<RecoloredImage> {
    let rgb = parse_hex_rgb(&color.spec.hex_color)?;
    let image = generate_color_variant(image, &color.spec)?;
    Ok(RecoloredImage { rgb, image })
}

fn threads_error() -> MockupError {
    MockupError::validation("batch 'threads' must be >= 1 when set")
}

fn build_thread_pool(threads: Option<usize>) -> MockupResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(threads_error());
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MockupError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/recolor/batch.rs"]
mod tests;

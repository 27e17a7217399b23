use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use mockup::{
    BlendMode, ColorSpec, FsAssetStore, ImageSource, MockupRequest, MockupResult, MockupSession,
    NamedColor, SessionOpts,
};

/// Reads inputs straight from the paths given on the command line.
struct PathSource;

impl ImageSource for PathSource {
    fn load_bytes(&self, reference: &str) -> MockupResult<Vec<u8>> {
        let bytes = std::fs::read(reference).with_context(|| format!("read '{reference}'"))?;
        Ok(bytes)
    }
}

#[derive(Parser, Debug)]
#[command(name = "mockup", version)]
struct Cli {
    /// Session options JSON (canvas, shadow, batch threading).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a design onto a product photo as a PNG.
    Composite(CompositeArgs),
    /// Write one recolored PNG per color.
    Recolor(RecolorArgs),
}

#[derive(Parser, Debug)]
struct CompositeArgs {
    /// Product photo.
    #[arg(long)]
    background: PathBuf,

    /// Design image.
    #[arg(long)]
    design: PathBuf,

    /// Product category tag (repeatable), e.g. `--category Closeup`.
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RecolorArgs {
    /// Product cutout image.
    #[arg(long)]
    image: PathBuf,

    /// `NAME` from the palette or `NAME=#RRGGBB` (repeatable).
    #[arg(long = "color", required = true)]
    colors: Vec<String>,

    /// Flat alpha-bounded fill instead of a shaded multiply tint.
    #[arg(long, default_value_t = false)]
    flat: bool,

    /// Directory for the variant PNGs.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let opts = match &cli.config {
        Some(path) => SessionOpts::from_path(path)?,
        None => SessionOpts::default(),
    };
    match cli.cmd {
        Command::Composite(args) => cmd_composite(args, opts),
        Command::Recolor(args) => cmd_recolor(args, opts),
    }
}

fn cmd_composite(args: CompositeArgs, opts: SessionOpts) -> anyhow::Result<()> {
    let (out_dir, out_name) = split_path(&args.out)?;
    let session = MockupSession::new(PathSource, FsAssetStore::new(out_dir), opts);

    let request = MockupRequest {
        background: source_ref(&args.background)?,
        design: source_ref(&args.design)?,
        categories: args.categories,
        placement: None,
        output_name: out_name,
    };
    let outcome = session.render_mockup(&request)?;

    eprintln!("wrote {} ({:?})", args.out.display(), outcome.fidelity);
    Ok(())
}

fn cmd_recolor(args: RecolorArgs, opts: SessionOpts) -> anyhow::Result<()> {
    let colors = args
        .colors
        .iter()
        .map(|c| parse_color_arg(c, args.flat))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let prefix = args
        .image
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("variant")
        .to_owned();

    let session = MockupSession::new(PathSource, FsAssetStore::new(&args.out_dir), opts);
    let report = session.render_color_variants(&source_ref(&args.image)?, &colors, &prefix)?;

    for v in &report.variants {
        eprintln!("wrote {} ({} {})", args.out_dir.join(&v.image).display(), v.color, v.hex);
    }
    for f in &report.failures {
        eprintln!("failed {}: {}", f.name, f.error);
    }
    if !report.failures.is_empty() {
        anyhow::bail!("{} color(s) failed", report.failures.len());
    }
    Ok(())
}

fn parse_color_arg(arg: &str, flat: bool) -> anyhow::Result<NamedColor> {
    let (name, hex) = match arg.split_once('=') {
        Some((name, hex)) => (name.trim(), hex.trim().to_owned()),
        None => {
            let hex = mockup::lookup_hex(arg)
                .with_context(|| format!("unknown palette color '{arg}' (use NAME=#RRGGBB)"))?;
            (arg.trim(), hex.to_owned())
        }
    };
    let spec = if flat {
        ColorSpec::flat(hex)
    } else {
        ColorSpec::tint(hex, BlendMode::Multiply, 0.8)
    };
    Ok(NamedColor::new(name, spec))
}

fn source_ref(path: &Path) -> anyhow::Result<String> {
    path.to_str()
        .map(str::to_owned)
        .with_context(|| format!("non-UTF-8 input path '{}'", path.display()))
}

fn split_path(path: &Path) -> anyhow::Result<(PathBuf, String)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid output path '{}'", path.display()))?
        .to_owned();
    Ok((dir, name))
}

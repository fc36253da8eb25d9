#![forbid(unsafe_code)]

//! ogcard CLI - render social-preview cards from Hugo front matter.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use image::DynamicImage;
use ogcard::{
    Canvas, FontSystem,
    card::render_card,
    config::{CardConfig, DrawingConfig, load_config},
    front_matter::read_front_matter,
};
use rayon::prelude::*;

/// Render social-preview cards from Hugo content files.
#[derive(Debug, Parser)]
#[command(name = "ogcard", version)]
struct Cli {
    /// Content files (Markdown with YAML or TOML front matter).
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Drawing configuration (YAML). Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding `<family>-<Style>.ttf` files.
    #[arg(short, long, default_value = "font")]
    font_dir: PathBuf,

    /// Template image, overrides the one named in the configuration.
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Output file, or directory when it exists or several files are given.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of worker threads.
    #[arg(short, long, default_value_t = default_jobs())]
    jobs: usize,

    /// Enable verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Info,
        (false, 1) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DrawingConfig::default(),
    };
    let config = config.resolve(cli.template.as_deref())?;

    let fonts = FontSystem::from_family_dir(&cli.font_dir)
        .with_context(|| format!("failed to load fonts from {}", cli.font_dir.display()))?;
    if fonts.is_empty() {
        bail!("no font found in {}", cli.font_dir.display());
    }

    let template = image::open(&config.template)
        .with_context(|| format!("failed to open template {}", config.template.display()))?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.jobs.max(1))
        .build()
        .context("failed to start worker threads")?;
    let failures = pool.install(|| {
        render_all(&cli.files, cli.output.as_deref(), &template, &config, &fonts)
    });

    if !failures.is_empty() {
        bail!(
            "{} of {} card(s) failed: {}",
            failures.len(),
            cli.files.len(),
            failures
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

/// Renders every file on the current rayon pool and returns the ones that
/// failed, in input order.
fn render_all<'a>(
    files: &'a [PathBuf],
    output: Option<&Path>,
    template: &DynamicImage,
    config: &CardConfig,
    fonts: &FontSystem,
) -> Vec<&'a PathBuf> {
    let many = files.len() > 1;
    files
        .par_iter()
        .filter_map(|input| {
            let output = output_path(output, input, many);
            match render_file(input, &output, template, config, fonts) {
                Ok(()) => {
                    log::info!("{} -> {}", input.display(), output.display());
                    None
                }
                Err(e) => {
                    log::error!("{}: {e:#}", input.display());
                    Some(input)
                }
            }
        })
        .collect()
}

fn render_file(
    input: &Path,
    output: &Path,
    template: &DynamicImage,
    config: &CardConfig,
    fonts: &FontSystem,
) -> Result<()> {
    let front_matter = read_front_matter(input).context("failed to read front matter")?;

    let mut canvas = Canvas::from_image(template);
    render_card(&mut canvas, &front_matter, config, fonts).context("failed to draw card")?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    canvas.save_png(output)?;
    Ok(())
}

/// Where the card for `input` is written.
///
/// Page bundles (`post/index.md`) are named after their directory.
fn output_path(output: Option<&Path>, input: &Path, many: bool) -> PathBuf {
    let stem = match input.file_stem().and_then(|s| s.to_str()) {
        Some("index" | "_index") => input
            .parent()
            .and_then(Path::file_name)
            .and_then(|s| s.to_str())
            .unwrap_or("index"),
        Some(stem) => stem,
        None => "card",
    };
    let file_name = format!("{stem}.png");

    match output {
        Some(dir) if many || dir.is_dir() => dir.join(file_name),
        Some(file) => file.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

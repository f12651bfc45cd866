use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "layerline", version)]
struct Cli {
    /// Log debug details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a timeline document as PNG, PDF or JSON.
    Render(RenderArgs),
    /// Load a timeline document and check its references.
    Validate(ValidateArgs),
    /// Rewrite a timeline document in canonical form with a version tag.
    Normalize(NormalizeArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; the format is taken from its extension unless `--format` is given.
    #[arg(long)]
    out: PathBuf,

    /// Output format (json, png, pdf).
    #[arg(long)]
    format: Option<layerline::ExportFormat>,

    /// Logical canvas width in pixels.
    #[arg(long)]
    width: Option<f64>,

    /// Supersampling factor for raster output.
    #[arg(long)]
    scale: Option<f64>,

    /// How out-of-range column and trend years are drawn (clamp, overflow).
    #[arg(long)]
    overflow: Option<layerline::OverflowPolicy>,

    /// Load text faces from this directory instead of system fonts.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path (may equal the input).
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Normalize(args) => cmd_normalize(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_diagram(path: &Path) -> anyhow::Result<layerline::Diagram> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))?;
    let doc = layerline::from_json_str(&text)
        .with_context(|| format!("parse timeline document '{}'", path.display()))?;
    layerline::Diagram::from_document(&doc)
        .with_context(|| format!("load timeline document '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let diagram = load_diagram(&args.in_path)?;

    let mut settings = layerline::RenderSettings::from_env();
    if let Some(w) = args.width {
        settings.canvas_width = w;
    }
    if let Some(s) = args.scale {
        settings.scale = s;
    }
    if let Some(o) = args.overflow {
        settings.overflow = o;
    }
    if let Some(dir) = args.font_dir {
        settings.font = layerline::FontSource::Directory(dir);
    }
    settings.validate()?;

    let report = layerline::export_to_file(&diagram, &args.out, args.format, &settings)
        .with_context(|| format!("export '{}'", args.out.display()))?;

    if report.width > 0 {
        eprintln!(
            "wrote {} ({}, {}x{}, {} bytes)",
            args.out.display(),
            report.format,
            report.width,
            report.height,
            report.bytes
        );
    } else {
        eprintln!(
            "wrote {} ({}, {} bytes)",
            args.out.display(),
            report.format,
            report.bytes
        );
    }
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let diagram = load_diagram(&args.in_path)?;
    let config = diagram.config();
    println!(
        "ok: {}..{} layers={} events={} connections={} columns={} trends={}",
        config.start_year(),
        config.end_year(),
        diagram.layers().len(),
        diagram.events().len(),
        diagram.connections().len(),
        diagram.columns().len(),
        diagram.trends().len()
    );
    Ok(())
}

fn cmd_normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    let diagram = load_diagram(&args.in_path)?;
    let json = layerline::to_json_string(&layerline::to_document(&diagram))?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, json + "\n")
        .with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

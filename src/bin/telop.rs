use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use telop::{
    AfterEffectsGateway, BaseName, Compositor, CompositorOpts, ExportGateway as _, ExportOpts,
    ImageSource, TelopStyle,
};

#[derive(Parser, Debug)]
#[command(name = "telop", version, about = "Image-derived telop styles")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Infer a default style from an image and write it as JSON.
    Infer(InferArgs),
    /// Render a style to a PNG preview.
    Preview(PreviewArgs),
    /// Write the export control script without running the export tool.
    Script(ScriptArgs),
    /// Run the export tool and produce the template artifact.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct InferArgs {
    /// Source image(s). Only the first one is read.
    #[arg(long = "image", required = true)]
    images: Vec<PathBuf>,

    /// Output style JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Also render a PNG preview of the inferred style.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input style JSON.
    #[arg(long)]
    style: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct ScriptArgs {
    /// Input style JSON.
    #[arg(long)]
    style: PathBuf,

    /// Output directory for the script.
    #[arg(long, default_value = telop::DEFAULT_OUT_DIR)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input style JSON.
    #[arg(long)]
    style: PathBuf,

    /// Output directory for the script and the artifact.
    #[arg(long, default_value = telop::DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    /// Export tool executable. Defaults to `TELOP_AFTERFX`, then a PATH search.
    #[arg(long)]
    tool: Option<PathBuf>,

    /// Kill the export tool after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Refuse to replace an existing artifact.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Infer(args) => cmd_infer(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Script(args) => cmd_script(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn compositor(font_dirs: Vec<PathBuf>) -> Compositor {
    let opts = font_dirs
        .into_iter()
        .fold(CompositorOpts::default(), CompositorOpts::with_font_dir);
    Compositor::new(opts)
}

fn cmd_infer(args: InferArgs) -> anyhow::Result<()> {
    let sources: Vec<ImageSource> = args.images.into_iter().map(ImageSource::from).collect();
    let style = telop::infer_style(&sources)?;
    style.save_to_path(&args.out)?;
    eprintln!("wrote {}", args.out.display());

    if let Some(png) = args.preview {
        let frame = compositor(args.font_dirs).render(&style)?;
        frame.save_png(&png)?;
        eprintln!("wrote {}", png.display());
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let style = TelopStyle::from_path(&args.style)
        .with_context(|| format!("load style '{}'", args.style.display()))?;
    let frame = compositor(args.font_dirs).render(&style)?;
    frame.save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_script(args: ScriptArgs) -> anyhow::Result<()> {
    let style = TelopStyle::from_path(&args.style)
        .with_context(|| format!("load style '{}'", args.style.display()))?;
    let paths = telop::write_control_script(&style, &ExportOpts::new(&args.out_dir))?;
    eprintln!("wrote {}", paths.script.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let style = TelopStyle::from_path(&args.style)
        .with_context(|| format!("load style '{}'", args.style.display()))?;

    let mut opts = ExportOpts::new(&args.out_dir).with_overwrite(!args.no_overwrite);
    if let Some(tool) = args.tool {
        opts = opts.with_tool(tool);
    }
    if let Some(secs) = args.timeout_secs {
        opts = opts.with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }

    let base = BaseName::from_template_name(&style.template_name);
    let report = AfterEffectsGateway::new(opts).export(&style, &base)?;
    if !report.stdout.trim().is_empty() {
        eprintln!("{}", report.stdout.trim_end());
    }
    eprintln!("wrote {}", report.paths.artifact.display());
    Ok(())
}

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rastertex::{BufferOpts, EditPlan, OverflowPolicy, PixelBuffer};

#[derive(Parser, Debug)]
#[command(name = "rastertex", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an edit plan against an image and write the result.
    Apply(ApplyArgs),
    /// Print name and dimensions of an image.
    Info(InfoArgs),
    /// Print an image as base64-encoded PNG.
    Save(InfoArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Edit plan JSON.
    #[arg(long)]
    plan: PathBuf,

    /// Output image; the format follows the extension.
    #[arg(long)]
    out: PathBuf,

    /// Operand image for `combine` steps, as NAME=PATH. Repeatable.
    #[arg(long = "operand", value_parser = parse_operand)]
    operands: Vec<(String, PathBuf)>,

    /// Overflow policy applied before the plan's own setting.
    #[arg(long)]
    overflow: Option<OverflowPolicy>,

    /// On failure, restore the last backup and still write the output.
    #[arg(long, default_value_t = false)]
    keep_going: bool,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Info(args) => cmd_info(args),
        Command::Save(args) => cmd_save(args),
    }
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let plan = EditPlan::from_path(&args.plan)?;
    let opts = BufferOpts {
        overflow: args.overflow.unwrap_or_default(),
        ..BufferOpts::default()
    };
    let mut target = load(&args.in_path, opts)?;

    let mut operands = BTreeMap::new();
    for (name, path) in &args.operands {
        operands.insert(name.clone(), load(path, BufferOpts::default())?);
    }
    for name in plan.operand_names() {
        if !operands.contains_key(name) {
            anyhow::bail!("edit plan references operand \"{name}\" but no --operand {name}=PATH was given");
        }
    }

    match plan.apply(&mut target, &operands) {
        Ok(report) => {
            tracing::info!(steps = report.steps, pixels = report.pixels_written, "plan applied");
        }
        Err(err) if args.keep_going => {
            tracing::warn!(error = %format!("{err:#}"), "plan failed, writing restored image");
            target.restore();
        }
        Err(err) => return Err(err).context("apply edit plan"),
    }

    target
        .write_to_path(&args.out)
        .with_context(|| format!("write {}", args.out.display()))?;
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let buf = load(&args.in_path, BufferOpts::default())?;
    println!("{buf}");
    Ok(())
}

fn cmd_save(args: InfoArgs) -> anyhow::Result<()> {
    let buf = load(&args.in_path, BufferOpts::default())?;
    println!("{}", buf.save()?);
    Ok(())
}

fn load(path: &Path, opts: BufferOpts) -> anyhow::Result<PixelBuffer> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "texture".to_owned());
    PixelBuffer::from_encoded_with_opts(name, &bytes, opts)
        .with_context(|| format!("decode {}", path.display()))
}

fn parse_operand(s: &str) -> Result<(String, PathBuf), String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got \"{s}\""))?;
    if name.is_empty() {
        return Err("operand name must be non-empty".to_owned());
    }
    Ok((name.to_owned(), PathBuf::from(path)))
}

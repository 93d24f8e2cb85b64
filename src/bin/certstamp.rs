use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "certstamp", version, about)]
struct Cli {
    /// Log more (`-v` debug, `-vv` trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the trimmed header row of a CSV file.
    Columns(ColumnsArgs),
    /// Compose one certificate and write it as PNG without sending anything.
    Preview(PreviewArgs),
    /// Compose and email a certificate for every roster row.
    Send(SendArgs),
    /// List the font families the renderer can resolve.
    Fonts(FontsArgs),
}

#[derive(Parser, Debug)]
struct ColumnsArgs {
    /// Roster CSV.
    #[arg(long)]
    csv: PathBuf,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Batch config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Text to stamp.
    #[arg(long, default_value = certstamp::PREVIEW_TEXT)]
    name: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Extra directory of font files (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct SendArgs {
    /// Batch config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Write the status report as JSON to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Extra directory of font files (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Extra directory of font files (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Columns(args) => cmd_columns(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Send(args) => cmd_send(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn make_backend(font_dirs: &[PathBuf]) -> certstamp::ParleyTextBackend {
    let mut backend = certstamp::ParleyTextBackend::new();
    for dir in font_dirs {
        backend.load_font_dir(dir);
    }
    backend
}

fn cmd_columns(args: ColumnsArgs) -> anyhow::Result<ExitCode> {
    let headers = certstamp::read_headers(&args.csv)
        .with_context(|| format!("read columns of '{}'", args.csv.display()))?;
    for h in headers {
        println!("{h}");
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<ExitCode> {
    let cfg = certstamp::BatchConfig::load(&args.config)?;
    let mut backend = make_backend(&args.font_dirs);

    let artifact = certstamp::compose(
        &mut backend,
        &cfg.template(),
        &args.name,
        &cfg.font_style(),
        &cfg.layout,
    )
    .context("compose preview")?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = artifact.to_png()?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        artifact.width(),
        artifact.height()
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_send(args: SendArgs) -> anyhow::Result<ExitCode> {
    let cfg = certstamp::BatchConfig::load(&args.config)?;
    let roster = cfg.roster().context("open roster")?;
    let job = cfg.job();
    let dispatcher = cfg.dispatcher();
    let mut backend = make_backend(&args.font_dirs);
    let cancel = certstamp::CancelToken::new();

    let report = certstamp::run_batch_with(
        &job,
        &roster,
        &mut backend,
        &dispatcher,
        &cancel,
        |outcome| println!("{outcome}"),
    )
    .context("run batch")?;

    println!(
        "{} sent, {} failed{}",
        report.succeeded(),
        report.failed(),
        if report.cancelled() { " (cancelled)" } else { "" }
    );

    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }

    Ok(if report.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<ExitCode> {
    let backend = make_backend(&args.font_dirs);
    for family in backend.families() {
        println!("{family}");
    }
    Ok(ExitCode::SUCCESS)
}

fn write_report(path: &Path, report: &certstamp::StatusReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize status report")?;
    std::fs::write(path, json).with_context(|| format!("write report '{}'", path.display()))
}

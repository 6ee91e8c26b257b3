//! whitepaper CLI - build a paper from a TOML manifest

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use whitepaper::manifest::PaperManifest;
use whitepaper::{Engine, PaperResult, RenderConfig, RenderOutput};

#[derive(Parser)]
#[command(name = "whitepaper")]
#[command(version)]
#[command(about = "Assemble an academic paper from a TOML manifest and compile it", long_about = None)]
struct Cli {
    /// Paper manifest (TOML)
    manifest: PathBuf,

    /// Output PDF path (defaults to the manifest name with a .pdf extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// LaTeX engine (overrides WHITEPAPER_LATEX_ENGINE)
    #[arg(short, long, value_enum)]
    engine: Option<EngineArg>,

    /// Only write the .tex source, skip compilation
    #[arg(long)]
    tex_only: bool,

    /// Keep auxiliary files produced by the engine
    #[arg(long)]
    keep_aux: bool,

    /// Write a JSON render report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineArg {
    Latexmk,
    Pdflatex,
    Tectonic,
}

impl From<EngineArg> for Engine {
    fn from(value: EngineArg) -> Self {
        match value {
            EngineArg::Latexmk => Engine::Latexmk,
            EngineArg::Pdflatex => Engine::Pdflatex,
            EngineArg::Tectonic => Engine::Tectonic,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        // Advisory warnings were already logged by `render`.
        Ok(output) => {
            let produced = output.pdf.as_ref().unwrap_or(&output.tex);
            println!("{}", produced.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("whitepaper={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> PaperResult<RenderOutput> {
    let mut config = RenderConfig::from_env()?;
    if let Some(engine) = cli.engine {
        config.engine = engine.into();
    }
    config.tex_only = cli.tex_only;
    config.clean = !cli.keep_aux;

    let manifest = PaperManifest::from_path(&cli.manifest)?;
    let paper = manifest.build()?;
    tracing::info!(paper = %paper, manifest = %cli.manifest.display(), "loaded manifest");

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.manifest));
    let output = paper.render(&output_path, &config)?;

    if let Some(report) = &cli.report {
        write_report(report, &output)?;
    }
    Ok(output)
}

fn default_output(manifest: &Path) -> PathBuf {
    manifest.with_extension("pdf")
}

fn write_report(path: &Path, output: &RenderOutput) -> PaperResult<()> {
    let json = serde_json::to_string_pretty(output)?;
    fs::write(path, json)?;
    Ok(())
}

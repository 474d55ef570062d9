//! CogBASIC benchmark runner binary
//!
//! Streams every benchmark task through every configured model and writes one
//! result file per model. Model output goes to stdout, logs go to stderr.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use cogbench::{BenchmarkRunner, Config, OutputFormat, Reporter};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "cogbench")]
#[command(
    version,
    about = "Run the CogBASIC interpreter benchmark against local chat models"
)]
struct Args {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory relative paths are resolved against
    /// (default: the config file's directory, or the current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Model to run; repeat to run several (replaces the configured list)
    #[arg(short, long = "model")]
    models: Vec<String>,

    /// Chat endpoint URL (overrides the configuration)
    #[arg(long)]
    endpoint: Option<String>,

    /// Also write the run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Summary format
    #[arg(long, value_enum, default_value = "console")]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Console,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Console => OutputFormat::Console,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn build_config(args: &Args) -> Result<Config> {
    let (config, config_dir) = match &args.config {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (Config::from_file(path)?, dir)
        }
        None => (Config::default(), PathBuf::from(".")),
    };

    let root = args.root.clone().unwrap_or(config_dir);
    let mut config = config.resolve_paths(&root);

    if !args.models.is_empty() {
        config.models = args.models.clone();
    }
    if let Some(url) = &args.endpoint {
        config.endpoint.url = url.clone();
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the streamed model output, so logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = build_config(&args)?;
    tracing::info!("Starting cogbench v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Endpoint: {}", config.endpoint.url);
    tracing::info!("Models: {}", config.models.join(", "));

    let mut runner = BenchmarkRunner::new(config)?;
    let summary = runner.run().await?;

    let reporter = Reporter::new(args.format.into());
    reporter.report(&summary)?;
    if let Some(path) = &args.summary {
        reporter.write_to_file(&summary, path)?;
        tracing::info!("Summary written to {}", path.display());
    }

    Ok(())
}

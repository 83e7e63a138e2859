mod config;
mod pipeline;
mod sink;

use anyhow::{Context, Result};
use clap::Parser;
use clogc_model::{StyleName, TimestampSource};
use clogc_probe::{detect_dialect, ProbeSource};
use clogc_render::{style_for, LayoutEngine};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{load_config_file, Settings};
use crate::pipeline::pipeline;
use crate::sink::TerminalSink;

#[derive(Parser, Debug)]
#[command(
    name = "clogc",
    version,
    about = "Continuously ping a host and draw latency as a clock-aligned glyph stream"
)]
pub struct Cli {
    /// Host to probe [default: 8.8.8.8]
    pub host: Option<String>,

    /// Minute columns per row; 0 groups rows by hour [default: 1]
    #[arg(short, long)]
    pub col: Option<u32>,

    /// Latency renderer: bracket or normalized
    #[arg(long)]
    pub style: Option<StyleName>,

    /// Clock for event times: probe or arrival
    #[arg(long)]
    pub timestamps: Option<TimestampSource>,

    /// Lower bound for the normalized renderer, in ms
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,

    /// Upper bound for the normalized renderer, in ms
    #[arg(long)]
    pub max: Option<f64>,

    /// JSON file with defaults and legend overrides
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print glyphs without color escapes
    #[arg(long)]
    pub plain: bool,

    /// Debug logging on stderr (CLOGC_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file = cli
        .config
        .as_deref()
        .map(load_config_file)
        .transpose()?;
    let settings = Settings::resolve(&cli, file)?;
    debug!(?settings, "resolved settings");

    let dialect = detect_dialect()?;
    let style = style_for(settings.style, settings.legend.clone(), settings.range)
        .context("invalid legend")?;
    let engine = LayoutEngine::new(settings.layout, settings.legend.separator);

    let source = ProbeSource::spawn(dialect.as_ref(), &settings.host)
        .with_context(|| format!("failed to start probe for {}", settings.host))?;

    let handle = source.handle();
    ctrlc::set_handler(move || {
        handle.kill();
        std::process::exit(130);
    })
    .context("failed to install Ctrl-C handler")?;

    let stdout = io::stdout();
    let mut sink = TerminalSink::new(stdout.lock(), settings.plain);
    for token in pipeline(
        dialect.as_ref(),
        style.as_ref(),
        engine,
        settings.timestamps,
        source,
    ) {
        sink.write_token(&token).context("failed to write to stdout")?;
    }
    sink.finish().context("failed to write to stdout")?;

    info!(host = %settings.host, "probe stream ended");
    Ok(())
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("CLOGC_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

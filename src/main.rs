use addon_catalog::{CatalogAggregator, CatalogSink, Config, ConfigOverrides, JsonFileSink};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Build a merged World of Warcraft addon catalog from CurseForge and Tukui
#[derive(Debug, Parser)]
#[command(name = "addon-catalog", version, about)]
struct Cli {
    /// CurseForge API key
    #[arg(long = "capikey", value_name = "KEY")]
    api_key: Option<String>,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output file for the merged catalog
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.api_key.clone(),
            output: self.output.clone(),
            timeout_secs: self.timeout_secs,
            pretty: self.pretty,
        }
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    config.apply_overrides(cli.overrides());
    config.validate()?;

    let aggregator = CatalogAggregator::new(&config)?;
    info!("Providers: {:?}", aggregator.providers());

    let addons = aggregator.run().await?;

    let sink = JsonFileSink::from(&config.output);
    sink.write(&addons)
        .await
        .with_context(|| format!("failed to write {}", sink.path().display()))?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

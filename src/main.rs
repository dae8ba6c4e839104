use analytics::MetricsEngine;
use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{load_config, Config, ServerSettings};
use core_types::{FilterState, ViewMode};
use dataset::DatasetCache;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;

mod render;
mod telemetry;

/// The main entry point for the SkyCity channel analytics tool.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional; SKYCITY__* variables may come from the shell.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let _guard = telemetry::init(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Summary(args) => handle_summary(args, &config),
        Commands::Facets => handle_facets(&config),
        Commands::Serve(args) => handle_serve(args, config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Channel-mix and delivery-aggregator risk analytics for the SkyCity precinct.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard for a filter selection.
    Summary(SummaryArgs),
    /// List the values each filter can take.
    Facets,
    /// Run the dashboard HTTP API.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct SummaryArgs {
    /// Subregions to include, comma-separated. Defaults to all.
    #[arg(long, value_delimiter = ',')]
    subregion: Option<Vec<String>>,

    /// Cuisine types to include, comma-separated. Defaults to all.
    #[arg(long, value_delimiter = ',')]
    cuisine: Option<Vec<String>>,

    /// Segments to include, comma-separated. Defaults to all.
    #[arg(long, value_delimiter = ',')]
    segment: Option<Vec<String>>,

    /// Channel panel: "overall" or "comparison".
    #[arg(long, default_value = "overall")]
    view: ViewMode,

    /// Length of the risk list. Defaults to `dashboard.top_risk_limit`.
    #[arg(long)]
    top: Option<usize>,

    /// Print the report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.host` and `server.port` (e.g. "127.0.0.1:8080").
    #[arg(long)]
    addr: Option<SocketAddr>,
}

/// `None` keeps every observed value; an explicit list keeps only its
/// non-blank entries, which may be none at all.
fn selection(values: Option<Vec<String>>, observed: &[String]) -> HashSet<String> {
    match values {
        None => observed.iter().cloned().collect(),
        Some(values) => values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect(),
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_summary(args: SummaryArgs, config: &Config) -> anyhow::Result<()> {
    let dataset = DatasetCache::new(&config.data.source)
        .get_or_load()
        .context("Failed to load the restaurant dataset")?;

    let filter = FilterState {
        subregions: selection(args.subregion, &dataset.facets.subregions),
        cuisine_types: selection(args.cuisine, &dataset.facets.cuisine_types),
        segments: selection(args.segment, &dataset.facets.segments),
        view_mode: args.view,
    };
    let top = args.top.unwrap_or(config.dashboard.top_risk_limit);

    let report = MetricsEngine::new().build_report(&dataset.records, &filter, top);
    tracing::info!(
        matched = report.kpis.restaurant_count,
        of = dataset.records.len(),
        "Report built."
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::print_report(&report);
    }
    Ok(())
}

fn handle_facets(config: &Config) -> anyhow::Result<()> {
    let dataset = DatasetCache::new(&config.data.source)
        .get_or_load()
        .context("Failed to load the restaurant dataset")?;
    render::print_facets(&dataset.facets, dataset.records.len());
    Ok(())
}

impl ServeArgs {
    fn apply(&self, server: &mut ServerSettings) {
        if let Some(addr) = self.addr {
            server.host = addr.ip().to_string();
            server.port = addr.port();
        }
    }
}

// The API logs through the subscriber installed in `main`, log file included.
async fn handle_serve(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config.server);
    web_server::run_server(&config).await
}

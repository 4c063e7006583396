//! SuperDARN convection map web app.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use convection_maps::PipelineConfig;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use map_webapp::{start_server, AppState};

#[derive(Parser, Debug)]
#[command(name = "map-webapp")]
#[command(about = "Web form for generating SuperDARN convection maps")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "WEBAPP_PORT", default_value_t = 5000)]
    port: u16,

    /// Pipeline configuration file
    #[arg(long, env = "CONVECTION_MAPS_CONFIG", default_value = "config/pipeline.yaml")]
    config: PathBuf,

    /// Directory plots are written to and served from
    #[arg(long, env = "WEBAPP_STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Directory holding the RST binaries
    #[arg(long, env = "RSTPATH_BIN")]
    rst_bin_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting convection map web app");

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let mut config = PipelineConfig::load_or_default(&args.config)?;
    if let Some(dir) = args.rst_bin_dir {
        config.rst.bin_dir = Some(dir);
    }

    std::fs::create_dir_all(&args.static_dir)
        .with_context(|| format!("Failed to create static dir {:?}", args.static_dir))?;
    info!(static_dir = ?args.static_dir, config = ?args.config, "Loaded configuration");

    let runner = Arc::new(config.runner());
    let state = Arc::new(AppState::new(
        config,
        args.static_dir,
        runner,
        prometheus_handle,
    ));

    start_server(state, args.port).await
}

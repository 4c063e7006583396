//! SuperDARN convection map generator.
//!
//! Grids one day of fitacf data per radar, fits a convection map and plots
//! it, driving the RST command line tools.

mod args;
mod logging;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use convection_maps::{ConvectionMaps, PipelineConfig};
use tracing::{info, warn};

use args::Args;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let loaded = PipelineConfig::load_optional(&args.config)?;
    let config_found = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    args.configure(&mut config);
    let params = args.parameters(&config);

    logging::init(logging::parse_level(args.log_level()), &params.log_file())?;
    if !config_found {
        warn!(path = ?args.config, "Pipeline config not found, using defaults");
    }

    info!(
        date = %params.date,
        hemisphere = %params.hemisphere,
        config = ?args.config,
        "Starting convection map generation"
    );

    let runner = Arc::new(config.runner());
    let mut maps = ConvectionMaps::new(params, config, runner)?;

    let report = maps.run(args.stages()).await?;
    info!(
        map = ?report.map_file,
        images = report.images.len(),
        warnings = report.warnings.len(),
        radars = ?report.radars_used,
        failed_radars = ?report.radars_errors,
        report = %serde_json::to_string(&report)?,
        "Convection map generation complete"
    );
    Ok(())
}

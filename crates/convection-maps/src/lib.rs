//! SuperDARN convection map pipeline.
//!
//! Sequences the RST binaries that turn a day of fitacf data into convection
//! maps and plots, optionally folding in OMNI IMF data.
//!
//! ```no_run
//! # async fn example() -> darn_common::DarnResult<()> {
//! use std::sync::Arc;
//! use convection_maps::{ConvectionMaps, MapParameters, PipelineConfig, Stages};
//!
//! let config = PipelineConfig::default();
//! let mut params = MapParameters::new("20170301".parse()?);
//! params.data_path = "/data/fitacf".into();
//! params.plot_path = "/data/plots".into();
//!
//! let runner = Arc::new(config.runner());
//! let mut maps = ConvectionMaps::new(params, config, runner)?;
//! let report = maps.run(Stages::default()).await?;
//! println!("{} images", report.images.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod params;
pub mod pipeline;

pub use config::{DefaultsConfig, PipelineConfig, RstConfig};
pub use params::MapParameters;
pub use pipeline::{ConvectionMaps, GridOutcome, RunReport, StagedFiles, Stages};

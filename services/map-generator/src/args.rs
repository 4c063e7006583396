//! Command line arguments and their merge with the pipeline configuration.

use std::path::PathBuf;

use clap::Parser;
use convection_maps::{MapParameters, PipelineConfig, Stages};
use darn_common::{Channel, Hemisphere, MapDate, TimeOfDay};

#[derive(Parser, Debug)]
#[command(name = "convection-maps")]
#[command(about = "Generate SuperDARN convection maps and plots for one day")]
pub struct Args {
    /// Date to process (YYYYMMDD)
    pub date: MapDate,

    /// Channel to grid: a-h, or all
    #[arg(short = 'c', long, default_value = "all")]
    pub channel: Channel,

    /// Integration time in seconds (make_grid -i)
    #[arg(short = 'i', long, default_value_t = 120)]
    pub integration_time: u32,

    /// Hemisphere: north or south
    #[arg(short = 'H', long, default_value = "north")]
    pub hemisphere: Hemisphere,

    /// Plot start time (hh:mm)
    #[arg(short = 's', long, default_value = "00:00")]
    pub start_time: TimeOfDay,

    /// Plot end time (hh:mm)
    #[arg(short = 'e', long, default_value = "23:59")]
    pub end_time: TimeOfDay,

    /// Image format plots are converted to
    #[arg(short = 'x', long)]
    pub image_ext: Option<String>,

    /// Directory for the run log
    #[arg(short = 'l', long)]
    pub logpath: Option<PathBuf>,

    /// Directory holding the fitacf data
    #[arg(short = 'd', long)]
    pub data_path: Option<PathBuf>,

    /// Directory for OMNI and IMF files
    #[arg(short = 'f', long)]
    pub imf_path: Option<PathBuf>,

    /// Directory for intermediates and plots
    #[arg(short = 'p', long)]
    pub plot_path: Option<PathBuf>,

    /// Directory the fitted map is copied to
    #[arg(short = 'm', long)]
    pub map_path: Option<PathBuf>,

    /// Directory for per-radar grid files
    #[arg(short = 'g', long)]
    pub grid_path: Option<PathBuf>,

    /// Directory holding the colour key
    #[arg(short = 'k', long)]
    pub key_path: Option<PathBuf>,

    /// Debug logging (same as --log-level debug)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Pipeline configuration file
    #[arg(long, env = "CONVECTION_MAPS_CONFIG", default_value = "config/pipeline.yaml")]
    pub config: PathBuf,

    /// Directory holding the RST binaries
    #[arg(long, env = "RSTPATH_BIN")]
    pub rst_bin_dir: Option<PathBuf>,

    /// Radars gridded concurrently
    #[arg(long)]
    pub num_proc: Option<usize>,

    /// Stop after the map files (no plots)
    #[arg(long)]
    pub maps_only: bool,

    /// Keep intermediate files
    #[arg(long)]
    pub no_cleanup: bool,

    /// Never fetch OMNI data
    #[arg(long)]
    pub no_omni: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn log_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }

    pub fn stages(&self) -> Stages {
        Stages {
            plots: !self.maps_only,
            cleanup: !self.no_cleanup,
        }
    }

    /// Run parameters: built-in defaults, then the config file, then flags.
    pub fn parameters(&self, config: &PipelineConfig) -> MapParameters {
        let mut params = MapParameters::new(self.date);
        config.defaults.apply(&mut params);

        params.channel = self.channel;
        params.integration_time = self.integration_time;
        params.hemisphere = self.hemisphere;
        params.start_time = self.start_time;
        params.end_time = self.end_time;
        params.use_omni = !self.no_omni;

        let paths = [
            (&self.logpath, &mut params.log_path),
            (&self.data_path, &mut params.data_path),
            (&self.imf_path, &mut params.imf_path),
            (&self.plot_path, &mut params.plot_path),
            (&self.map_path, &mut params.map_path),
            (&self.grid_path, &mut params.grid_path),
            (&self.key_path, &mut params.key_path),
        ];
        for (flag, target) in paths {
            if let Some(path) = flag {
                *target = path.clone();
            }
        }
        if let Some(ext) = &self.image_ext {
            params.image_ext = ext.clone();
        }
        if let Some(num_proc) = self.num_proc {
            params.num_proc = num_proc;
        }
        params
    }

    /// Apply flag overrides to the loaded configuration.
    pub fn configure(&self, config: &mut PipelineConfig) {
        if let Some(dir) = &self.rst_bin_dir {
            config.rst.bin_dir = Some(dir.clone());
        }
    }
}

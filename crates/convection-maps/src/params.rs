//! Per-run parameters.

use std::path::PathBuf;

use darn_common::{Channel, DarnError, DarnResult, Hemisphere, MapDate, MapFilenames, TimeOfDay};
use serde::Serialize;

/// Everything one map run needs to know besides the pipeline configuration.
#[derive(Debug, Clone, Serialize)]
pub struct MapParameters {
    pub date: MapDate,
    pub channel: Channel,
    /// `make_grid -i`, seconds
    pub integration_time: u32,
    pub hemisphere: Hemisphere,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    /// Extension the PostScript plots are converted to
    pub image_ext: String,
    pub log_path: PathBuf,
    pub data_path: PathBuf,
    pub plot_path: PathBuf,
    pub map_path: PathBuf,
    pub grid_path: PathBuf,
    pub imf_path: PathBuf,
    pub key_path: PathBuf,
    /// Radars gridded concurrently
    pub num_proc: usize,
    /// Fetch OMNI data when no IMF file is present
    pub use_omni: bool,
}

impl MapParameters {
    pub fn new(date: MapDate) -> Self {
        let here = PathBuf::from(".");
        Self {
            date,
            channel: Channel::All,
            integration_time: 120,
            hemisphere: Hemisphere::North,
            start_time: TimeOfDay::START_OF_DAY,
            end_time: TimeOfDay::end_of_day(),
            image_ext: "pdf".to_string(),
            log_path: here.clone(),
            data_path: here.clone(),
            plot_path: here.clone(),
            map_path: here.clone(),
            grid_path: here.clone(),
            imf_path: here.clone(),
            key_path: here,
            num_proc: 1,
            use_omni: true,
        }
    }

    pub fn filenames(&self) -> MapFilenames {
        MapFilenames::new(self.date, self.hemisphere)
    }

    /// Per-run log file, `{log_path}/{date}_map.{hem}.log`.
    pub fn log_file(&self) -> PathBuf {
        self.log_path.join(self.filenames().log())
    }

    pub fn validate(&self) -> DarnResult<()> {
        if !self.data_path.is_dir() {
            return Err(DarnError::PathDoesNotExist(self.data_path.clone()));
        }
        if self.integration_time == 0 {
            return Err(DarnError::invalid(
                "integration_time",
                "must be greater than 0 seconds",
            ));
        }
        if self.start_time > self.end_time {
            return Err(DarnError::invalid(
                "start_time",
                format!("{} is after end time {}", self.start_time, self.end_time),
            ));
        }
        if self.num_proc == 0 {
            return Err(DarnError::invalid("num_proc", "must be at least 1"));
        }
        if self.image_ext.is_empty() || !self.image_ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DarnError::invalid(
                "image_ext",
                format!("'{}' is not a file extension", self.image_ext),
            ));
        }
        Ok(())
    }
}

//! File naming conventions and data file type detection.

use std::path::{Path, PathBuf};

use crate::constants::{COMPRESSION_TYPES, FILE_TYPES};
use crate::error::{DarnError, DarnResult};
use crate::hemisphere::Hemisphere;
use crate::time::MapDate;

/// Compression applied to a fitted data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    Gzip,
    Bzip2,
}

impl CompressionType {
    pub fn extension(&self) -> &'static str {
        match self {
            CompressionType::Gzip => "gz",
            CompressionType::Bzip2 => "bz2",
        }
    }
}

/// Detected kind of a fitted data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFileKind {
    /// Plain fitacf
    Fitacf,
    /// Compressed fitacf
    Compressed(CompressionType),
}

impl DataFileKind {
    /// Detect the kind from the file extension.
    pub fn detect(path: &Path) -> DarnResult<Self> {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_lowercase();

        let kind = if name.ends_with(".fitacf.gz") {
            Some(DataFileKind::Compressed(CompressionType::Gzip))
        } else if name.ends_with(".fitacf.bz2") {
            Some(DataFileKind::Compressed(CompressionType::Bzip2))
        } else if name.ends_with(".fitacf") {
            Some(DataFileKind::Fitacf)
        } else {
            None
        };

        kind.ok_or_else(|| {
            let ext = name.rsplit('.').next().unwrap_or_default();
            DarnError::UnsupportedType(format!(
                "{} file type or compression extension is not supported. Please use one of \
                 the following supported types: {:?} {:?}",
                ext, FILE_TYPES, COMPRESSION_TYPES
            ))
        })
    }
}

/// Names of every product a map run writes, for one date and hemisphere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFilenames {
    date: MapDate,
    hemisphere: Hemisphere,
}

impl MapFilenames {
    pub fn new(date: MapDate, hemisphere: Hemisphere) -> Self {
        Self { date, hemisphere }
    }

    pub fn date(&self) -> MapDate {
        self.date
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Per-radar grid file produced by `make_grid`.
    pub fn grid(&self, radar: &str) -> String {
        format!("{}.{}.{}.grid", self.date, radar, self.hemisphere.ext())
    }

    /// Combined grid produced by `combine_grid`.
    pub fn grd(&self) -> String {
        format!("{}.{}.grd", self.date, self.hemisphere.ext())
    }

    pub fn empty_map(&self) -> String {
        format!("{}.{}.empty.map", self.date, self.hemisphere.ext())
    }

    pub fn hmb_map(&self) -> String {
        format!("{}.{}.hmb.map", self.date, self.hemisphere.ext())
    }

    pub fn imf_map(&self) -> String {
        format!("{}.{}.imf.map", self.date, self.hemisphere.ext())
    }

    pub fn model_map(&self) -> String {
        format!("{}.{}.model.map", self.date, self.hemisphere.ext())
    }

    /// Final fitted map produced by `map_fit`.
    pub fn fitted_map(&self) -> String {
        format!("{}.{}.map", self.date, self.hemisphere.ext())
    }

    pub fn log(&self) -> String {
        format!("{}_map.{}.log", self.date, self.hemisphere.ext())
    }

    /// File name pattern matching every per-radar grid of this run.
    pub fn grid_pattern(&self) -> String {
        format!("{}.*.{}.grid", self.date, self.hemisphere.ext())
    }

    /// File name pattern matching the fitted data files of `radar`.
    pub fn data_pattern(&self, radar: &str) -> String {
        format!("{}*{}*.fitacf*", self.date, radar)
    }

    /// File name pattern matching the PostScript plots of this date.
    pub fn plot_pattern(&self) -> String {
        format!("{}*.ps", self.date)
    }
}

/// Raw OMNI download for a date.
pub fn omni_filename(date: MapDate) -> String {
    format!("{}_omni.txt", date)
}

/// RST-readable IMF file for a date.
pub fn imf_filename(date: MapDate) -> String {
    format!("{}_imf.txt", date)
}

/// Name a superseded OMNI download is moved to.
pub fn archived_omni_filename(date: MapDate, today: MapDate) -> String {
    format!("{}_omni_{}.txt", date, today)
}

/// Strip a compression extension (`x.fitacf.bz2` -> `x.fitacf`).
pub fn strip_compression(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if COMPRESSION_TYPES.contains(&ext) => path.with_extension(""),
        _ => path.to_path_buf(),
    }
}

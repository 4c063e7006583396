//! OMNI and IMF file locations for one date.

use std::path::{Path, PathBuf};

use chrono::Duration;
use darn_common::constants::OMNI_DELAY_SECS;
use darn_common::files::{archived_omni_filename, imf_filename, omni_filename};
use darn_common::MapDate;
use tracing::info;

use crate::error::OmniResult;

/// Where the OMNI download and its IMF conversion live for a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmniFiles {
    date: MapDate,
    dir: PathBuf,
}

impl OmniFiles {
    pub fn new(date: MapDate, dir: impl Into<PathBuf>) -> Self {
        Self {
            date,
            dir: dir.into(),
        }
    }

    pub fn date(&self) -> MapDate {
        self.date
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn omni_filename(&self) -> String {
        omni_filename(self.date)
    }

    pub fn omni_path(&self) -> PathBuf {
        self.dir.join(self.omni_filename())
    }

    pub fn imf_path(&self) -> PathBuf {
        self.dir.join(imf_filename(self.date))
    }

    pub fn archived_path(&self, today: MapDate) -> PathBuf {
        self.dir.join(archived_omni_filename(self.date, today))
    }

    /// First hour requested (`%Y%m%d%H`).
    ///
    /// Starts `OMNI_DELAY_SECS` before midnight so the IMF delay applied by
    /// `map_addimf` still has data at the start of the day.
    pub fn start_time(&self) -> String {
        (self.date.start_of_day() - Duration::seconds(OMNI_DELAY_SECS))
            .format("%Y%m%d%H")
            .to_string()
    }

    /// Last hour requested (`%Y%m%d%H`).
    pub fn end_time(&self) -> String {
        format!("{}23", self.date)
    }
}

/// Move an out-of-date OMNI download aside as `{date}_omni_{today}.txt`.
pub async fn archive_stale(files: &OmniFiles, today: MapDate) -> OmniResult<PathBuf> {
    let archived = files.archived_path(today);
    tokio::fs::rename(files.omni_path(), &archived).await?;
    info!(
        from = %files.omni_path().display(),
        to = %archived.display(),
        "Archived stale OMNI file"
    );
    Ok(archived)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> OmniFiles {
        OmniFiles::new("20170301".parse().unwrap(), "/data/imf")
    }

    #[test]
    fn test_request_window() {
        let files = files();
        assert_eq!(files.start_time(), "2017022823");
        assert_eq!(files.end_time(), "2017030123");
    }

    #[test]
    fn test_start_time_crosses_year() {
        let files = OmniFiles::new("20170101".parse().unwrap(), "/x");
        assert_eq!(files.start_time(), "2016123123");
    }

    #[test]
    fn test_paths() {
        let files = files();
        assert_eq!(files.omni_path(), PathBuf::from("/data/imf/20170301_omni.txt"));
        assert_eq!(files.imf_path(), PathBuf::from("/data/imf/20170301_imf.txt"));
        assert_eq!(
            files.archived_path("20170315".parse().unwrap()),
            PathBuf::from("/data/imf/20170301_omni_20170315.txt")
        );
    }

    #[tokio::test]
    async fn test_archive_stale_renames() {
        let tmp = tempfile::tempdir().unwrap();
        let files = OmniFiles::new("20170301".parse().unwrap(), tmp.path());
        std::fs::write(files.omni_path(), "old").unwrap();

        let archived = archive_stale(&files, "20170315".parse().unwrap()).await.unwrap();
        assert!(!files.omni_path().exists());
        assert_eq!(std::fs::read_to_string(archived).unwrap(), "old");
    }
}

//! Cleanup stage.

use std::path::PathBuf;

use darn_common::DarnResult;
use tracing::{debug, info, instrument, warn};

use super::{glob_in, same_dir, ConvectionMaps};

impl ConvectionMaps {
    /// Keep the log next to the maps and remove the run's intermediates.
    ///
    /// Only files this run created are removed from the plot path, so
    /// unrelated data sharing the directory is left alone.
    #[instrument(skip(self), fields(date = %self.params.date, hemisphere = %self.params.hemisphere))]
    pub async fn cleanup(&mut self) -> DarnResult<()> {
        let log_file = self.params.log_file();
        if log_file.exists() && !same_dir(&self.params.log_path, &self.params.map_path) {
            let dest = self.params.map_path.join(self.files.log());
            tokio::fs::copy(&log_file, &dest).await?;
            debug!(log = %dest.display(), "Copied log file");
        }

        let mut doomed: Vec<PathBuf> = std::mem::take(&mut self.staged);
        doomed.extend(
            [
                self.files.grd(),
                self.files.empty_map(),
                self.files.hmb_map(),
                self.files.imf_map(),
                self.files.model_map(),
                self.files.fitted_map(),
            ]
            .into_iter()
            .map(|name| self.plot_file(name)),
        );
        if same_dir(&self.params.plot_path, &self.params.map_path) {
            let map_file = self.plot_file(self.files.fitted_map());
            doomed.retain(|p| *p != map_file);
        }
        if let Ok(paths) = glob::glob(&glob_in(&self.params.grid_path, &self.files.grid_pattern())) {
            doomed.extend(paths.filter_map(Result::ok));
        }

        let mut removed = 0;
        for path in doomed {
            if !path.exists() {
                continue;
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove file"),
            }
        }

        info!(removed = removed, "Cleaned up intermediate files");
        Ok(())
    }
}

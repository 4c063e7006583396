//! Map stage: GRD to fitted convection map.

use std::path::PathBuf;

use chrono::Utc;
use darn_common::constants::{IMF_DELAY, MAP_GRD_LAT_LIMIT, MAP_MODEL_ORDER};
use darn_common::{DarnError, DarnResult, Hemisphere, MapDate};
use omni::{OmniClient, OmniFiles};
use rst_toolkit::run_checked;
use tracing::{info, instrument, warn};

use super::{glob_exact, same_dir, ConvectionMaps};

impl ConvectionMaps {
    /// Turn the combined grid into the fitted map and copy it to the map path.
    #[instrument(skip(self), fields(date = %self.params.date, hemisphere = %self.params.hemisphere))]
    pub async fn generate_map_files(&mut self) -> DarnResult<PathBuf> {
        let grd = self.plot_file(self.files.grd());
        if !grd.exists() {
            return Err(DarnError::FileDoesNotExist(grd));
        }

        let empty_map = self.plot_file(self.files.empty_map());
        let mut cmd = self.rst("map_grd");
        if self.params.hemisphere == Hemisphere::South {
            cmd = cmd.arg("-sh");
        }
        let cmd = cmd
            .arg("-l")
            .arg(MAP_GRD_LAT_LIMIT.to_string())
            .path_arg(&grd)
            .stdout_to(&empty_map);
        run_checked(self.runner.as_ref(), &cmd, &glob_exact(&empty_map)).await?;

        let hmb_map = self.plot_file(self.files.hmb_map());
        let cmd = self.rst("map_addhmb").path_arg(&empty_map).stdout_to(&hmb_map);
        run_checked(self.runner.as_ref(), &cmd, &glob_exact(&hmb_map)).await?;

        let model_input = match self.resolve_imf().await {
            Some(imf_file) => {
                let imf_map = self.plot_file(self.files.imf_map());
                let cmd = self
                    .rst("map_addimf")
                    .arg("-omni")
                    .arg("-d")
                    .arg(IMF_DELAY)
                    .arg("-if")
                    .path_arg(&imf_file)
                    .path_arg(&hmb_map)
                    .stdout_to(&imf_map);
                run_checked(self.runner.as_ref(), &cmd, &glob_exact(&imf_map)).await?;
                self.imf_used = true;
                imf_map
            }
            None => {
                info!("No IMF data, fitting the model without it");
                hmb_map
            }
        };

        let model_map = self.plot_file(self.files.model_map());
        let cmd = self
            .rst("map_addmodel")
            .arg("-o")
            .arg(MAP_MODEL_ORDER.to_string())
            .arg("-d")
            .arg("l")
            .path_arg(&model_input)
            .stdout_to(&model_map);
        run_checked(self.runner.as_ref(), &cmd, &glob_exact(&model_map)).await?;

        let fitted = self.plot_file(self.files.fitted_map());
        let cmd = self.rst("map_fit").path_arg(&model_map).stdout_to(&fitted);
        run_checked(self.runner.as_ref(), &cmd, &glob_exact(&fitted)).await?;

        let map_file = self.params.map_path.join(self.files.fitted_map());
        if !same_dir(&self.params.plot_path, &self.params.map_path) {
            tokio::fs::copy(&fitted, &map_file).await?;
        }
        info!(map = %map_file.display(), imf = self.imf_used, "Map file created");

        self.report.map_file = Some(map_file.clone());
        Ok(map_file)
    }

    /// IMF file for the date, fetching OMNI data when allowed.
    ///
    /// Every OMNI failure is downgraded to a warning.
    async fn resolve_imf(&mut self) -> Option<PathBuf> {
        let omni_files = OmniFiles::new(self.params.date, &self.params.imf_path);
        let imf_file = omni_files.imf_path();
        if imf_file.exists() {
            info!(imf = %imf_file.display(), "Using existing IMF file");
            return Some(imf_file);
        }
        if !self.params.use_omni {
            return None;
        }

        let client = match OmniClient::new(self.config.omni.clone()) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "Could not create OMNI client");
                self.report.warn(e.to_warning(&omni_files));
                return None;
            }
        };

        let today = MapDate::new(Utc::now().date_naive());
        match client.prepare_imf(&omni_files, today).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "OMNI data unavailable");
                self.report.warn(e.to_warning(&omni_files));
                None
            }
        }
    }
}

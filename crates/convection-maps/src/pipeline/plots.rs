//! Plot stage: `map_plot` to PostScript, then `convert` per page.

use std::path::PathBuf;

use darn_common::constants::PLOT_DENSITY;
use darn_common::{DarnError, DarnResult, PipelineWarning};
use rst_toolkit::{run_checked, ToolCommand};
use tracing::{info, instrument};

use super::{glob_in, ConvectionMaps};

impl ConvectionMaps {
    /// Colour key for `map_plot -vkey`.
    ///
    /// The key path is used when it holds the key file; otherwise the bare
    /// name is passed and RST looks it up itself.
    pub fn key_file(&self) -> String {
        let key = self.params.key_path.join(&self.config.rst.key_file);
        if key.is_file() {
            key.display().to_string()
        } else {
            self.config.rst.key_file.clone()
        }
    }

    /// Plot the fitted map and convert each page to the image extension.
    #[instrument(skip(self), fields(date = %self.params.date, hemisphere = %self.params.hemisphere))]
    pub async fn generate_plots(&mut self) -> DarnResult<Vec<PathBuf>> {
        let map_file = self.params.map_path.join(self.files.fitted_map());
        if !map_file.exists() {
            return Err(DarnError::FileDoesNotExist(map_file));
        }

        let mut cmd = self
            .rst("map_plot")
            .args(["-ps", "-mag"])
            .arg("-st")
            .arg(self.params.start_time.to_string())
            .arg("-et")
            .arg(self.params.end_time.to_string())
            .args(["-rotate", "-hmb", "-modn", "-fit", "-grd", "-ctr"]);
        if self.imf_used {
            cmd = cmd.arg("-imf");
        }
        let cmd = cmd
            .args([
                "-dn", "-extra", "-coast", "-vecp", "-pot", "-time", "-vkeyp", "-vkey",
            ])
            .arg(self.key_file())
            .arg("-path")
            .path_arg(&self.params.plot_path)
            .path_arg(&map_file)
            .discard_stderr();

        let ps_pattern = glob_in(&self.params.plot_path, &self.files.plot_pattern());
        run_checked(self.runner.as_ref(), &cmd, &ps_pattern).await?;

        let mut ps_files: Vec<PathBuf> = glob::glob(&ps_pattern)
            .map_err(|e| DarnError::invalid("plot_path", e.to_string()))?
            .filter_map(Result::ok)
            .collect();
        ps_files.sort();

        let ext = self.params.image_ext.clone();
        for ps_file in ps_files {
            let image = ps_file.with_extension(&ext);
            let cmd = ToolCommand::new("convert")
                .arg("-density")
                .arg(PLOT_DENSITY.to_string())
                .path_arg(&ps_file)
                .path_arg(&image);

            let converted = matches!(self.runner.run(&cmd).await, Ok(out) if out.success())
                && image.exists();
            if converted {
                if image != ps_file {
                    self.staged.push(ps_file);
                }
                self.report.images.push(image);
            } else {
                self.report.warn(PipelineWarning::Convert {
                    ps_file,
                    extension: ext.clone(),
                });
            }
        }

        info!(images = self.report.images.len(), "Plots generated");
        Ok(self.report.images.clone())
    }
}

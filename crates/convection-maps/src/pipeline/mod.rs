//! The convection map run.
//!
//! A run walks four stages, each a chain of RST binaries:
//!
//! 1. **grid** - stage each radar's fitacf files, `make_grid` per radar,
//!    `combine_grid` into one GRD file
//! 2. **map** - `map_grd`, `map_addhmb`, optionally `map_addimf`,
//!    `map_addmodel`, `map_fit`
//! 3. **plot** - `map_plot` to PostScript, `convert` to the image format
//! 4. **cleanup** - remove intermediates, keep the log next to the maps
//!
//! Intermediates live in the plot path; per-radar grids in the grid path.

mod cleanup;
mod grid;
mod maps;
mod plots;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use darn_common::{DarnError, DarnResult, MapFilenames, PipelineWarning};
use rst_toolkit::{CommandRunner, ToolCommand};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::PipelineConfig;
use crate::params::MapParameters;

pub use grid::{GridOutcome, StagedFiles};

/// Which optional stages [`ConvectionMaps::run`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stages {
    pub plots: bool,
    pub cleanup: bool,
}

impl Default for Stages {
    fn default() -> Self {
        Self {
            plots: true,
            cleanup: true,
        }
    }
}

/// What a run produced and what went wrong along the way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub grid_files: Vec<PathBuf>,
    pub radars_used: Vec<String>,
    pub radars_errors: Vec<String>,
    pub files_used: Vec<PathBuf>,
    pub files_errored: Vec<PathBuf>,
    pub warnings: Vec<PipelineWarning>,
    pub map_file: Option<PathBuf>,
    pub images: Vec<PathBuf>,
}

impl RunReport {
    pub(crate) fn warn(&mut self, warning: PipelineWarning) {
        warn!(warning = %warning, "Pipeline warning");
        self.warnings.push(warning);
    }
}

/// Drives one map run for a date and hemisphere.
pub struct ConvectionMaps {
    params: MapParameters,
    config: PipelineConfig,
    runner: Arc<dyn CommandRunner>,
    files: MapFilenames,
    report: RunReport,
    /// Files this run created in the plot path: staged data and converted pages
    staged: Vec<PathBuf>,
    imf_used: bool,
}

impl ConvectionMaps {
    pub fn new(
        params: MapParameters,
        config: PipelineConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> DarnResult<Self> {
        params.validate()?;
        if same_dir(&params.data_path, &params.plot_path) {
            return Err(DarnError::invalid(
                "plot_path",
                "must differ from the data path; staged copies are removed on cleanup",
            ));
        }

        for dir in [
            &params.plot_path,
            &params.map_path,
            &params.grid_path,
            &params.imf_path,
        ] {
            if let Err(e) = std::fs::create_dir_all(dir) {
                error!(path = %dir.display(), error = %e, "Failed to create directory");
            }
        }

        info!(
            date = %params.date,
            hemisphere = %params.hemisphere,
            channel = ?params.channel,
            data_path = %params.data_path.display(),
            plot_path = %params.plot_path.display(),
            map_path = %params.map_path.display(),
            grid_path = %params.grid_path.display(),
            imf_path = %params.imf_path.display(),
            log_path = %params.log_path.display(),
            "Convection map run configured"
        );

        Ok(Self {
            files: params.filenames(),
            params,
            config,
            runner,
            report: RunReport::default(),
            staged: Vec::new(),
            imf_used: false,
        })
    }

    pub fn params(&self) -> &MapParameters {
        &self.params
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Run every stage in order.
    ///
    /// Cleanup (when enabled) also runs after a failed stage; the stage
    /// error is returned.
    pub async fn run(&mut self, stages: Stages) -> DarnResult<RunReport> {
        let result = self.run_stages(stages).await;

        if stages.cleanup {
            if let Err(e) = self.cleanup().await {
                warn!(error = %e, "Cleanup failed");
            }
        }

        match result {
            Ok(()) => {
                info!(
                    radars = self.report.radars_used.len(),
                    warnings = self.report.warnings.len(),
                    images = self.report.images.len(),
                    "Convection map run finished"
                );
                Ok(self.report.clone())
            }
            Err(e) => {
                error!(error = %e, "Convection map run failed");
                Err(e)
            }
        }
    }

    async fn run_stages(&mut self, stages: Stages) -> DarnResult<()> {
        self.generate_grid_files().await?;
        self.generate_map_files().await?;
        if stages.plots {
            self.generate_plots().await?;
        }
        Ok(())
    }

    /// Start an RST command with the configured global options.
    fn rst(&self, program: &str) -> ToolCommand {
        ToolCommand::new(program).opt_args(&self.config.rst.options)
    }

    fn plot_file(&self, name: String) -> PathBuf {
        self.params.plot_path.join(name)
    }
}

/// Glob pattern for `name_pattern` inside `dir`, with `dir` escaped.
pub(crate) fn glob_in(dir: &Path, name_pattern: &str) -> String {
    format!(
        "{}/{}",
        glob::Pattern::escape(&dir.display().to_string()),
        name_pattern
    )
}

/// Exact-match glob for one file.
pub(crate) fn glob_exact(path: &Path) -> String {
    glob::Pattern::escape(&path.display().to_string())
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

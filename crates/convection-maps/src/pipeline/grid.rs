//! Grid stage: staging fitacf files, `make_grid` per radar, `combine_grid`.

use std::path::{Path, PathBuf};

use darn_common::constants::{GRID_SCAN_LENGTH_SECS, RST_MIN_RANGE, RST_VEMAX};
use darn_common::radar::radars;
use darn_common::{Channel, DarnError, DarnResult, DataFileKind, PipelineWarning};
use futures::stream::{self, StreamExt};
use rst_toolkit::{channel_present, decompress, run_checked};
use tracing::{debug, info, instrument, warn};

use super::{glob_exact, glob_in, ConvectionMaps};

/// Result of staging one radar's data files.
#[derive(Debug, Default)]
pub struct StagedFiles {
    /// Decompressed copies in the plot path, ready for `make_grid`
    pub files: Vec<PathBuf>,
    pub errored: Vec<PathBuf>,
    pub warnings: Vec<PipelineWarning>,
    /// Every file this staging created, including ones later rejected
    pub(crate) created: Vec<PathBuf>,
}

/// Result of gridding one radar.
#[derive(Debug, Clone, PartialEq)]
pub enum GridOutcome {
    Created(PathBuf),
    Failed(PipelineWarning),
}

struct RadarRun {
    radar: &'static str,
    staged: StagedFiles,
    outcome: Option<GridOutcome>,
}

impl ConvectionMaps {
    /// Copy and decompress the day's fitacf files for `radar` into the plot path.
    #[instrument(skip(self), fields(date = %self.params.date))]
    pub async fn stage_data_files(&self, radar: &str) -> DarnResult<StagedFiles> {
        let pattern = glob_in(&self.params.data_path, &self.files.data_pattern(radar));
        let mut sources: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| DarnError::invalid("data_path", e.to_string()))?
            .filter_map(Result::ok)
            .collect();
        sources.sort();

        let mut staged = StagedFiles::default();
        for source in sources {
            if let Err(e) = DataFileKind::detect(&source) {
                warn!(file = %source.display(), error = %e, "Skipping unsupported data file");
                staged.errored.push(source);
                continue;
            }

            let Some(name) = source.file_name() else {
                continue;
            };
            let copy = self.params.plot_path.join(name);
            if let Err(e) = tokio::fs::copy(&source, &copy).await {
                warn!(file = %source.display(), error = %e, "Failed to stage data file");
                staged.warnings.push(PipelineWarning::FileNotFound {
                    file: source.clone(),
                    process: "make_grid".to_string(),
                });
                staged.errored.push(source);
                continue;
            }
            staged.created.push(copy.clone());

            let file = match decompress(self.runner.as_ref(), &copy).await {
                Ok(file) => file,
                Err(e) => {
                    warn!(file = %source.display(), error = %e, "Failed to decompress data file");
                    staged.errored.push(source);
                    continue;
                }
            };
            if file != copy {
                staged.created.push(file.clone());
            }

            let warning = match tokio::fs::metadata(&file).await {
                Ok(meta) if meta.len() > 0 => None,
                Ok(_) => Some(PipelineWarning::EmptyDataFile {
                    file: source.clone(),
                    process: "make_grid".to_string(),
                }),
                Err(_) => Some(PipelineWarning::FileNotFound {
                    file: file.clone(),
                    process: "make_grid".to_string(),
                }),
            };
            if let Some(warning) = warning {
                staged.warnings.push(warning);
                staged.errored.push(source);
                continue;
            }

            debug!(file = %file.display(), "Staged data file");
            staged.files.push(file);
        }

        Ok(staged)
    }

    /// Run `make_grid` over one radar's staged files.
    ///
    /// A toolkit failure or an empty grid is not fatal: the grid file is
    /// removed and the failure comes back as [`GridOutcome::Failed`].
    #[instrument(skip(self, files), fields(date = %self.params.date, files = files.len()))]
    pub async fn generate_radar_grid_file(
        &self,
        radar: &str,
        files: &[PathBuf],
    ) -> DarnResult<GridOutcome> {
        for file in files {
            let matches = file
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(radar));
            if !matches {
                return Err(DarnError::invalid(
                    "radar",
                    format!("{} is not a data file of {}", file.display(), radar),
                ));
            }
        }

        let grid_file = self.params.grid_path.join(self.files.grid(radar));
        let mut cmd = self.rst("make_grid").args([
            "-tl".to_string(),
            GRID_SCAN_LENGTH_SECS.to_string(),
            "-i".to_string(),
            self.params.integration_time.to_string(),
        ]);

        for letter in self.channel_options(files).await {
            cmd = match self.params.channel {
                Channel::All => cmd.arg("-cn_fix").arg(letter.to_string()),
                Channel::Single(_) => cmd
                    .arg("-cn")
                    .arg(letter.to_string())
                    .arg("-cn_fix")
                    .arg(letter.to_string()),
            };
        }

        let mut cmd = cmd
            .arg("-xtd")
            .arg("-minrng")
            .arg(RST_MIN_RANGE.to_string())
            .arg("-vemax")
            .arg(RST_VEMAX.to_string());
        for file in files {
            cmd = cmd.path_arg(file);
        }
        let cmd = cmd.stdout_to(&grid_file);

        match run_checked(self.runner.as_ref(), &cmd, &glob_exact(&grid_file)).await {
            Ok(_) => {
                info!(grid = %grid_file.display(), "Grid file created");
                Ok(GridOutcome::Created(grid_file))
            }
            Err(e) => {
                if grid_file.exists() {
                    tokio::fs::remove_file(&grid_file).await?;
                }
                Ok(GridOutcome::Failed(PipelineWarning::GridFailed {
                    file: grid_file,
                    reason: e.to_string(),
                }))
            }
        }
    }

    /// Channel letters present in `files` for the selected channel.
    ///
    /// A letter counts as present when a file is named for it
    /// (`*.a.fitacf`) or `dmapdump` finds records for it.
    async fn channel_options(&self, files: &[PathBuf]) -> Vec<char> {
        let mut present = Vec::new();
        for letter in self.params.channel.letters() {
            if files.iter().any(|f| named_for_channel(f, letter)) {
                present.push(letter);
                continue;
            }
            for file in files {
                if channel_present(self.runner.as_ref(), file, letter).await {
                    present.push(letter);
                    break;
                }
            }
        }
        present
    }

    /// Grid every radar of the hemisphere and combine the grids.
    ///
    /// Up to `num_proc` radars are staged and gridded concurrently.
    #[instrument(skip(self), fields(date = %self.params.date, hemisphere = %self.params.hemisphere))]
    pub async fn generate_grid_files(&mut self) -> DarnResult<PathBuf> {
        let radar_list = radars(self.params.hemisphere);
        let runs: Vec<DarnResult<RadarRun>> = {
            let this = &*self;
            stream::iter(radar_list.iter().copied())
                .map(|radar| this.process_radar(radar))
                .buffer_unordered(this.params.num_proc)
                .boxed()
                .collect()
                .await
        };

        let mut runs = runs.into_iter().collect::<DarnResult<Vec<_>>>()?;
        runs.sort_by_key(|run| run.radar);

        for run in runs {
            self.staged.extend(run.staged.created);
            self.report.files_used.extend(run.staged.files);
            self.report.files_errored.extend(run.staged.errored);
            for warning in run.staged.warnings {
                self.report.warn(warning);
            }
            match run.outcome {
                Some(GridOutcome::Created(grid)) => {
                    self.report.radars_used.push(run.radar.to_string());
                    self.report.grid_files.push(grid);
                }
                Some(GridOutcome::Failed(warning)) => {
                    self.report.radars_errors.push(run.radar.to_string());
                    self.report.warn(warning);
                }
                None => debug!(radar = run.radar, "No data files"),
            }
        }

        if self.report.grid_files.is_empty() {
            return Err(DarnError::NoGridFiles(
                radar_list.iter().map(|r| r.to_string()).collect(),
            ));
        }

        let grd = self.plot_file(self.files.grd());
        let mut cmd = self.rst("combine_grid");
        for grid in &self.report.grid_files {
            cmd = cmd.path_arg(grid);
        }
        let cmd = cmd.stdout_to(&grd);
        run_checked(self.runner.as_ref(), &cmd, &glob_exact(&grd)).await?;

        info!(
            grd = %grd.display(),
            radars = ?self.report.radars_used,
            "Combined grid files"
        );
        Ok(grd)
    }

    async fn process_radar(&self, radar: &'static str) -> DarnResult<RadarRun> {
        let staged = self.stage_data_files(radar).await?;
        let outcome = if staged.files.is_empty() {
            None
        } else {
            Some(self.generate_radar_grid_file(radar, &staged.files).await?)
        };
        Ok(RadarRun {
            radar,
            staged,
            outcome,
        })
    }
}

fn named_for_channel(file: &Path, letter: char) -> bool {
    file.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains(&format!(".{}.", letter)))
}

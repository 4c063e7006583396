//! Shared state for the web app.

use std::path::PathBuf;
use std::sync::Arc;

use convection_maps::{ConvectionMaps, MapParameters, PipelineConfig, RunReport, Stages};
use darn_common::DarnResult;
use metrics_exporter_prometheus::PrometheusHandle;
use rst_toolkit::CommandRunner;
use tokio::sync::Mutex;
use tracing::info;

use crate::form::MapRequest;
use crate::jobs::JobTracker;

pub struct AppState {
    pub config: PipelineConfig,
    /// Plot path of every run; served under `/static`
    pub static_dir: PathBuf,
    pub runner: Arc<dyn CommandRunner>,
    pub tracker: JobTracker,
    pub metrics: PrometheusHandle,
    /// Runs share intermediate file names per date, so only one runs at a time.
    run_lock: Mutex<()>,
}

impl AppState {
    pub fn new(
        config: PipelineConfig,
        static_dir: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            config,
            static_dir: static_dir.into(),
            runner,
            tracker: JobTracker::new(),
            metrics,
            run_lock: Mutex::new(()),
        }
    }

    /// Run parameters for a form request.
    pub fn parameters(&self, request: &MapRequest) -> MapParameters {
        let mut params = MapParameters::new(request.date);
        self.config.defaults.apply(&mut params);
        params.integration_time = request.integration_time;
        params.start_time = request.start_time;
        params.end_time = request.end_time();
        params.image_ext = "png".to_string();
        params.plot_path = self.static_dir.clone();
        params
    }

    /// Run the full pipeline for `request`, waiting for any run in progress.
    pub async fn generate(&self, job_id: &str, request: &MapRequest) -> DarnResult<RunReport> {
        let params = self.parameters(request);
        let _guard = self.run_lock.lock().await;
        self.tracker.running(job_id).await;

        info!(
            job_id = %job_id,
            date = %params.date,
            start_time = %params.start_time,
            end_time = %params.end_time,
            "Generating convection map"
        );

        let mut maps = ConvectionMaps::new(params, self.config.clone(), Arc::clone(&self.runner))?;
        maps.run(Stages::default()).await
    }
}

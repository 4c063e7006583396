//! Web app routes, driven through the router with fake toolkit scripts.

#![cfg(unix)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use convection_maps::PipelineConfig;
use map_webapp::{build_router, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use test_utils::{fake_rst_toolkit, read_invocations, MapDirs, FAKE_RST_LOG};
use tower::ServiceExt;

struct App {
    tmp: tempfile::TempDir,
    dirs: MapDirs,
    state: Arc<AppState>,
}

impl App {
    fn new() -> Self {
        let tmp = test_utils::temp_test_dir_with_prefix("map_webapp_");
        let dirs = MapDirs::under(tmp.path());

        let mut config = PipelineConfig::default();
        config.rst.bin_dir = Some(fake_rst_toolkit(&dirs.bin));
        config.rst.env.insert(
            FAKE_RST_LOG.to_string(),
            tmp.path().join("calls.log").display().to_string(),
        );
        config.defaults.data_path = Some(dirs.data.clone());
        config.defaults.map_path = Some(dirs.map.clone());
        config.defaults.grid_path = Some(dirs.grid.clone());
        config.defaults.imf_path = Some(dirs.imf.clone());
        config.defaults.log_path = Some(dirs.log.clone());
        config.defaults.key_path = Some(tmp.path().join("keys"));

        // A local IMF file keeps the run away from OMNIWeb
        std::fs::create_dir_all(&dirs.imf).unwrap();
        test_utils::write_file(&dirs.imf, "20170301_imf.txt", b"2017 03 01 0 0 00 -1.2 2.3 -3.0\n");

        let runner = Arc::new(config.runner());
        let metrics = PrometheusBuilder::new().build_recorder().handle();
        let state = Arc::new(AppState::new(config, dirs.plot.clone(), runner, metrics));

        Self { tmp, dirs, state }
    }

    fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(self.router(), request).await
    }

    async fn post_form(&self, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(self.router(), request).await
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_form_page() {
    let app = App::new();
    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<form method=\"post\""));
    assert!(body.contains("name=\"integration_time\" value=\"120\""));
}

#[tokio::test]
async fn test_generates_and_serves_plot() {
    let app = App::new();
    test_utils::write_file(&app.dirs.data, "20170301.0000.00.sas.fitacf", b"sas records");

    let (status, body) = app
        .post_form("date=20170301&integration_time=120&start_time=00%3A00")
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body.contains("<img src=\"/static/20170301.0000.00.png\""));

    let calls = read_invocations(&app.tmp.path().join("calls.log"));
    let plot = calls.iter().find(|c| c.starts_with("map_plot")).unwrap();
    assert!(plot.contains("-st 00:00 -et 00:02"), "{}", plot);
    assert!(calls.iter().any(|c| c.starts_with("map_addimf")));

    let (status, image) = app.get("/static/20170301.0000.00.png").await;
    assert_eq!(status, StatusCode::OK);
    assert!(image.starts_with("%!PS"));

    let (_, status_json) = app.get("/status").await;
    let status: serde_json::Value = serde_json::from_str(&status_json).unwrap();
    assert_eq!(status["total_completed"], 1);
    assert_eq!(status["recent"][0]["success"], true);
    assert_eq!(status["recent"][0]["images"], 2);
}

#[tokio::test]
async fn test_invalid_form_rerendered() {
    let app = App::new();
    let (status, body) = app
        .post_form("date=2017-03-01&integration_time=0&start_time=")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("must be YYYYMMDD"));
    assert!(body.contains("positive number of seconds"));
    assert!(body.contains("Start time is required"));
    assert!(body.contains("value=\"2017-03-01\""));
    assert!(!app.tmp.path().join("calls.log").exists());
}

#[tokio::test]
async fn test_pipeline_failure_is_500() {
    let app = App::new();
    let (status, body) = app
        .post_form("date=20170301&integration_time=120&start_time=00%3A00")
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Map generation failed"));
    assert!(!body.contains("<img"));

    let (_, status_json) = app.get("/status").await;
    let status: serde_json::Value = serde_json::from_str(&status_json).unwrap();
    assert_eq!(status["recent"][0]["success"], false);
    assert!(status["recent"][0]["error_message"].is_string());
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = App::new();

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["service"], "map-webapp");

    let (status, _) = app.get("/metrics").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_static_file() {
    let app = App::new();
    let (status, _) = app.get("/static/19990101.0000.00.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

//! HTTP server for the web app.
//!
//! Provides endpoints for:
//! - `GET /` - The map request form
//! - `POST /` - Generate a map and show its first plot
//! - `GET /static/*` - Generated plots
//! - `GET /status` - Active and recent jobs
//! - `GET /health` - Health check
//! - `GET /metrics` - Prometheus metrics

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Extension, Form},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::form::{render_page, MapForm};
use crate::jobs::JobOutcome;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// GET / - Empty form
async fn form_handler() -> Html<String> {
    Html(render_page(&MapForm::initial(), &[], None))
}

/// POST / - Validate the form and generate the map
async fn submit_handler(
    Extension(state): Extension<Arc<AppState>>,
    Form(form): Form<MapForm>,
) -> Response {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            warn!(errors = ?errors, "Rejected map request");
            metrics::counter!("webapp_map_requests_total", "outcome" => "invalid").increment(1);
            return (
                StatusCode::BAD_REQUEST,
                Html(render_page(&form, &errors, None)),
            )
                .into_response();
        }
    };

    let id = Uuid::new_v4().to_string();
    info!(
        id = %id,
        date = %request.date,
        start_time = %request.start_time,
        integration_time = request.integration_time,
        "Received map request"
    );
    state
        .tracker
        .start(&id, &request.date.to_string(), &request.start_time.to_string())
        .await;

    let started = Instant::now();
    let result = state.generate(&id, &request).await;
    metrics::histogram!("webapp_map_duration_seconds").record(started.elapsed().as_secs_f64());

    match result {
        Ok(report) => {
            info!(id = %id, images = report.images.len(), "Map request completed");
            metrics::counter!("webapp_map_requests_total", "outcome" => "ok").increment(1);
            state
                .tracker
                .complete(
                    &id,
                    JobOutcome {
                        success: true,
                        images: report.images.len(),
                        warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
                        error_message: None,
                    },
                )
                .await;

            let image = request.image_name();
            Html(render_page(&form, &[], Some(&image))).into_response()
        }
        Err(e) => {
            error!(id = %id, error = %e, "Map request failed");
            metrics::counter!("webapp_map_requests_total", "outcome" => "failed").increment(1);
            state
                .tracker
                .complete(
                    &id,
                    JobOutcome {
                        error_message: Some(e.to_string()),
                        ..Default::default()
                    },
                )
                .await;

            let errors = [format!("Map generation failed: {}", e)];
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_page(&form, &errors, None)),
            )
                .into_response()
        }
    }
}

/// GET /status - Active and recent jobs
async fn status_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(state.tracker.get_status().await)
}

/// GET /health - Health check
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "map-webapp".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /metrics - Prometheus metrics
async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(form_handler).post(submit_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .nest_service("/static", ServeDir::new(&state.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}

/// Start the HTTP server.
pub async fn start_server(state: Arc<AppState>, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(port = port, "Starting map web app");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Tracking for map generation jobs started from the form.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

/// A job still running.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveJob {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub started_at: DateTime<Utc>,
    pub status: String,
}

/// A finished job.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedJob {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub success: bool,
    pub images: usize,
    pub warnings: Vec<String>,
    pub error_message: Option<String>,
}

/// How a job ended.
#[derive(Debug, Clone, Default)]
pub struct JobOutcome {
    pub success: bool,
    pub images: usize,
    pub warnings: Vec<String>,
    pub error_message: Option<String>,
}

/// Response for /status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub active: Vec<ActiveJob>,
    pub recent: Vec<CompletedJob>,
    pub total_completed: usize,
}

pub struct JobTracker {
    active: Mutex<HashMap<String, ActiveJob>>,
    completed: Mutex<VecDeque<CompletedJob>>,
    max_completed: usize,
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTracker {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(HashMap::new()),
            completed: Mutex::new(VecDeque::new()),
            max_completed: 100,
        }
    }

    /// Register a queued job. It stays `waiting` until [`JobTracker::running`].
    pub async fn start(&self, id: &str, date: &str, start_time: &str) {
        let job = ActiveJob {
            id: id.to_string(),
            date: date.to_string(),
            start_time: start_time.to_string(),
            started_at: Utc::now(),
            status: "waiting".to_string(),
        };
        self.active.lock().await.insert(id.to_string(), job);
    }

    pub async fn running(&self, id: &str) {
        if let Some(job) = self.active.lock().await.get_mut(id) {
            job.status = "running".to_string();
        }
    }

    pub async fn complete(&self, id: &str, outcome: JobOutcome) {
        let mut active = self.active.lock().await;
        if let Some(job) = active.remove(id) {
            let completed_at = Utc::now();
            let duration_ms = (completed_at - job.started_at).num_milliseconds().max(0) as u64;

            let mut completed = self.completed.lock().await;
            completed.push_front(CompletedJob {
                id: job.id,
                date: job.date,
                start_time: job.start_time,
                started_at: job.started_at,
                completed_at,
                duration_ms,
                success: outcome.success,
                images: outcome.images,
                warnings: outcome.warnings,
                error_message: outcome.error_message,
            });

            while completed.len() > self.max_completed {
                completed.pop_back();
            }
        }
    }

    pub async fn get_status(&self) -> StatusResponse {
        let active = self.active.lock().await;
        let completed = self.completed.lock().await;

        StatusResponse {
            active: active.values().cloned().collect(),
            recent: completed.iter().take(20).cloned().collect(),
            total_completed: completed.len(),
        }
    }
}

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

use job_tracker_backend::database::store::{GradeCursor, JobStore};
use job_tracker_backend::error::{Error, Result};
use job_tracker_backend::models::job::{Job, JobDate};
use job_tracker_backend::models::stats::{DateCount, DateStatusCount, JobCounts};
use job_tracker_backend::utils::time::to_rfc3339;
use job_tracker_backend::{routes, AppState};

/// `JobStore` over a vector, mirroring the Postgres adapter's ordering and
/// modified-count rules.
#[derive(Default)]
pub struct MemoryJobStore {
    rows: Mutex<Vec<(JobDate, Job)>>,
    failing: AtomicBool,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, date: &str, document: JsonValue) {
        let date = JobDate::parse(date).expect("valid date");
        let job: Job = serde_json::from_value(document).expect("valid job document");
        self.rows.lock().unwrap().push((date, job));
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(Error::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn distinct_dates(&self) -> Result<Vec<JobDate>> {
        self.check()?;
        let mut dates: Vec<JobDate> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|(date, _)| date.clone())
            .collect();
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates.dedup();
        Ok(dates)
    }

    async fn find_jobs(
        &self,
        date: &JobDate,
        cursor: Option<GradeCursor>,
        limit: i64,
    ) -> Result<Vec<Job>> {
        self.check()?;
        let mut jobs: Vec<Job> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(d, _)| d == date)
            .map(|(_, job)| job.clone())
            .filter(|job| match &cursor {
                Some(cursor) => cursor.admits(job.grade, &job.job_id),
                None => true,
            })
            .collect();
        jobs.sort_by(|a, b| b.grade.cmp(&a.grade).then_with(|| a.job_id.cmp(&b.job_id)));
        jobs.truncate(limit.max(0) as usize);
        Ok(jobs)
    }

    async fn count_jobs(&self, date: &JobDate) -> Result<JobCounts> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        let partition: Vec<&Job> = rows.iter().filter(|(d, _)| d == date).map(|(_, j)| j).collect();
        Ok(JobCounts {
            total_count: partition.len() as i64,
            pending_count: partition.iter().filter(|j| j.is_pending()).count() as i64,
        })
    }

    async fn find_job(&self, date: &JobDate, job_id: &str) -> Result<Option<Job>> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(d, job)| d == date && job.job_id == job_id)
            .map(|(_, job)| job.clone()))
    }

    async fn set_status(
        &self,
        date: &JobDate,
        job_id: &str,
        status: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let Some((_, job)) = rows
            .iter_mut()
            .find(|(d, job)| d == date && job.job_id == job_id)
        else {
            return Ok(0);
        };
        if job.status.as_deref() == Some(status) {
            return Ok(0);
        }
        job.status = Some(status.to_string());
        job.updated_at = Some(to_rfc3339(updated_at));
        Ok(1)
    }

    async fn date_counts(&self, limit: i64) -> Result<Vec<DateCount>> {
        self.check()?;
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for (date, _) in self.rows.lock().unwrap().iter() {
            *counts.entry(date.to_string()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .rev()
            .take(limit as usize)
            .map(|(date, count)| DateCount { date, count })
            .collect())
    }

    async fn status_counts(&self, limit: i64) -> Result<Vec<DateStatusCount>> {
        self.check()?;
        let mut counts: BTreeMap<String, (i64, i64)> = BTreeMap::new();
        for (_, job) in self.rows.lock().unwrap().iter() {
            let key: String = job.date_listed.as_deref().unwrap_or("").chars().take(10).collect();
            let entry = counts.entry(key).or_default();
            entry.0 += 1;
            if job.is_pending() {
                entry.1 += 1;
            }
        }
        Ok(counts
            .into_iter()
            .rev()
            .take(limit as usize)
            .map(|(date, (total_count, pending_count))| DateStatusCount {
                date,
                total_count,
                pending_count,
            })
            .collect())
    }
}

pub fn app(store: Arc<MemoryJobStore>) -> Router {
    routes::router(AppState::new(store))
}

pub fn job_doc(id: &str, grade: JsonValue) -> JsonValue {
    json!({
        "job_id": id,
        "title": format!("Engineer {}", id),
        "company": "Acme",
        "work_location": "Remote",
        "work_style": "Remote",
        "description": "Build things",
        "experience_required": 3,
        "skills": "Rust, SQL",
        "grade": grade,
        "date_listed": "2024-03-01T09:00:00Z",
        "date_applied": "Pending",
        "questions": []
    })
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    match body {
        Some(body) => send_raw(app, method, uri, Some("application/json"), &body.to_string()).await,
        None => send_raw(app, method, uri, None, "").await,
    }
}

/// Sends `body` verbatim, with a content type only when one is given.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, body)
}

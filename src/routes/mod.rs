pub mod extract;
pub mod health;
pub mod jobs;
pub mod stats;

use axum::{
    routing::{get, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        jobs::list_dates,
        jobs::list_jobs,
        jobs::get_job,
        jobs::update_job_status,
        jobs::list_statuses,
        stats::date_stats,
        stats::status_stats,
    ),
    tags((name = "jobs", description = "Scraped job postings by date"))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Full HTTP surface with state attached.
pub fn router(state: AppState) -> Router {
    let jobs_api = Router::new()
        .route("/api/jobs/dates", get(jobs::list_dates))
        .route("/api/jobs/stats", get(stats::date_stats))
        .route("/api/jobs/status-stats", get(stats::status_stats))
        .route("/api/jobs/statuses", get(jobs::list_statuses))
        .route("/api/jobs/:date", get(jobs::list_jobs))
        .route("/api/jobs/:date/:id", get(jobs::get_job))
        .route("/api/jobs/:date/:id/status", put(jobs::update_job_status));

    Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(jobs_api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

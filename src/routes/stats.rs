use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::job_dto::{DateStatsResponse, StatusStatsResponse},
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs/stats",
    responses(
        (status = 200, description = "Job count per scrape date, last ten dates", body = Json<DateStatsResponse>),
        (status = 500, description = "Failed to fetch job statistics")
    )
)]
#[axum::debug_handler]
pub async fn date_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let date_stats = state.stats_service.date_counts().await?;
    Ok(Json(DateStatsResponse { date_stats }))
}

#[utoipa::path(
    get,
    path = "/api/jobs/status-stats",
    responses(
        (status = 200, description = "Total and pending counts per listing date", body = Json<StatusStatsResponse>),
        (status = 500, description = "Failed to fetch job status statistics")
    )
)]
#[axum::debug_handler]
pub async fn status_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let status_stats = state.stats_service.status_counts().await?;
    Ok(Json(StatusStatsResponse { status_stats }))
}

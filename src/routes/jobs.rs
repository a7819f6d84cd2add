use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    database::store::GradeCursor,
    dto::job_dto::{
        DateListQuery, DateListResponse, JobListQuery, JobListResponse, JobResponse,
        StatusListResponse, UpdateJobStatusPayload, UpdateJobStatusResponse,
    },
    error::{Error, Result},
    models::job::JobDate,
    routes::extract::{ApiJson, ApiPath, ApiQuery},
    services::{
        date_service::{DatePageRequest, DEFAULT_DATE_PAGE_SIZE},
        job_service::{JobPageRequest, DEFAULT_JOB_PAGE_SIZE},
    },
    utils::validation::page_size,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs/dates",
    params(
        ("limit" = Option<i64>, Query, description = "Number of dates to return"),
        ("cursor" = Option<String>, Query, description = "Last date of the previous page"),
        ("offset" = Option<i64>, Query, description = "Dates to skip when no cursor is given")
    ),
    responses(
        (status = 200, description = "Job dates, newest first", body = Json<DateListResponse>),
        (status = 400, description = "Invalid cursor or offset")
    )
)]
#[axum::debug_handler]
pub async fn list_dates(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DateListQuery>,
) -> Result<impl IntoResponse> {
    query.validate()?;
    let cursor = query.cursor.as_deref().map(JobDate::parse).transpose()?;
    let request = DatePageRequest {
        limit: page_size(query.limit, DEFAULT_DATE_PAGE_SIZE),
        cursor,
        offset: query.offset.unwrap_or(0).max(0) as usize,
    };

    let page = state.date_service.list_dates(request).await;
    Ok(Json(DateListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{date}",
    params(
        ("date" = String, Path, description = "Partition date, YYYY-MM-DD"),
        ("limit" = Option<i64>, Query, description = "Jobs per page"),
        ("lastGrade" = Option<i32>, Query, description = "Grade of the last job already seen"),
        ("lastJobId" = Option<String>, Query, description = "Id of the last job already seen, breaks grade ties")
    ),
    responses(
        (status = 200, description = "Jobs of the date by descending grade", body = Json<JobListResponse>),
        (status = 400, description = "Invalid date format")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    ApiPath(date): ApiPath<String>,
    ApiQuery(query): ApiQuery<JobListQuery>,
) -> Result<impl IntoResponse> {
    let date = JobDate::parse(&date)?;
    query.validate()?;

    let cursor = match (query.last_grade, query.last_job_id) {
        (Some(grade), Some(job_id)) => Some(GradeCursor::after(grade, job_id)),
        (Some(grade), None) => Some(GradeCursor::below(grade)),
        (None, _) => None,
    };
    let request = JobPageRequest {
        limit: page_size(query.limit, DEFAULT_JOB_PAGE_SIZE),
        cursor,
        include_counts: true,
    };

    let page = state.job_service.list_jobs(&date, request).await;
    Ok(Json(JobListResponse::new(date, page)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{date}/{id}",
    params(
        ("date" = String, Path, description = "Partition date, YYYY-MM-DD"),
        ("id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = Json<JobResponse>),
        (status = 400, description = "Invalid date format"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    ApiPath((date, id)): ApiPath<(String, String)>,
) -> Result<impl IntoResponse> {
    let date = JobDate::parse(&date)?;
    let job = state
        .job_service
        .get_job(&id, Some(&date))
        .await
        .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
    Ok(Json(JobResponse { job }))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{date}/{id}/status",
    params(
        ("date" = String, Path, description = "Partition date, YYYY-MM-DD"),
        ("id" = String, Path, description = "Job ID")
    ),
    request_body = UpdateJobStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<UpdateJobStatusResponse>),
        (status = 400, description = "Missing status"),
        (status = 404, description = "Job not found or status unchanged")
    )
)]
#[axum::debug_handler]
pub async fn update_job_status(
    State(state): State<AppState>,
    ApiPath((date, id)): ApiPath<(String, String)>,
    ApiJson(payload): ApiJson<UpdateJobStatusPayload>,
) -> Result<impl IntoResponse> {
    let date = JobDate::parse(&date)?;
    let status = payload
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::BadRequest("Status is required".to_string()))?
        .to_string();
    payload.validate()?;

    if !state
        .job_service
        .update_job_status(&id, &status, Some(&date))
        .await
    {
        return Err(Error::NotFound(
            "Failed to update job status or job not found".to_string(),
        ));
    }
    Ok(Json(UpdateJobStatusResponse { success: true }))
}

#[utoipa::path(
    get,
    path = "/api/jobs/statuses",
    responses(
        (status = 200, description = "Known application statuses", body = Json<StatusListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_statuses() -> impl IntoResponse {
    Json(StatusListResponse::default())
}

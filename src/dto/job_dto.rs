use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::job::{Job, JobDate, JobStatus};
use crate::models::stats::{DateCount, DateStatusCount};
use crate::services::date_service::DatePage;
use crate::services::job_service::JobPage;

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct DateListQuery {
    pub limit: Option<i64>,
    #[validate(length(equal = 10))]
    pub cursor: Option<String>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateListResponse {
    pub dates: Vec<JobDate>,
    pub next_cursor: Option<JobDate>,
    pub has_more: bool,
}

impl From<DatePage> for DateListResponse {
    fn from(page: DatePage) -> Self {
        Self {
            dates: page.dates,
            next_cursor: page.next_cursor,
            has_more: page.has_more,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct JobListQuery {
    pub limit: Option<i64>,
    pub last_grade: Option<i32>,
    #[validate(length(min = 1))]
    pub last_job_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub has_more: bool,
    pub next_grade: Option<i32>,
    pub next_job_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListResponse {
    pub date: JobDate,
    pub jobs: Vec<Job>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_count: Option<i64>,
    pub pagination: PaginationInfo,
}

impl JobListResponse {
    pub fn new(date: JobDate, page: JobPage) -> Self {
        Self {
            date,
            total_count: page.counts.map(|c| c.total_count),
            pending_count: page.counts.map(|c| c.pending_count),
            pagination: PaginationInfo {
                has_more: page.has_more,
                next_grade: page.next_grade,
                next_job_id: page.next_job_id,
            },
            jobs: page.jobs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub job: Job,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateJobStatusPayload {
    #[validate(length(min = 1, max = 64))]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateJobStatusResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateStatsResponse {
    pub date_stats: Vec<DateCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusStatsResponse {
    pub status_stats: Vec<DateStatusCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusListResponse {
    pub statuses: Vec<String>,
}

impl Default for StatusListResponse {
    fn default() -> Self {
        Self {
            statuses: JobStatus::ALL.iter().map(|s| s.as_str().to_string()).collect(),
        }
    }
}

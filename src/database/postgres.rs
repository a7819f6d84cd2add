use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{FromRow, PgPool};

use crate::database::store::{GradeCursor, JobStore};
use crate::error::Result;
use crate::models::job::{Job, JobDate};
use crate::models::stats::{DateCount, DateStatusCount, JobCounts};
use crate::utils::time::to_rfc3339;

const EFFECTIVE_STATUS: &str =
    "COALESCE(NULLIF(status, ''), NULLIF(document ->> 'status', ''), 'Pending')";

/// Single-table adapter: every partition lives in `job_applications`,
/// keyed by `scraped_on`.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

/// The row's own `job_id` and `grade` columns win over the document, so the
/// grade a client sees is the one the page was sorted by.
#[derive(Debug, FromRow)]
struct JobRow {
    job_id: String,
    grade: i32,
    document: JsonValue,
    status: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

impl JobRow {
    fn into_job(self) -> Result<Job> {
        let mut job: Job = serde_json::from_value(self.document)?;
        job.job_id = self.job_id;
        job.grade = self.grade;
        if let Some(status) = self.status {
            job.status = Some(status);
        }
        if let Some(updated_at) = self.updated_at {
            job.updated_at = Some(to_rfc3339(updated_at));
        }
        Ok(job)
    }
}

/// Decodes a page of rows, dropping records whose document no longer fits `Job`.
fn decode_rows(date: &JobDate, rows: Vec<JobRow>) -> Vec<Job> {
    rows.into_iter()
        .filter_map(|row| {
            let job_id = row.job_id.clone();
            match row.into_job() {
                Ok(job) => Some(job),
                Err(e) => {
                    tracing::warn!(error = %e, date = %date, job_id = %job_id, "skipping undecodable job record");
                    None
                }
            }
        })
        .collect()
}

#[derive(Debug, FromRow)]
struct CountRow {
    total_count: i64,
    pending_count: i64,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn distinct_dates(&self) -> Result<Vec<JobDate>> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT scraped_on FROM job_applications ORDER BY scraped_on DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let dates = rows
            .into_iter()
            .filter_map(|raw| match JobDate::parse(&raw) {
                Ok(date) => Some(date),
                Err(_) => {
                    tracing::warn!(scraped_on = %raw, "skipping malformed partition key");
                    None
                }
            })
            .collect();
        Ok(dates)
    }

    async fn find_jobs(
        &self,
        date: &JobDate,
        cursor: Option<GradeCursor>,
        limit: i64,
    ) -> Result<Vec<Job>> {
        let (last_grade, last_job_id) = match cursor {
            Some(GradeCursor { grade, job_id }) => (Some(grade), job_id),
            None => (None, None),
        };

        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT job_id, grade, document, status, updated_at
            FROM job_applications
            WHERE scraped_on = $1
              AND (
                $2::INTEGER IS NULL
                OR grade < $2
                OR ($3::TEXT IS NOT NULL AND grade = $2 AND job_id > $3)
              )
            ORDER BY grade DESC, job_id ASC
            LIMIT $4
            "#,
        )
        .bind(date.as_str())
        .bind(last_grade)
        .bind(last_job_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_rows(date, rows))
    }

    async fn count_jobs(&self, date: &JobDate) -> Result<JobCounts> {
        let query = format!(
            "SELECT COUNT(*) AS total_count,
                    COUNT(*) FILTER (WHERE {} = 'Pending') AS pending_count
             FROM job_applications
             WHERE scraped_on = $1",
            EFFECTIVE_STATUS
        );
        let row = sqlx::query_as::<_, CountRow>(&query)
            .bind(date.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(JobCounts {
            total_count: row.total_count,
            pending_count: row.pending_count,
        })
    }

    async fn find_job(&self, date: &JobDate, job_id: &str) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT job_id, grade, document, status, updated_at
            FROM job_applications
            WHERE scraped_on = $1 AND job_id = $2
            "#,
        )
        .bind(date.as_str())
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(JobRow::into_job).transpose()
    }

    async fn set_status(
        &self,
        date: &JobDate,
        job_id: &str,
        status: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE job_applications
            SET status = $3, updated_at = $4
            WHERE scraped_on = $1
              AND job_id = $2
              AND COALESCE(status, document ->> 'status') IS DISTINCT FROM $3
            "#,
        )
        .bind(date.as_str())
        .bind(job_id)
        .bind(status)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected())
    }

    async fn date_counts(&self, limit: i64) -> Result<Vec<DateCount>> {
        let rows = sqlx::query_as::<_, DateCount>(
            r#"
            SELECT scraped_on AS date, COUNT(*) AS count
            FROM job_applications
            GROUP BY scraped_on
            ORDER BY scraped_on DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn status_counts(&self, limit: i64) -> Result<Vec<DateStatusCount>> {
        let query = format!(
            "SELECT COALESCE(substr(document ->> 'date_listed', 1, 10), '') AS date,
                    COUNT(*) AS total_count,
                    COUNT(*) FILTER (WHERE {} = 'Pending') AS pending_count
             FROM job_applications
             GROUP BY 1
             ORDER BY 1 DESC
             LIMIT $1",
            EFFECTIVE_STATUS
        );
        let rows = sqlx::query_as::<_, DateStatusCount>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

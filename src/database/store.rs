use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::job::{Job, JobDate};
use crate::models::stats::{DateCount, DateStatusCount, JobCounts};

/// Position after the last job of a page.
///
/// Without `job_id` only jobs strictly below `grade` follow. With it, jobs
/// sharing `grade` but ordered after `job_id` follow as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeCursor {
    pub grade: i32,
    pub job_id: Option<String>,
}

impl GradeCursor {
    pub fn below(grade: i32) -> Self {
        Self { grade, job_id: None }
    }

    pub fn after(grade: i32, job_id: impl Into<String>) -> Self {
        Self {
            grade,
            job_id: Some(job_id.into()),
        }
    }

    /// Whether a job at (`grade`, `job_id`) sorts after this cursor.
    pub fn admits(&self, grade: i32, job_id: &str) -> bool {
        match &self.job_id {
            None => grade < self.grade,
            Some(last_id) => grade < self.grade || (grade == self.grade && job_id > last_id.as_str()),
        }
    }
}

/// Access to date-partitioned job records.
///
/// `find_jobs` orders by `grade` descending, then `job_id` ascending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Every partition holding at least one job.
    async fn distinct_dates(&self) -> Result<Vec<JobDate>>;

    async fn find_jobs(
        &self,
        date: &JobDate,
        cursor: Option<GradeCursor>,
        limit: i64,
    ) -> Result<Vec<Job>>;

    async fn count_jobs(&self, date: &JobDate) -> Result<JobCounts>;

    async fn find_job(&self, date: &JobDate, job_id: &str) -> Result<Option<Job>>;

    /// Sets `status` and `updated_at` and returns the number of records
    /// modified. A record already carrying `status` is not modified.
    async fn set_status(
        &self,
        date: &JobDate,
        job_id: &str,
        status: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64>;

    async fn date_counts(&self, limit: i64) -> Result<Vec<DateCount>>;

    async fn status_counts(&self, limit: i64) -> Result<Vec<DateStatusCount>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_cursor_excludes_equal_grades() {
        let cursor = GradeCursor::below(500);
        assert!(cursor.admits(499, "z"));
        assert!(!cursor.admits(500, "z"));
        assert!(!cursor.admits(501, "a"));
    }

    #[test]
    fn tie_break_cursor_admits_later_ids_at_same_grade() {
        let cursor = GradeCursor::after(500, "job-2");
        assert!(cursor.admits(500, "job-3"));
        assert!(!cursor.admits(500, "job-2"));
        assert!(!cursor.admits(500, "job-1"));
        assert!(cursor.admits(10, "job-0"));
    }
}

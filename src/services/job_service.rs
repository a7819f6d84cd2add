use std::sync::Arc;

use crate::database::store::{GradeCursor, JobStore};
use crate::error::Result;
use crate::models::job::{Job, JobDate};
use crate::models::stats::JobCounts;
use crate::utils::time::now;

pub const DEFAULT_JOB_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct JobPageRequest {
    pub limit: usize,
    pub cursor: Option<GradeCursor>,
    pub include_counts: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub has_more: bool,
    pub next_grade: Option<i32>,
    pub next_job_id: Option<String>,
    pub counts: Option<JobCounts>,
}

impl JobPage {
    fn empty(include_counts: bool) -> Self {
        Self {
            counts: include_counts.then(JobCounts::default),
            ..Default::default()
        }
    }
}

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// One page of a partition ordered by descending grade.
    ///
    /// Any store failure collapses the whole page to the empty result.
    pub async fn list_jobs(&self, date: &JobDate, request: JobPageRequest) -> JobPage {
        let include_counts = request.include_counts;
        match self.try_list_jobs(date, request).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, date = %date, "Error fetching jobs by date");
                JobPage::empty(include_counts)
            }
        }
    }

    async fn try_list_jobs(&self, date: &JobDate, request: JobPageRequest) -> Result<JobPage> {
        let limit = request.limit.max(1);
        let fetch = self.store.find_jobs(date, request.cursor, limit as i64 + 1);

        let (mut jobs, counts) = if request.include_counts {
            let (jobs, counts) = tokio::try_join!(fetch, self.store.count_jobs(date))?;
            (jobs, Some(counts))
        } else {
            (fetch.await?, None)
        };

        let has_more = jobs.len() > limit;
        jobs.truncate(limit);

        let (next_grade, next_job_id) = match jobs.last() {
            Some(last) if has_more => (Some(last.grade), Some(last.job_id.clone())),
            _ => (None, None),
        };

        Ok(JobPage {
            jobs,
            has_more,
            next_grade,
            next_job_id,
            counts,
        })
    }

    /// Looks in `date` only when given, otherwise every partition newest first.
    pub async fn get_job(&self, job_id: &str, date: Option<&JobDate>) -> Option<Job> {
        let result = match date {
            Some(date) => self.store.find_job(date, job_id).await,
            None => self.scan_for_job(job_id).await.map(|hit| hit.map(|(_, job)| job)),
        };

        match result {
            Ok(job) => {
                if job.is_none() {
                    tracing::debug!(job_id, "job not found");
                }
                job
            }
            Err(e) => {
                tracing::error!(error = %e, job_id, "Error fetching job");
                None
            }
        }
    }

    /// Sets the status of one job. `true` only when a record was modified,
    /// so repeating the current status returns `false`.
    pub async fn update_job_status(&self, job_id: &str, status: &str, date: Option<&JobDate>) -> bool {
        if status.trim().is_empty() {
            return false;
        }

        match self.try_update_status(job_id, status, date).await {
            Ok(modified) => modified,
            Err(e) => {
                tracing::error!(error = %e, job_id, "Error updating job status");
                false
            }
        }
    }

    async fn try_update_status(
        &self,
        job_id: &str,
        status: &str,
        date: Option<&JobDate>,
    ) -> Result<bool> {
        let date = match date {
            Some(date) => date.clone(),
            None => match self.scan_for_job(job_id).await? {
                Some((date, _)) => date,
                None => return Ok(false),
            },
        };

        let modified = self.store.set_status(&date, job_id, status, now()).await?;
        if modified > 0 {
            tracing::info!(job_id, date = %date, status, "job status updated");
        }
        Ok(modified > 0)
    }

    async fn scan_for_job(&self, job_id: &str) -> Result<Option<(JobDate, Job)>> {
        let mut dates = self.store.distinct_dates().await?;
        dates.sort_unstable_by(|a, b| b.cmp(a));

        for date in dates {
            if let Some(job) = self.store.find_job(&date, job_id).await? {
                return Ok(Some((date, job)));
            }
        }
        Ok(None)
    }
}

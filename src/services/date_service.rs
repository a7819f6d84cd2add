use std::sync::Arc;

use crate::database::store::JobStore;
use crate::models::job::JobDate;

pub const DEFAULT_DATE_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct DatePageRequest {
    pub limit: usize,
    /// Last date of the previous page; takes precedence over `offset`.
    pub cursor: Option<JobDate>,
    pub offset: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatePage {
    pub dates: Vec<JobDate>,
    pub next_cursor: Option<JobDate>,
    pub has_more: bool,
}

#[derive(Clone)]
pub struct DateService {
    store: Arc<dyn JobStore>,
}

impl DateService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Newest-first page of partitions. Store failures yield an empty page.
    pub async fn list_dates(&self, request: DatePageRequest) -> DatePage {
        let limit = request.limit.max(1);

        let mut dates = match self.store.distinct_dates().await {
            Ok(dates) => dates,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching job dates");
                return DatePage::default();
            }
        };
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates.dedup();

        let start = match &request.cursor {
            Some(cursor) => dates.partition_point(|d| d >= cursor),
            None => request.offset.min(dates.len()),
        };
        let mut window: Vec<JobDate> = dates.into_iter().skip(start).take(limit + 1).collect();

        let has_more = window.len() > limit;
        window.truncate(limit);
        let next_cursor = if has_more { window.last().cloned() } else { None };

        DatePage {
            dates: window,
            next_cursor,
            has_more,
        }
    }
}

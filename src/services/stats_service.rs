use std::sync::Arc;

use crate::database::store::JobStore;
use crate::error::Result;
use crate::models::stats::{DateCount, DateStatusCount};

pub const STATS_WINDOW: i64 = 10;

/// Dashboard aggregates. Unlike the listing services these propagate
/// store failures.
#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn JobStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    pub async fn date_counts(&self) -> Result<Vec<DateCount>> {
        self.store.date_counts(STATS_WINDOW).await
    }

    /// Totals per listing day, newest first as the store returns them.
    pub async fn status_counts(&self) -> Result<Vec<DateStatusCount>> {
        self.store.status_counts(STATS_WINDOW).await
    }
}

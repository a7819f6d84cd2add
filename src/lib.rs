pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::database::store::JobStore;
use crate::services::{
    date_service::DateService, job_service::JobService, stats_service::StatsService,
};

#[derive(Clone)]
pub struct AppState {
    pub date_service: DateService,
    pub job_service: JobService,
    pub stats_service: StatsService,
}

impl AppState {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self {
            date_service: DateService::new(store.clone()),
            job_service: JobService::new(store.clone()),
            stats_service: StatsService::new(store),
        }
    }
}

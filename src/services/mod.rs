pub mod date_service;
pub mod job_service;
pub mod stats_service;

pub mod analytics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod residency;
pub mod telemetry;

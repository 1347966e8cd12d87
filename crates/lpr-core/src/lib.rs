//! Shared domain model for listing performance reports.
//!
//! Holds the metric vocabulary, the report period, the request shape, the
//! document tree handed to renderers, and environment-driven configuration.

use chrono::NaiveDate;
use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod location;
pub mod metric;
pub mod period;
pub mod report;
pub mod request;
pub mod submission;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_GOOGLE_BASE_URL};
pub use location::{DatedValue, LocationRef};
pub use metric::{normalize, CounterId, MetricKind, UnsupportedMetric};
pub use period::ReportPeriod;
pub use report::{
    LocationAggregate, LocationMetricEntry, LocationOutcome, LocationPerformanceResult,
    MetricError, MetricSlot, PerformanceMetricResult, ReportDocument, SubAccount,
    SubAccountMetrics, SubAccountSection, SubmissionRow, TableResult,
};
pub use request::{load_request, ReportRequest, SubAccountRequest};
pub use submission::{StatusCategory, SubmissionKind, SubmissionRecord};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("report period starts on {start} but ends on {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read request file {path}: {source}")]
    RequestFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse request file {path}: {reason}")]
    RequestFileParse { path: String, reason: String },
}

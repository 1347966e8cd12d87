//! The seam between the engine and wherever metrics actually live.

use async_trait::async_trait;
use lpr_core::{CounterId, DatedValue, LocationRef, ReportPeriod, SubmissionKind, SubmissionRecord};

/// Failure of a single provider call. Recorded in the report as an error
/// string on the unit it belongs to; never aborts assembly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("connection failed: {0}")]
    Connectivity(String),

    #[error("no credential available for {0}")]
    MissingCredential(String),

    #[error("credential rejected: {0}")]
    Unauthorized(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    #[error("storage error: {0}")]
    Storage(String),
}

impl ProviderError {
    /// Message recorded in the report, without the class prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ProviderError::Connectivity(message)
            | ProviderError::MissingCredential(message)
            | ProviderError::Unauthorized(message)
            | ProviderError::Upstream(message)
            | ProviderError::Storage(message) => message,
            ProviderError::Timeout { .. } => "request timed out",
        }
    }
}

/// Source of submissions, locations and daily counters for a report.
///
/// Submissions must be filtered to `period` and returned newest first.
/// Locations must be returned ascending by business name.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    async fn fetch_submissions(
        &self,
        kind: SubmissionKind,
        sub_account_id: i64,
        period: &ReportPeriod,
    ) -> Result<Vec<SubmissionRecord>, ProviderError>;

    async fn list_locations(
        &self,
        sub_account_id: i64,
        location_ids: &[i64],
    ) -> Result<Vec<LocationRef>, ProviderError>;

    async fn fetch_location_time_series(
        &self,
        location: &LocationRef,
        counter: CounterId,
        period: &ReportPeriod,
    ) -> Result<Vec<DatedValue>, ProviderError>;

    /// Display name for a sub-account. Falls back to
    /// [`lpr_core::SubAccount::placeholder_name`] rather than failing.
    async fn resolve_sub_account_name(&self, sub_account_id: i64) -> String;
}

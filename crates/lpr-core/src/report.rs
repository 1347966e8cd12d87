//! The assembled report tree handed to renderers.
//!
//! Everything here serializes to camelCase JSON. Failures are data: a table
//! that could not be fetched is a [`MetricSlot::Failed`], a location whose
//! counter could not be fetched is a [`LocationOutcome::Failed`].

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::location::DatedValue;
use crate::metric::{CounterId, UnsupportedMetric};
use crate::submission::StatusCategory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccount {
    pub id: i64,
    pub display_name: String,
}

impl SubAccount {
    /// Name used when the organization lookup has no row for `id`.
    #[must_use]
    pub fn placeholder_name(id: i64) -> String {
        format!("Sub-Account {id}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRow {
    pub subject_name: String,
    pub updated_at: DateTime<Utc>,
    pub status: Option<String>,
    pub status_category: StatusCategory,
    pub invoice_status: Option<String>,
    pub invoice_status_category: StatusCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResult {
    pub total_count: usize,
    pub rows: Vec<SubmissionRow>,
    pub empty: bool,
}

/// A metric that could not be produced for one sub-account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricError {
    pub metric: String,
    pub display_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum MetricSlot<T> {
    Ready(T),
    Failed(MetricError),
}

impl<T> MetricSlot<T> {
    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            MetricSlot::Ready(value) => Some(value),
            MetricSlot::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn failed(&self) -> Option<&MetricError> {
        match self {
            MetricSlot::Ready(_) => None,
            MetricSlot::Failed(err) => Some(err),
        }
    }
}

/// Serialized flat with every key present: a failed location reports
/// `total: 0` and `timeSeries: null`, a fetched one `error: null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationOutcome {
    Fetched {
        time_series: Vec<DatedValue>,
        total: u64,
    },
    Failed {
        error: String,
    },
}

impl Serialize for LocationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        match self {
            LocationOutcome::Fetched { time_series, total } => {
                map.serialize_entry("status", "fetched")?;
                map.serialize_entry("timeSeries", time_series)?;
                map.serialize_entry("total", total)?;
                map.serialize_entry("error", &None::<String>)?;
            }
            LocationOutcome::Failed { error } => {
                map.serialize_entry("status", "failed")?;
                map.serialize_entry("timeSeries", &None::<Vec<DatedValue>>)?;
                map.serialize_entry("total", &0u64)?;
                map.serialize_entry("error", error)?;
            }
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPerformanceResult {
    pub business_name: String,
    pub locality: Option<String>,
    pub address: String,
    #[serde(flatten)]
    pub outcome: LocationOutcome,
}

impl LocationPerformanceResult {
    /// Counter total; 0 when the fetch failed.
    #[must_use]
    pub fn total(&self) -> u64 {
        match &self.outcome {
            LocationOutcome::Fetched { total, .. } => *total,
            LocationOutcome::Failed { .. } => 0,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            LocationOutcome::Fetched { .. } => None,
            LocationOutcome::Failed { error } => Some(error),
        }
    }

    #[must_use]
    pub fn time_series(&self) -> Option<&[DatedValue]> {
        match &self.outcome {
            LocationOutcome::Fetched { time_series, .. } => Some(time_series),
            LocationOutcome::Failed { .. } => None,
        }
    }
}

/// One counter across the locations of a sub-account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetricResult {
    pub counter: CounterId,
    pub display_name: String,
    pub locations: Vec<LocationPerformanceResult>,
    pub grand_total: u64,
    /// Per-date sums across every location that produced a series.
    pub combined_series: Option<Vec<DatedValue>>,
    /// Set when the whole metric failed; `locations` is then empty.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMetricEntry {
    pub counter: CounterId,
    pub display_name: String,
    pub total: u64,
    pub error: Option<String>,
    pub time_series: Option<Vec<DatedValue>>,
}

/// All counters reported for one business name within a sub-account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAggregate {
    pub business_name: String,
    pub locality: Option<String>,
    pub address: String,
    pub metrics: Vec<LocationMetricEntry>,
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountMetrics {
    pub reinstatement: Option<MetricSlot<TableResult>>,
    pub verification: Option<MetricSlot<TableResult>>,
    pub review_removal: Option<MetricSlot<TableResult>>,
    pub performance_metrics: Vec<PerformanceMetricResult>,
    pub unsupported_metrics: Vec<UnsupportedMetric>,
    pub locations: Vec<LocationAggregate>,
}

impl SubAccountMetrics {
    /// Number of error markers at any granularity.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.unsupported_metrics.len() + self.fetch_issue_count()
    }

    /// Failed tables, failed metrics and failed locations.
    #[must_use]
    pub fn fetch_issue_count(&self) -> usize {
        let tables = [&self.reinstatement, &self.verification, &self.review_removal]
            .into_iter()
            .flatten()
            .filter(|slot| slot.failed().is_some())
            .count();
        let performance: usize = self
            .performance_metrics
            .iter()
            .map(|metric| {
                usize::from(metric.error.is_some())
                    + metric
                        .locations
                        .iter()
                        .filter(|loc| loc.error().is_some())
                        .count()
            })
            .sum();
        tables + performance
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountSection {
    pub sub_account: SubAccount,
    pub metrics: SubAccountMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub title: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub organization_name: String,
    pub generated_at: DateTime<Utc>,
    pub sub_accounts: Vec<SubAccountSection>,
}

impl ReportDocument {
    /// Error markers across the document.
    ///
    /// Unsupported identifiers are repeated in every section but count once.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        let unsupported: HashSet<&str> = self
            .sub_accounts
            .iter()
            .flat_map(|section| &section.metrics.unsupported_metrics)
            .map(|marker| marker.metric.as_str())
            .collect();
        let fetch: usize = self
            .sub_accounts
            .iter()
            .map(|section| section.metrics.fetch_issue_count())
            .sum();
        unsupported.len() + fetch
    }
}

//! Report tree assembly.
//!
//! Assembly is pure: it takes a validated [`AssemblyPlan`] plus everything
//! the provider returned and folds it into a [`ReportDocument`]. Fetching
//! lives in [`crate::collect`].

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use lpr_core::{
    normalize, CounterId, LocationAggregate, LocationMetricEntry, MetricError, MetricKind,
    MetricSlot, PerformanceMetricResult, ReportDocument, ReportPeriod, ReportRequest, SubAccount,
    SubAccountMetrics, SubAccountRequest, SubAccountSection, SubmissionKind, SubmissionRecord,
    TableResult, UnsupportedMetric,
};

use crate::performance::{self, LocationFetch};
use crate::provider::ProviderError;
use crate::submissions::build_table;
use crate::timeseries;

/// Conditions under which no document can be produced at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyFatalError {
    #[error("report request lists no metrics")]
    NoMetricsRequested,

    #[error("report request lists no sub-accounts")]
    NoSubAccounts,

    #[error("report period starts on {start} but ends on {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
}

/// A report request after validation and metric normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyPlan {
    pub title: String,
    pub organization_name: String,
    pub period: ReportPeriod,
    /// Supported kinds, de-duplicated, in request order.
    pub metrics: Vec<MetricKind>,
    pub unsupported: Vec<UnsupportedMetric>,
    pub sub_accounts: Vec<SubAccountRequest>,
}

impl AssemblyPlan {
    /// Validate `request` and normalize its metric identifiers.
    ///
    /// Repeated identifiers keep only their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyFatalError`] when the request lists no metrics, no
    /// sub-accounts, or a period whose start is after its end, checked in
    /// that order.
    pub fn from_request(request: &ReportRequest) -> Result<Self, AssemblyFatalError> {
        if request.requested_metric_kinds.is_empty() {
            return Err(AssemblyFatalError::NoMetricsRequested);
        }
        if request.sub_accounts.is_empty() {
            return Err(AssemblyFatalError::NoSubAccounts);
        }
        let period = ReportPeriod::new(request.period_start, request.period_end).map_err(|_| {
            AssemblyFatalError::InvalidPeriod {
                start: request.period_start,
                end: request.period_end,
            }
        })?;

        let mut seen = HashSet::new();
        let mut metrics = Vec::new();
        let mut unsupported = Vec::new();
        for raw in &request.requested_metric_kinds {
            if !seen.insert(raw.as_str()) {
                continue;
            }
            match normalize(raw) {
                Ok(kind) => metrics.push(kind),
                Err(marker) => unsupported.push(marker),
            }
        }

        Ok(Self {
            title: request.title.clone(),
            organization_name: request.organization_name.clone(),
            period,
            metrics,
            unsupported,
            sub_accounts: request.sub_accounts.clone(),
        })
    }

    /// Requested performance counters in request order.
    pub fn counters(&self) -> impl Iterator<Item = CounterId> + '_ {
        self.metrics.iter().filter_map(|kind| match kind {
            MetricKind::PerformanceCounter(counter) => Some(*counter),
            _ => None,
        })
    }
}

/// What the provider returned for one requested metric of one sub-account.
#[derive(Debug, Clone)]
pub enum MetricOutcome {
    Submissions {
        kind: SubmissionKind,
        records: Result<Vec<SubmissionRecord>, ProviderError>,
    },
    Performance {
        counter: CounterId,
        /// `Err` when the location list itself could not be loaded.
        locations: Result<Vec<LocationFetch>, ProviderError>,
    },
}

/// Everything collected for one sub-account, metrics in plan order.
#[derive(Debug, Clone)]
pub struct CollectedSubAccount {
    pub sub_account: SubAccount,
    pub metrics: Vec<MetricOutcome>,
}

/// Fold collected results into the document tree.
///
/// Sub-accounts keep the order of `collected`. Provider failures become error
/// markers on the unit they belong to.
#[must_use]
pub fn assemble(
    plan: &AssemblyPlan,
    collected: Vec<CollectedSubAccount>,
    generated_at: DateTime<Utc>,
) -> ReportDocument {
    let sub_accounts = collected
        .into_iter()
        .map(|entry| SubAccountSection {
            metrics: assemble_sub_account(plan, entry.metrics),
            sub_account: entry.sub_account,
        })
        .collect();

    ReportDocument {
        title: plan.title.clone(),
        period_start: plan.period.start(),
        period_end: plan.period.end(),
        organization_name: plan.organization_name.clone(),
        generated_at,
        sub_accounts,
    }
}

fn assemble_sub_account(plan: &AssemblyPlan, outcomes: Vec<MetricOutcome>) -> SubAccountMetrics {
    let mut metrics = SubAccountMetrics {
        unsupported_metrics: plan.unsupported.clone(),
        ..SubAccountMetrics::default()
    };

    for outcome in outcomes {
        match outcome {
            MetricOutcome::Submissions { kind, records } => {
                let slot = table_slot(kind, records);
                match kind {
                    SubmissionKind::Reinstatement => metrics.reinstatement = Some(slot),
                    SubmissionKind::Verification => metrics.verification = Some(slot),
                    SubmissionKind::ReviewRemoval => metrics.review_removal = Some(slot),
                }
            }
            MetricOutcome::Performance { counter, locations } => {
                let result = match locations {
                    Ok(fetches) => performance::build(counter, fetches),
                    Err(e) => performance::failed(counter, &e),
                };
                metrics.performance_metrics.push(result);
            }
        }
    }

    metrics.locations = aggregate_locations(&metrics.performance_metrics);
    metrics
}

fn table_slot(
    kind: SubmissionKind,
    records: Result<Vec<SubmissionRecord>, ProviderError>,
) -> MetricSlot<TableResult> {
    match records {
        Ok(records) => MetricSlot::Ready(build_table(kind, records)),
        Err(e) => {
            let metric = MetricKind::from(kind);
            MetricSlot::Failed(MetricError {
                metric: metric.raw_id().to_string(),
                display_name: metric.display_name().to_string(),
                message: e.message().to_string(),
            })
        }
    }
}

/// Group every location row of every counter by exact business name.
///
/// Entries appear in first-seen order; locality and address come from the
/// first occurrence. A name listed twice under the same counter merges into
/// one metric entry.
#[must_use]
pub fn aggregate_locations(results: &[PerformanceMetricResult]) -> Vec<LocationAggregate> {
    let mut aggregates: Vec<LocationAggregate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for result in results {
        for location in &result.locations {
            let slot = *index
                .entry(location.business_name.as_str())
                .or_insert_with(|| {
                    aggregates.push(LocationAggregate {
                        business_name: location.business_name.clone(),
                        locality: location.locality.clone(),
                        address: location.address.clone(),
                        metrics: Vec::new(),
                        total: 0,
                    });
                    aggregates.len() - 1
                });
            let aggregate = &mut aggregates[slot];
            aggregate.total = aggregate.total.saturating_add(location.total());

            let series = location.time_series();
            if let Some(existing) = aggregate
                .metrics
                .iter_mut()
                .find(|entry| entry.counter == result.counter)
            {
                existing.total = existing.total.saturating_add(location.total());
                if existing.error.is_none() {
                    existing.error = location.error().map(str::to_string);
                }
                if series.is_some() || existing.time_series.is_some() {
                    existing.time_series = Some(timeseries::aggregate_across_locations([
                        existing.time_series.as_deref(),
                        series,
                    ]));
                }
                continue;
            }

            aggregate.metrics.push(LocationMetricEntry {
                counter: result.counter,
                display_name: result.display_name.clone(),
                total: location.total(),
                error: location.error().map(str::to_string),
                time_series: series.map(<[_]>::to_vec),
            });
        }
    }

    aggregates
}

/// Tri-state result handed to the job runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyOutcome {
    Complete(ReportDocument),
    Partial {
        document: ReportDocument,
        /// Unsupported markers plus metric-level and location-level errors.
        issues: usize,
    },
    Failed(AssemblyFatalError),
}

impl AssemblyOutcome {
    #[must_use]
    pub fn classify(document: ReportDocument) -> Self {
        match document.issue_count() {
            0 => AssemblyOutcome::Complete(document),
            issues => AssemblyOutcome::Partial { document, issues },
        }
    }

    #[must_use]
    pub fn document(&self) -> Option<&ReportDocument> {
        match self {
            AssemblyOutcome::Complete(document) | AssemblyOutcome::Partial { document, .. } => {
                Some(document)
            }
            AssemblyOutcome::Failed(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "assemble_test.rs"]
mod tests;

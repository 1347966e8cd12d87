//! Bounded, order-preserving collection of provider data.
//!
//! Work is split into independent units (one per submission table and one
//! per location/counter pair) and driven through `buffered`, so output order
//! follows request order no matter how calls interleave. Dropping the future
//! returned by [`Collector::run`] cancels every in-flight call and discards
//! all partial state.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use lpr_core::{
    CounterId, DatedValue, LocationRef, MetricKind, ReportPeriod, ReportRequest, SubAccount,
    SubAccountRequest, SubmissionKind, SubmissionRecord,
};

use crate::assemble::{
    assemble, AssemblyOutcome, AssemblyPlan, CollectedSubAccount, MetricOutcome,
};
use crate::provider::{MetricsProvider, ProviderError};

/// Limits applied while talking to a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    pub max_concurrent_units: usize,
    pub call_timeout: Duration,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            max_concurrent_units: 4,
            call_timeout: Duration::from_secs(30),
        }
    }
}

impl CollectOptions {
    #[must_use]
    pub fn from_app_config(config: &lpr_core::AppConfig) -> Self {
        Self {
            max_concurrent_units: config.provider_max_concurrent_units.max(1),
            call_timeout: Duration::from_secs(config.provider_call_timeout_secs),
        }
    }
}

enum Unit<'a> {
    Submissions {
        kind: SubmissionKind,
        sub_account_id: i64,
    },
    Series {
        location: &'a LocationRef,
        counter: CounterId,
    },
}

enum UnitOutput {
    Submissions(Result<Vec<SubmissionRecord>, ProviderError>),
    Series(Result<Vec<DatedValue>, ProviderError>),
}

pub struct Collector<'p, P: MetricsProvider + ?Sized> {
    provider: &'p P,
    options: CollectOptions,
}

impl<'p, P: MetricsProvider + ?Sized> Collector<'p, P> {
    #[must_use]
    pub fn new(provider: &'p P, options: CollectOptions) -> Self {
        Self { provider, options }
    }

    fn limit(&self) -> usize {
        self.options.max_concurrent_units.max(1)
    }

    /// Collect everything `request` needs and assemble it.
    ///
    /// Only an invalid request yields [`AssemblyOutcome::Failed`]; provider
    /// failures end up as markers inside the document.
    pub async fn run(&self, request: &ReportRequest, generated_at: DateTime<Utc>) -> AssemblyOutcome {
        let plan = match AssemblyPlan::from_request(request) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::error!(report_id = ?request.report_id, error = %e, "report request rejected");
                return AssemblyOutcome::Failed(e);
            }
        };

        tracing::info!(
            report_id = ?request.report_id,
            sub_accounts = plan.sub_accounts.len(),
            metrics = plan.metrics.len(),
            unsupported = plan.unsupported.len(),
            "collecting report data"
        );

        let collected = self.collect(&plan).await;
        let outcome = AssemblyOutcome::classify(assemble(&plan, collected, generated_at));
        if let AssemblyOutcome::Partial { issues, .. } = &outcome {
            tracing::warn!(report_id = ?request.report_id, issues, "report assembled with issues");
        }
        outcome
    }

    /// Fetch the data for every sub-account of `plan`, in plan order.
    pub async fn collect(&self, plan: &AssemblyPlan) -> Vec<CollectedSubAccount> {
        let names: Vec<String> = stream::iter(&plan.sub_accounts)
            .map(|sa| self.resolve_name(sa.id))
            .buffered(self.limit())
            .collect()
            .await;

        let needs_locations = plan.counters().next().is_some();
        let location_lists: Vec<Result<Vec<LocationRef>, ProviderError>> = if needs_locations {
            stream::iter(&plan.sub_accounts)
                .map(|sa| self.list_locations(sa))
                .buffered(self.limit())
                .collect()
                .await
        } else {
            plan.sub_accounts.iter().map(|_| Ok(Vec::new())).collect()
        };

        let mut units: Vec<Unit<'_>> = Vec::new();
        for (sa, locations) in plan.sub_accounts.iter().zip(&location_lists) {
            for kind in &plan.metrics {
                match kind {
                    MetricKind::PerformanceCounter(counter) => {
                        if let Ok(locations) = locations {
                            units.extend(locations.iter().map(|location| Unit::Series {
                                location,
                                counter: *counter,
                            }));
                        }
                    }
                    other => {
                        if let Some(kind) = other.as_submission() {
                            units.push(Unit::Submissions {
                                kind,
                                sub_account_id: sa.id,
                            });
                        }
                    }
                }
            }
        }

        let outputs: Vec<UnitOutput> = stream::iter(units)
            .map(|unit| self.run_unit(unit, &plan.period))
            .buffered(self.limit())
            .collect()
            .await;

        regroup(plan, names, location_lists, outputs)
    }

    async fn resolve_name(&self, sub_account_id: i64) -> String {
        match tokio::time::timeout(
            self.options.call_timeout,
            self.provider.resolve_sub_account_name(sub_account_id),
        )
        .await
        {
            Ok(name) => name,
            Err(_) => {
                tracing::warn!(sub_account = sub_account_id, "name lookup timed out, using placeholder");
                SubAccount::placeholder_name(sub_account_id)
            }
        }
    }

    async fn list_locations(
        &self,
        sa: &SubAccountRequest,
    ) -> Result<Vec<LocationRef>, ProviderError> {
        let result = self
            .with_timeout(self.provider.list_locations(sa.id, &sa.location_ids))
            .await;
        if let Err(e) = &result {
            tracing::warn!(sub_account = sa.id, error = %e, "failed to list locations");
        }
        result
    }

    async fn run_unit(&self, unit: Unit<'_>, period: &ReportPeriod) -> UnitOutput {
        match unit {
            Unit::Submissions {
                kind,
                sub_account_id,
            } => {
                tracing::debug!(sub_account = sub_account_id, metric = %kind, "fetching submissions");
                let result = self
                    .with_timeout(self.provider.fetch_submissions(kind, sub_account_id, period))
                    .await;
                if let Err(e) = &result {
                    tracing::warn!(sub_account = sub_account_id, metric = %kind, error = %e, "submission fetch failed");
                }
                UnitOutput::Submissions(result)
            }
            Unit::Series { location, counter } => {
                tracing::debug!(location = %location.business_name, metric = %counter, "fetching time series");
                let result = self
                    .with_timeout(
                        self.provider
                            .fetch_location_time_series(location, counter, period),
                    )
                    .await;
                if let Err(e) = &result {
                    tracing::warn!(
                        location = %location.business_name,
                        metric = %counter,
                        error = %e,
                        "time series fetch failed"
                    );
                }
                UnitOutput::Series(result)
            }
        }
    }

    async fn with_timeout<T, F>(&self, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.options.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                after_secs: self.options.call_timeout.as_secs(),
            }),
        }
    }
}

/// Put unit outputs back under their sub-account and metric, in plan order.
///
/// Walks the plan in the same order units were generated, so each output is
/// consumed exactly once.
fn regroup(
    plan: &AssemblyPlan,
    names: Vec<String>,
    location_lists: Vec<Result<Vec<LocationRef>, ProviderError>>,
    outputs: Vec<UnitOutput>,
) -> Vec<CollectedSubAccount> {
    let mut outputs = outputs.into_iter();
    let mut collected = Vec::with_capacity(plan.sub_accounts.len());

    for ((sa, display_name), locations) in plan.sub_accounts.iter().zip(names).zip(location_lists) {
        let mut metrics = Vec::with_capacity(plan.metrics.len());
        for kind in &plan.metrics {
            match kind {
                MetricKind::PerformanceCounter(counter) => {
                    let locations = match &locations {
                        Ok(list) => Ok(list
                            .iter()
                            .map(|location| {
                                let series = match outputs.next() {
                                    Some(UnitOutput::Series(result)) => result,
                                    _ => Err(missing_output()),
                                };
                                (location.clone(), series)
                            })
                            .collect()),
                        Err(e) => Err(e.clone()),
                    };
                    metrics.push(MetricOutcome::Performance {
                        counter: *counter,
                        locations,
                    });
                }
                other => {
                    if let Some(kind) = other.as_submission() {
                        let records = match outputs.next() {
                            Some(UnitOutput::Submissions(result)) => result,
                            _ => Err(missing_output()),
                        };
                        metrics.push(MetricOutcome::Submissions { kind, records });
                    }
                }
            }
        }

        collected.push(CollectedSubAccount {
            sub_account: SubAccount {
                id: sa.id,
                display_name,
            },
            metrics,
        });
    }

    collected
}

fn missing_output() -> ProviderError {
    ProviderError::Upstream("no result recorded for unit".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_from_config_clamp_concurrency() {
        let mut config = lpr_core::AppConfig {
            database_url: None,
            env: lpr_core::Environment::Test,
            log_level: "info".to_string(),
            db_max_connections: 1,
            db_min_connections: 1,
            db_acquire_timeout_secs: 1,
            google_base_url: "http://localhost/".to_string(),
            google_request_timeout_secs: 1,
            google_max_retries: 0,
            google_retry_backoff_base_ms: 1,
            provider_max_concurrent_units: 0,
            provider_call_timeout_secs: 7,
        };
        let options = CollectOptions::from_app_config(&config);
        assert_eq!(options.max_concurrent_units, 1);
        assert_eq!(options.call_timeout, Duration::from_secs(7));

        config.provider_max_concurrent_units = 6;
        assert_eq!(CollectOptions::from_app_config(&config).max_concurrent_units, 6);
    }
}

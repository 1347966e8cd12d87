//! Location performance builder.

use lpr_core::{
    CounterId, DatedValue, LocationOutcome, LocationPerformanceResult, LocationRef,
    PerformanceMetricResult,
};

use crate::provider::ProviderError;
use crate::timeseries;

/// A location paired with the outcome of fetching one counter for it.
pub type LocationFetch = (LocationRef, Result<Vec<DatedValue>, ProviderError>);

/// Fold per-location fetch outcomes for one counter into a metric result.
///
/// Location order is preserved. A failed location carries its error message
/// and contributes 0 to the grand total and nothing to the combined series.
#[must_use]
pub fn build(counter: CounterId, fetches: Vec<LocationFetch>) -> PerformanceMetricResult {
    let locations: Vec<LocationPerformanceResult> = fetches
        .into_iter()
        .map(|(location, outcome)| {
            let outcome = match outcome {
                Ok(series) => LocationOutcome::Fetched {
                    total: timeseries::total(Some(&series)),
                    time_series: series,
                },
                Err(e) => LocationOutcome::Failed {
                    error: e.message().to_string(),
                },
            };
            LocationPerformanceResult {
                business_name: location.business_name,
                locality: location.locality,
                address: location.address,
                outcome,
            }
        })
        .collect();

    let grand_total = locations
        .iter()
        .fold(0u64, |acc, loc| acc.saturating_add(loc.total()));

    let combined_series = if locations.iter().any(|loc| loc.time_series().is_some()) {
        Some(timeseries::aggregate_across_locations(
            locations.iter().map(LocationPerformanceResult::time_series),
        ))
    } else {
        None
    };

    PerformanceMetricResult {
        counter,
        display_name: counter.display_name().to_string(),
        locations,
        grand_total,
        combined_series,
        error: None,
    }
}

/// Result for a counter that could not be fetched at all for a sub-account.
#[must_use]
pub fn failed(counter: CounterId, error: &ProviderError) -> PerformanceMetricResult {
    PerformanceMetricResult {
        counter,
        display_name: counter.display_name().to_string(),
        locations: Vec::new(),
        grand_total: 0,
        combined_series: None,
        error: Some(error.message().to_string()),
    }
}

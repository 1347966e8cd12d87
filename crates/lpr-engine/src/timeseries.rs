//! Reductions over daily counter series.

use std::collections::BTreeMap;

use lpr_core::DatedValue;

/// Sum of every value in `series`. Absent and empty series are 0.
#[must_use]
pub fn total(series: Option<&[DatedValue]>) -> u64 {
    series
        .unwrap_or_default()
        .iter()
        .fold(0u64, |acc, point| acc.saturating_add(point.value))
}

/// Per-date sums across several locations, ascending by date.
///
/// `None` entries are locations whose fetch failed; they contribute nothing.
pub fn aggregate_across_locations<'a, I>(series_list: I) -> Vec<DatedValue>
where
    I: IntoIterator<Item = Option<&'a [DatedValue]>>,
{
    let mut buckets: BTreeMap<chrono::NaiveDate, u64> = BTreeMap::new();
    for point in series_list.into_iter().flatten().flatten() {
        let bucket = buckets.entry(point.date).or_insert(0);
        *bucket = bucket.saturating_add(point.value);
    }
    buckets
        .into_iter()
        .map(|(date, value)| DatedValue::new(date, value))
        .collect()
}

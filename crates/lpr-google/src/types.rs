//! Business Profile Performance API response types.
//!
//! Only the parts of `fetchMultiDailyMetricsTimeSeries` the report needs are
//! modelled. Every collection defaults to empty because the API omits keys
//! rather than sending empty arrays.

use serde::Deserialize;

/// Top-level body of `locations/{id}:fetchMultiDailyMetricsTimeSeries`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiDailyMetricsResponse {
    #[serde(default)]
    pub multi_daily_metric_time_series: Vec<MultiDailyMetricTimeSeries>,
}

/// One entry of `multiDailyMetricTimeSeries`.
///
/// The documented shape nests series under `dailyMetricTimeSeries`; some
/// proxies flatten a single series directly into `timeSeries`. Both are read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiDailyMetricTimeSeries {
    #[serde(default)]
    pub daily_metric_time_series: Vec<DailyMetricTimeSeries>,
    #[serde(default)]
    pub time_series: Option<TimeSeries>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetricTimeSeries {
    #[serde(default)]
    pub daily_metric: Option<String>,
    #[serde(default)]
    pub time_series: Option<TimeSeries>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    #[serde(default)]
    pub dated_values: Vec<ApiDatedValue>,
}

/// A day's value. `value` is a decimal string and is absent on zero days.
#[derive(Debug, Deserialize)]
pub struct ApiDatedValue {
    pub date: ApiDate,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ApiDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl MultiDailyMetricsResponse {
    /// The dated values reported for `daily_metric`, or an empty slice.
    ///
    /// A nested series must name the metric. An unnamed flat series is taken
    /// as the requested metric since only one is requested per call.
    #[must_use]
    pub fn dated_values(&self, daily_metric: &str) -> &[ApiDatedValue] {
        let nested = self
            .multi_daily_metric_time_series
            .iter()
            .flat_map(|entry| &entry.daily_metric_time_series)
            .find(|series| series.daily_metric.as_deref() == Some(daily_metric))
            .and_then(|series| series.time_series.as_ref());

        let flat = || {
            self.multi_daily_metric_time_series
                .iter()
                .find_map(|entry| entry.time_series.as_ref())
        };

        nested
            .or_else(flat)
            .map(|series| series.dated_values.as_slice())
            .unwrap_or_default()
    }
}

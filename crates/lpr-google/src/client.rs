//! HTTP client for the Business Profile Performance API.
//!
//! One call fetches one daily metric for one location over a report period.
//! Transient failures are retried per [`crate::retry`]; everything else is
//! mapped to a [`GoogleError`] variant the caller can classify.

use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use lpr_core::{CounterId, DatedValue, ReportPeriod};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode, Url};

use crate::error::GoogleError;
use crate::retry::retry_with_backoff;
use crate::types::MultiDailyMetricsResponse;

/// Client for the Performance API.
///
/// Built with [`PerformanceClient::with_base_url`]: the configured API root in
/// production, a mock server's address in tests.
pub struct PerformanceClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PerformanceClient {
    /// Creates a client with a custom base URL. Retries default to none.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GoogleError::InvalidBaseUrl`] if `base_url` does not
    /// parse or cannot carry a path.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, GoogleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("lpr/0.1 (listing-performance-report)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised)
            .map_err(|e| GoogleError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(GoogleError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            client,
            base_url: parsed,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches one counter's daily values for a location.
    ///
    /// Days the API reports without a value are returned as 0. An empty
    /// response yields an empty series.
    ///
    /// # Errors
    ///
    /// - [`GoogleError::Unauthorized`] when the token is rejected.
    /// - [`GoogleError::RateLimited`] or [`GoogleError::UnexpectedStatus`]
    ///   once retries are exhausted.
    /// - [`GoogleError::Http`] on network failure.
    /// - [`GoogleError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn fetch_daily_metric(
        &self,
        gmb_id: &str,
        counter: CounterId,
        period: &ReportPeriod,
        access_token: &str,
    ) -> Result<Vec<DatedValue>, GoogleError> {
        let url = self.build_url(gmb_id, counter, period)?;
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json(&url, access_token)
        })
        .await?;

        let parsed: MultiDailyMetricsResponse =
            serde_json::from_str(&body).map_err(|e| GoogleError::Deserialize {
                context: format!("fetchMultiDailyMetricsTimeSeries(location={gmb_id}, metric={counter})"),
                source: e,
            })?;

        let values = parsed
            .dated_values(counter.as_str())
            .iter()
            .filter_map(|raw| {
                let Some(date) =
                    NaiveDate::from_ymd_opt(raw.date.year, raw.date.month, raw.date.day)
                else {
                    tracing::warn!(
                        location = gmb_id,
                        metric = %counter,
                        year = raw.date.year,
                        month = raw.date.month,
                        day = raw.date.day,
                        "skipping dated value with invalid date"
                    );
                    return None;
                };
                Some(DatedValue::from_raw(date, raw.value.as_deref()))
            })
            .collect();

        Ok(values)
    }

    /// Builds the request URL with the metric and an inclusive daily range.
    fn build_url(
        &self,
        gmb_id: &str,
        counter: CounterId,
        period: &ReportPeriod,
    ) -> Result<Url, GoogleError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GoogleError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([
                "v1",
                "locations",
                format!("{gmb_id}:fetchMultiDailyMetricsTimeSeries").as_str(),
            ]);

        let start = period.start();
        let end = period.end();
        url.query_pairs_mut()
            .append_pair("dailyMetrics", counter.as_str())
            .append_pair("dailyRange.startDate.year", &start.year().to_string())
            .append_pair("dailyRange.startDate.month", &start.month().to_string())
            .append_pair("dailyRange.startDate.day", &start.day().to_string())
            .append_pair("dailyRange.endDate.year", &end.year().to_string())
            .append_pair("dailyRange.endDate.month", &end.month().to_string())
            .append_pair("dailyRange.endDate.day", &end.day().to_string());
        Ok(url)
    }

    /// Sends an authorized GET and returns the body of a 2xx response.
    async fn request_json(&self, url: &Url, access_token: &str) -> Result<String, GoogleError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.text().await?);
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GoogleError::Unauthorized {
                status: status.as_u16(),
            }),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok());
                Err(GoogleError::RateLimited { retry_after_secs })
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(GoogleError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

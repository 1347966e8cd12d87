//! Integration tests for `PerformanceClient` using wiremock HTTP mocks.

use chrono::NaiveDate;
use lpr_core::{CounterId, ReportPeriod};
use lpr_google::{GoogleError, PerformanceClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOCATION_PATH: &str = "/v1/locations/4242:fetchMultiDailyMetricsTimeSeries";

fn test_client(base_url: &str) -> PerformanceClient {
    PerformanceClient::with_base_url(30, base_url).expect("client construction should not fail")
}

fn period() -> ReportPeriod {
    ReportPeriod::new(
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
    )
    .unwrap()
}

fn series_body() -> serde_json::Value {
    serde_json::json!({
        "multiDailyMetricTimeSeries": [{
            "dailyMetricTimeSeries": [{
                "dailyMetric": "CALL_CLICKS",
                "timeSeries": { "datedValues": [
                    { "date": { "year": 2025, "month": 1, "day": 1 }, "value": "3" },
                    { "date": { "year": 2025, "month": 1, "day": 2 }, "value": "5" },
                    { "date": { "year": 2025, "month": 1, "day": 3 } }
                ] }
            }]
        }]
    })
}

#[tokio::test]
async fn fetch_daily_metric_returns_parsed_series() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOCATION_PATH))
        .and(query_param("dailyMetrics", "CALL_CLICKS"))
        .and(query_param("dailyRange.startDate.day", "1"))
        .and(query_param("dailyRange.endDate.day", "31"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(series_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let series = client
        .fetch_daily_metric("4242", CounterId::CallClicks, &period(), "test-token")
        .await
        .expect("should parse series");

    let values: Vec<u64> = series.iter().map(|v| v.value).collect();
    assert_eq!(values, [3, 5, 0]);
    assert_eq!(series[2].date, NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());
}

#[tokio::test]
async fn empty_response_is_empty_series() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOCATION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let series = client
        .fetch_daily_metric("4242", CounterId::WebsiteClicks, &period(), "t")
        .await
        .unwrap();
    assert!(series.is_empty());
}

#[tokio::test]
async fn rejected_token_is_unauthorized_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOCATION_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(3, 0);
    let err = client
        .fetch_daily_metric("4242", CounterId::CallClicks, &period(), "expired")
        .await
        .unwrap_err();
    assert!(matches!(err, GoogleError::Unauthorized { status: 401 }));
}

#[tokio::test]
async fn server_error_is_retried_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOCATION_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LOCATION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(series_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(2, 0);
    let series = client
        .fetch_daily_metric("4242", CounterId::CallClicks, &period(), "t")
        .await
        .expect("second attempt should succeed");
    assert_eq!(series.len(), 3);
}

#[tokio::test]
async fn rate_limit_surfaces_after_retries_are_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOCATION_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(1, 0);
    let err = client
        .fetch_daily_metric("4242", CounterId::CallClicks, &period(), "t")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GoogleError::RateLimited {
            retry_after_secs: Some(0)
        }
    ));
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOCATION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .fetch_daily_metric("4242", CounterId::CallClicks, &period(), "t")
        .await
        .unwrap_err();
    assert!(matches!(err, GoogleError::Deserialize { .. }));
}

#[tokio::test]
async fn not_found_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOCATION_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("location not found"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(2, 0);
    let err = client
        .fetch_daily_metric("4242", CounterId::CallClicks, &period(), "t")
        .await
        .unwrap_err();
    match err {
        GoogleError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "location not found");
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

use std::io::Write;
use std::path::Path;

use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["lpr", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["lpr"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_metrics_command() {
    let cli = Cli::try_parse_from(["lpr", "metrics"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Metrics)));
}

#[test]
fn parses_generate_with_request_only() {
    let cli = Cli::try_parse_from(["lpr", "generate", "--request", "req.json"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Generate {
            ref request,
            fixture: None,
            out: None,
        }) if request == Path::new("req.json")
    ));
}

#[test]
fn parses_generate_with_fixture_and_out() {
    let cli = Cli::try_parse_from([
        "lpr",
        "generate",
        "--request",
        "req.yaml",
        "--fixture",
        "data.json",
        "--out",
        "report.json",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Generate {
            fixture: Some(ref f),
            out: Some(ref o),
            ..
        }) if f == Path::new("data.json") && o == Path::new("report.json")
    ));
}

#[test]
fn generate_requires_request() {
    assert!(Cli::try_parse_from(["lpr", "generate"]).is_err());
}

fn test_config() -> lpr_core::AppConfig {
    lpr_core::AppConfig {
        database_url: None,
        env: lpr_core::Environment::Test,
        log_level: "info".to_string(),
        db_max_connections: 1,
        db_min_connections: 1,
        db_acquire_timeout_secs: 1,
        google_base_url: lpr_core::DEFAULT_GOOGLE_BASE_URL.to_string(),
        google_request_timeout_secs: 5,
        google_max_retries: 0,
        google_retry_backoff_base_ms: 0,
        provider_max_concurrent_units: 2,
        provider_call_timeout_secs: 5,
    }
}

fn temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn generate_from_fixture_writes_partial_document() {
    let request = temp_file(
        ".yaml",
        "\
title: Monthly Performance Report
organizationId: 3
organizationName: Acme Corporation
periodStart: 2025-01-01
periodEnd: 2025-01-31
requestedMetricKinds: [gmb_reinstatement, CALL_CLICKS, not_a_metric]
subAccounts:
  - id: 10
    locationIds: [1]
",
    );
    let fixture = temp_file(
        ".json",
        r#"{ "subAccounts": [{ "id": 10, "name": "Uptown",
            "submissions": { "reinstatement": [
                { "subjectName": "Main St Cafe", "updatedAt": "2025-01-09T12:00:00Z" } ] },
            "locations": [{ "id": 1, "businessName": "Main St Cafe", "gmbId": "1", "accountId": 1,
                "series": { "CALL_CLICKS": [{ "date": "2025-01-02", "value": 4 }] } }] }] }"#,
    );
    let out = tempfile::NamedTempFile::new().unwrap();

    generate::run_generate(
        &test_config(),
        request.path(),
        Some(fixture.path()),
        Some(out.path()),
    )
    .await
    .expect("partial documents are still written");

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.path()).unwrap()).unwrap();
    assert_eq!(written["organizationName"], "Acme Corporation");
    let section = &written["subAccounts"][0];
    assert_eq!(section["subAccount"]["displayName"], "Uptown");
    assert_eq!(section["metrics"]["reinstatement"]["data"]["totalCount"], 1);
    assert_eq!(section["metrics"]["performanceMetrics"][0]["grandTotal"], 4);
    assert_eq!(
        section["metrics"]["unsupportedMetrics"][0]["metric"],
        "not_a_metric"
    );
}

#[tokio::test]
async fn generate_fails_on_fatal_request_error() {
    let request = temp_file(
        ".json",
        r#"{ "title": "Empty", "organizationId": 3, "periodStart": "2025-01-01",
             "periodEnd": "2025-01-31", "requestedMetricKinds": ["CALL_CLICKS"],
             "subAccounts": [] }"#,
    );
    let fixture = temp_file(".json", "{}");

    let err = generate::run_generate(&test_config(), request.path(), Some(fixture.path()), None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no sub-accounts"));
}

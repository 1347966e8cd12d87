//! Report requests as submitted by the job runner.

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountRequest {
    pub id: i64,
    #[serde(default)]
    pub location_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default)]
    pub report_id: Option<i64>,
    pub title: String,
    pub organization_id: i64,
    #[serde(default)]
    pub organization_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Raw metric identifiers in the order sections should appear.
    pub requested_metric_kinds: Vec<String>,
    pub sub_accounts: Vec<SubAccountRequest>,
}

/// Load a report request from a JSON or YAML file.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML; anything else as JSON.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_request(path: &Path) -> Result<ReportRequest, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RequestFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| ConfigError::RequestFileParse {
        path: path.display().to_string(),
        reason,
    })
}

//! In-memory provider loaded from a JSON fixture.
//!
//! Used for offline runs and tests. It honours the same contract as the live
//! provider: submissions are limited to the report period and sorted newest
//! first, locations are sorted by business name, and series are clipped to
//! the period.
//!
//! ```json
//! {
//!   "subAccounts": [{
//!     "id": 41,
//!     "name": "Downtown",
//!     "submissions": { "reinstatement": [{ "subjectName": "Cafe", "updatedAt": "2025-01-03T10:00:00Z" }] },
//!     "submissionErrors": { "verification": "relation does not exist" },
//!     "locations": [{
//!       "id": 7, "businessName": "Cafe", "gmbId": "123", "accountId": 1,
//!       "series": { "CALL_CLICKS": [{ "date": "2025-01-01", "value": 3 }] }
//!     }]
//!   }]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use lpr_core::{
    CounterId, DatedValue, LocationRef, ReportPeriod, SubAccount, SubmissionKind, SubmissionRecord,
};
use serde::Deserialize;

use crate::provider::{MetricsProvider, ProviderError};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureFile {
    #[serde(default)]
    sub_accounts: Vec<FixtureSubAccount>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureSubAccount {
    id: i64,
    #[serde(default)]
    name: Option<String>,
    /// Keyed by submission kind (`reinstatement`, `verification`, `review_removal`).
    #[serde(default)]
    submissions: BTreeMap<String, Vec<SubmissionRecord>>,
    #[serde(default)]
    submission_errors: BTreeMap<String, String>,
    #[serde(default)]
    locations: Vec<FixtureLocation>,
    #[serde(default)]
    locations_error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureLocation {
    #[serde(flatten)]
    location: LocationRef,
    /// Keyed by raw counter identifier.
    #[serde(default)]
    series: BTreeMap<String, Vec<DatedValue>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    sub_accounts: Vec<FixtureSubAccount>,
}

impl FixtureProvider {
    /// # Errors
    ///
    /// Returns [`FixtureError::Parse`] if `json` is not a valid fixture.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let file: FixtureFile = serde_json::from_str(json)?;
        Ok(Self {
            sub_accounts: file.sub_accounts,
        })
    }

    /// # Errors
    ///
    /// Returns [`FixtureError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn sub_account(&self, id: i64) -> Option<&FixtureSubAccount> {
        self.sub_accounts.iter().find(|sa| sa.id == id)
    }

    fn location(&self, location: &LocationRef) -> Option<&FixtureLocation> {
        self.sub_accounts
            .iter()
            .flat_map(|sa| &sa.locations)
            .find(|fixture| fixture.location.id == location.id)
    }
}

#[async_trait]
impl MetricsProvider for FixtureProvider {
    async fn fetch_submissions(
        &self,
        kind: SubmissionKind,
        sub_account_id: i64,
        period: &ReportPeriod,
    ) -> Result<Vec<SubmissionRecord>, ProviderError> {
        let Some(sa) = self.sub_account(sub_account_id) else {
            return Ok(Vec::new());
        };
        let key = kind.to_string();
        if let Some(message) = sa.submission_errors.get(&key) {
            return Err(ProviderError::Storage(message.clone()));
        }

        let mut records: Vec<SubmissionRecord> = sa
            .submissions
            .get(&key)
            .into_iter()
            .flatten()
            .filter(|record| period.contains(record.updated_at))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    async fn list_locations(
        &self,
        sub_account_id: i64,
        location_ids: &[i64],
    ) -> Result<Vec<LocationRef>, ProviderError> {
        let Some(sa) = self.sub_account(sub_account_id) else {
            return Ok(Vec::new());
        };
        if let Some(message) = &sa.locations_error {
            return Err(ProviderError::Storage(message.clone()));
        }

        let mut locations: Vec<LocationRef> = sa
            .locations
            .iter()
            .filter(|fixture| location_ids.contains(&fixture.location.id))
            .map(|fixture| fixture.location.clone())
            .collect();
        locations.sort_by(|a, b| a.business_name.cmp(&b.business_name));
        Ok(locations)
    }

    async fn fetch_location_time_series(
        &self,
        location: &LocationRef,
        counter: CounterId,
        period: &ReportPeriod,
    ) -> Result<Vec<DatedValue>, ProviderError> {
        let Some(fixture) = self.location(location) else {
            return Ok(Vec::new());
        };
        if let Some(message) = &fixture.error {
            return Err(ProviderError::Upstream(message.clone()));
        }

        Ok(fixture
            .series
            .get(counter.as_str())
            .into_iter()
            .flatten()
            .filter(|point| point.date >= period.start() && point.date <= period.end())
            .copied()
            .collect())
    }

    async fn resolve_sub_account_name(&self, sub_account_id: i64) -> String {
        self.sub_account(sub_account_id)
            .and_then(|sa| sa.name.clone())
            .unwrap_or_else(|| SubAccount::placeholder_name(sub_account_id))
    }
}

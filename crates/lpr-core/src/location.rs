//! Google location metadata and daily counter values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A Google Business Profile location attached to a sub-account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRef {
    pub id: i64,
    pub business_name: String,
    #[serde(default)]
    pub locality: Option<String>,
    /// Address lines joined with `", "`; empty when the listing has none.
    #[serde(default)]
    pub address: String,
    /// Google location id used in Performance API paths.
    pub gmb_id: String,
    /// Google account that owns the location; selects the access token.
    pub account_id: i64,
}

/// A single day's counter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: u64,
}

impl DatedValue {
    #[must_use]
    pub fn new(date: NaiveDate, value: u64) -> Self {
        Self { date, value }
    }

    /// Build from a raw textual value. Missing or non-integer values count as 0.
    #[must_use]
    pub fn from_raw(date: NaiveDate, raw: Option<&str>) -> Self {
        let value = raw
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);
        Self { date, value }
    }
}

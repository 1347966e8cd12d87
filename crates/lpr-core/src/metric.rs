//! Metric vocabulary: raw identifiers, canonical kinds, and display names.
//!
//! Identifiers are matched exactly as provided. There is no case folding, so
//! `call_clicks` is unsupported while `CALL_CLICKS` is a performance counter.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::submission::SubmissionKind;

/// A named Google Business Profile daily performance counter.
///
/// The serialized form is the raw `dailyMetric` identifier the Performance
/// API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterId {
    #[serde(rename = "BUSINESS_IMPRESSIONS_DESKTOP_MAPS")]
    DesktopMapsImpressions,
    #[serde(rename = "BUSINESS_IMPRESSIONS_DESKTOP_SEARCH")]
    DesktopSearchImpressions,
    #[serde(rename = "BUSINESS_IMPRESSIONS_MOBILE_MAPS")]
    MobileMapsImpressions,
    #[serde(rename = "BUSINESS_IMPRESSIONS_MOBILE_SEARCH")]
    MobileSearchImpressions,
    #[serde(rename = "CALL_CLICKS")]
    CallClicks,
    #[serde(rename = "WEBSITE_CLICKS")]
    WebsiteClicks,
    #[serde(rename = "BUSINESS_DIRECTION_REQUESTS")]
    DirectionRequests,
    #[serde(rename = "BUSINESS_CONVERSATIONS")]
    Conversations,
    #[serde(rename = "BUSINESS_BOOKINGS")]
    Bookings,
    #[serde(rename = "BUSINESS_FOOD_ORDERS")]
    FoodOrders,
    #[serde(rename = "BUSINESS_FOOD_MENU_CLICKS")]
    MenuClicks,
}

impl CounterId {
    pub const ALL: [CounterId; 11] = [
        CounterId::DesktopMapsImpressions,
        CounterId::DesktopSearchImpressions,
        CounterId::MobileMapsImpressions,
        CounterId::MobileSearchImpressions,
        CounterId::CallClicks,
        CounterId::WebsiteClicks,
        CounterId::DirectionRequests,
        CounterId::Conversations,
        CounterId::Bookings,
        CounterId::FoodOrders,
        CounterId::MenuClicks,
    ];

    /// The raw identifier, also used as the API `dailyMetric` value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CounterId::DesktopMapsImpressions => "BUSINESS_IMPRESSIONS_DESKTOP_MAPS",
            CounterId::DesktopSearchImpressions => "BUSINESS_IMPRESSIONS_DESKTOP_SEARCH",
            CounterId::MobileMapsImpressions => "BUSINESS_IMPRESSIONS_MOBILE_MAPS",
            CounterId::MobileSearchImpressions => "BUSINESS_IMPRESSIONS_MOBILE_SEARCH",
            CounterId::CallClicks => "CALL_CLICKS",
            CounterId::WebsiteClicks => "WEBSITE_CLICKS",
            CounterId::DirectionRequests => "BUSINESS_DIRECTION_REQUESTS",
            CounterId::Conversations => "BUSINESS_CONVERSATIONS",
            CounterId::Bookings => "BUSINESS_BOOKINGS",
            CounterId::FoodOrders => "BUSINESS_FOOD_ORDERS",
            CounterId::MenuClicks => "BUSINESS_FOOD_MENU_CLICKS",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            CounterId::DesktopMapsImpressions => "Desktop Maps Impressions",
            CounterId::DesktopSearchImpressions => "Desktop Search Impressions",
            CounterId::MobileMapsImpressions => "Mobile Maps Impressions",
            CounterId::MobileSearchImpressions => "Mobile Search Impressions",
            CounterId::CallClicks => "Call Clicks",
            CounterId::WebsiteClicks => "Website Clicks",
            CounterId::DirectionRequests => "Direction Requests",
            CounterId::Conversations => "Conversations",
            CounterId::Bookings => "Bookings",
            CounterId::FoodOrders => "Food Orders",
            CounterId::MenuClicks => "Menu Clicks",
        }
    }

    fn from_raw(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }
}

impl fmt::Display for CounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical kind of a requested report metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    ReinstatementSubmission,
    VerificationSubmission,
    ReviewRemoval,
    PerformanceCounter(CounterId),
}

impl MetricKind {
    #[must_use]
    pub fn raw_id(self) -> &'static str {
        match self {
            MetricKind::ReinstatementSubmission => "gmb_reinstatement",
            MetricKind::VerificationSubmission => "gmb_verification",
            MetricKind::ReviewRemoval => "review_removal",
            MetricKind::PerformanceCounter(counter) => counter.as_str(),
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            MetricKind::ReinstatementSubmission => "GMB Reinstatement Submissions",
            MetricKind::VerificationSubmission => "GMB Verification Submissions",
            MetricKind::ReviewRemoval => "Review Removal Requests",
            MetricKind::PerformanceCounter(counter) => counter.display_name(),
        }
    }

    /// The submission table this kind fills, if it is not a counter.
    #[must_use]
    pub fn as_submission(self) -> Option<SubmissionKind> {
        match self {
            MetricKind::ReinstatementSubmission => Some(SubmissionKind::Reinstatement),
            MetricKind::VerificationSubmission => Some(SubmissionKind::Verification),
            MetricKind::ReviewRemoval => Some(SubmissionKind::ReviewRemoval),
            MetricKind::PerformanceCounter(_) => None,
        }
    }

    /// Every supported kind, submissions first, in catalogue order.
    pub fn all() -> impl Iterator<Item = MetricKind> {
        [
            MetricKind::ReinstatementSubmission,
            MetricKind::VerificationSubmission,
            MetricKind::ReviewRemoval,
        ]
        .into_iter()
        .chain(CounterId::ALL.into_iter().map(MetricKind::PerformanceCounter))
    }
}

impl From<SubmissionKind> for MetricKind {
    fn from(kind: SubmissionKind) -> Self {
        match kind {
            SubmissionKind::Reinstatement => MetricKind::ReinstatementSubmission,
            SubmissionKind::Verification => MetricKind::VerificationSubmission,
            SubmissionKind::ReviewRemoval => MetricKind::ReviewRemoval,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_id())
    }
}

impl Serialize for MetricKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.raw_id())
    }
}

/// A requested identifier outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("unsupported metric type: {metric}")]
pub struct UnsupportedMetric {
    pub metric: String,
}

/// Resolve a raw metric identifier into its canonical kind.
///
/// # Errors
///
/// Returns [`UnsupportedMetric`] carrying the raw identifier when it is not
/// one of the supported identifiers.
pub fn normalize(raw: &str) -> Result<MetricKind, UnsupportedMetric> {
    match raw {
        "gmb_reinstatement" => Ok(MetricKind::ReinstatementSubmission),
        "gmb_verification" => Ok(MetricKind::VerificationSubmission),
        "review_removal" => Ok(MetricKind::ReviewRemoval),
        other => CounterId::from_raw(other)
            .map(MetricKind::PerformanceCounter)
            .ok_or_else(|| UnsupportedMetric {
                metric: other.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_submission_kinds() {
        assert_eq!(
            normalize("gmb_reinstatement"),
            Ok(MetricKind::ReinstatementSubmission)
        );
        assert_eq!(
            normalize("gmb_verification"),
            Ok(MetricKind::VerificationSubmission)
        );
        assert_eq!(normalize("review_removal"), Ok(MetricKind::ReviewRemoval));
    }

    #[test]
    fn normalizes_every_counter_by_its_own_identifier() {
        for counter in CounterId::ALL {
            assert_eq!(
                normalize(counter.as_str()),
                Ok(MetricKind::PerformanceCounter(counter))
            );
        }
    }

    #[test]
    fn matching_is_case_sensitive() {
        let err = normalize("call_clicks").unwrap_err();
        assert_eq!(err.metric, "call_clicks");

        let err = normalize("GMB_REINSTATEMENT").unwrap_err();
        assert_eq!(err.metric, "GMB_REINSTATEMENT");
    }

    #[test]
    fn unknown_identifier_keeps_raw_text() {
        let err = normalize(" CALL_CLICKS").unwrap_err();
        assert_eq!(err.to_string(), "unsupported metric type:  CALL_CLICKS");
    }

    #[test]
    fn raw_id_round_trips_through_normalize() {
        for kind in MetricKind::all() {
            assert_eq!(normalize(kind.raw_id()), Ok(kind));
        }
    }

    #[test]
    fn every_kind_has_a_distinct_display_name() {
        let names: std::collections::HashSet<&str> =
            MetricKind::all().map(MetricKind::display_name).collect();
        assert_eq!(names.len(), MetricKind::all().count());
    }

    #[test]
    fn counter_display_names_match_catalogue() {
        assert_eq!(CounterId::CallClicks.display_name(), "Call Clicks");
        assert_eq!(
            CounterId::DirectionRequests.display_name(),
            "Direction Requests"
        );
        assert_eq!(CounterId::MenuClicks.display_name(), "Menu Clicks");
    }

    #[test]
    fn counter_serializes_as_raw_identifier() {
        let json = serde_json::to_string(&CounterId::FoodOrders).unwrap();
        assert_eq!(json, "\"BUSINESS_FOOD_ORDERS\"");
        let kind = serde_json::to_string(&MetricKind::ReviewRemoval).unwrap();
        assert_eq!(kind, "\"review_removal\"");
    }

    #[test]
    fn submission_kinds_map_back_to_metric_kinds() {
        for kind in MetricKind::all() {
            if let Some(sub) = kind.as_submission() {
                assert_eq!(MetricKind::from(sub), kind);
            }
        }
        assert!(MetricKind::PerformanceCounter(CounterId::Bookings)
            .as_submission()
            .is_none());
    }
}

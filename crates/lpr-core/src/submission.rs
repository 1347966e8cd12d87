//! Submission records for the reinstatement, verification and review-removal
//! tables.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Reinstatement,
    Verification,
    ReviewRemoval,
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionKind::Reinstatement => write!(f, "reinstatement"),
            SubmissionKind::Verification => write!(f, "verification"),
            SubmissionKind::ReviewRemoval => write!(f, "review_removal"),
        }
    }
}

/// One submission as delivered by the metrics provider.
///
/// `subject_name` is the Google listing name for reinstatements and the
/// business name for the other kinds. `review_link` is only populated for
/// review-removal requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub subject_name: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub invoice_status: Option<String>,
    #[serde(default)]
    pub review_link: Option<String>,
}

/// Coarse progress bucket derived from a free-text status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Completed,
    Working,
    Waiting,
    NotStarted,
    Unknown,
}

impl StatusCategory {
    /// Classify a human-readable status such as `"Work Completed"` or `"Paid"`.
    ///
    /// Matching is a case-insensitive substring test, checked in the order
    /// completed/paid, working, waiting.
    #[must_use]
    pub fn classify(status: Option<&str>) -> Self {
        let Some(status) = status.map(str::trim).filter(|s| !s.is_empty()) else {
            return StatusCategory::Unknown;
        };
        let lower = status.to_lowercase();
        if lower.contains("completed") || lower.contains("paid") {
            StatusCategory::Completed
        } else if lower.contains("working") {
            StatusCategory::Working
        } else if lower.contains("waiting") {
            StatusCategory::Waiting
        } else {
            StatusCategory::NotStarted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paid_and_completed_are_completed() {
        assert_eq!(
            StatusCategory::classify(Some("Work Completed")),
            StatusCategory::Completed
        );
        assert_eq!(
            StatusCategory::classify(Some("PAID")),
            StatusCategory::Completed
        );
    }

    #[test]
    fn working_and_waiting_are_distinct() {
        assert_eq!(
            StatusCategory::classify(Some("Working on it")),
            StatusCategory::Working
        );
        assert_eq!(
            StatusCategory::classify(Some("Waiting for Google")),
            StatusCategory::Waiting
        );
    }

    #[test]
    fn other_labels_are_not_started() {
        assert_eq!(
            StatusCategory::classify(Some("Submitted")),
            StatusCategory::NotStarted
        );
    }

    #[test]
    fn missing_or_blank_is_unknown() {
        assert_eq!(StatusCategory::classify(None), StatusCategory::Unknown);
        assert_eq!(StatusCategory::classify(Some("  ")), StatusCategory::Unknown);
    }
}

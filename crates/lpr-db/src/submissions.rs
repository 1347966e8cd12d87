//! Submission reads for the reinstatement, verification and review-removal
//! wizards.
//!
//! All three tables share `organization_id`, `status_id`, `invoice_status_id`
//! and `updated_at`; statuses resolve through `submission_statuses` and
//! `invoice_statuses`.

use chrono::{DateTime, Utc};
use lpr_core::{SubmissionKind, SubmissionRecord};
use sqlx::PgPool;

use crate::DbError;

/// One submission joined with its human-readable statuses.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubmissionRow {
    pub subject_name: String,
    pub updated_at: DateTime<Utc>,
    pub status: Option<String>,
    pub invoice_status: Option<String>,
    pub review_link: Option<String>,
}

impl From<SubmissionRow> for SubmissionRecord {
    fn from(row: SubmissionRow) -> Self {
        SubmissionRecord {
            subject_name: row.subject_name,
            updated_at: row.updated_at,
            status: row.status,
            invoice_status: row.invoice_status,
            review_link: row.review_link,
        }
    }
}

fn query_for(kind: SubmissionKind) -> &'static str {
    match kind {
        SubmissionKind::Reinstatement => {
            "SELECT s.google_listing_name AS subject_name, s.updated_at, \
                    ss.human_readable_status AS status, \
                    inv.human_readable_status AS invoice_status, \
                    NULL::text AS review_link \
             FROM reinstatement_wizard_submissions s \
             LEFT JOIN submission_statuses ss ON ss.id = s.status_id \
             LEFT JOIN invoice_statuses inv ON inv.id = s.invoice_status_id \
             WHERE s.organization_id = $1 \
               AND s.updated_at >= $2 \
               AND s.updated_at < $3 \
             ORDER BY s.updated_at DESC"
        }
        SubmissionKind::Verification => {
            "SELECT s.business_name AS subject_name, s.updated_at, \
                    ss.human_readable_status AS status, \
                    inv.human_readable_status AS invoice_status, \
                    NULL::text AS review_link \
             FROM new_gmb_location_wizard_submissions s \
             LEFT JOIN submission_statuses ss ON ss.id = s.status_id \
             LEFT JOIN invoice_statuses inv ON inv.id = s.invoice_status_id \
             WHERE s.organization_id = $1 \
               AND s.updated_at >= $2 \
               AND s.updated_at < $3 \
             ORDER BY s.updated_at DESC"
        }
        SubmissionKind::ReviewRemoval => {
            "SELECT s.business_name AS subject_name, s.updated_at, \
                    ss.human_readable_status AS status, \
                    inv.human_readable_status AS invoice_status, \
                    s.review_link \
             FROM review_removal_submissions s \
             LEFT JOIN submission_statuses ss ON ss.id = s.status_id \
             LEFT JOIN invoice_statuses inv ON inv.id = s.invoice_status_id \
             WHERE s.organization_id = $1 \
               AND s.updated_at >= $2 \
               AND s.updated_at < $3 \
             ORDER BY s.updated_at DESC"
        }
    }
}

/// Returns submissions of `kind` for a sub-account updated in
/// `[from, until)`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_submissions(
    pool: &PgPool,
    kind: SubmissionKind,
    organization_id: i64,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<SubmissionRow>, DbError> {
    let rows = sqlx::query_as::<_, SubmissionRow>(query_for(kind))
        .bind(organization_id)
        .bind(from)
        .bind(until)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_query_filters_by_half_open_range_and_sorts_newest_first() {
        for kind in [
            SubmissionKind::Reinstatement,
            SubmissionKind::Verification,
            SubmissionKind::ReviewRemoval,
        ] {
            let sql = query_for(kind);
            assert!(sql.contains("s.updated_at >= $2"), "{kind}");
            assert!(sql.contains("s.updated_at < $3"), "{kind}");
            assert!(sql.ends_with("ORDER BY s.updated_at DESC"), "{kind}");
        }
    }

    #[test]
    fn only_review_removal_selects_a_link() {
        assert!(query_for(SubmissionKind::ReviewRemoval).contains("s.review_link"));
        assert!(query_for(SubmissionKind::Reinstatement).contains("NULL::text AS review_link"));
    }
}

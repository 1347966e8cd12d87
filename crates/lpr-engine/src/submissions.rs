//! Submission table builder.

use lpr_core::{StatusCategory, SubmissionKind, SubmissionRecord, SubmissionRow, TableResult};

/// Review links are shown as a short preview in the table.
pub const REVIEW_TEXT_MAX_CHARS: usize = 30;

/// Convert provider records into table rows, keeping input order.
#[must_use]
pub fn build_table(kind: SubmissionKind, records: Vec<SubmissionRecord>) -> TableResult {
    let rows: Vec<SubmissionRow> = records
        .into_iter()
        .map(|record| to_row(kind, record))
        .collect();
    TableResult {
        total_count: rows.len(),
        empty: rows.is_empty(),
        rows,
    }
}

fn to_row(kind: SubmissionKind, record: SubmissionRecord) -> SubmissionRow {
    let review_text = match kind {
        SubmissionKind::ReviewRemoval => record
            .review_link
            .as_deref()
            .filter(|link| !link.is_empty())
            .map(truncate_chars),
        SubmissionKind::Reinstatement | SubmissionKind::Verification => None,
    };

    SubmissionRow {
        status_category: StatusCategory::classify(record.status.as_deref()),
        invoice_status_category: StatusCategory::classify(record.invoice_status.as_deref()),
        subject_name: record.subject_name,
        updated_at: record.updated_at,
        status: record.status,
        invoice_status: record.invoice_status,
        review_text,
    }
}

fn truncate_chars(text: &str) -> String {
    text.chars().take(REVIEW_TEXT_MAX_CHARS).collect()
}

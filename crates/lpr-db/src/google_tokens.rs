//! Stored Google OAuth access tokens.
//!
//! Tokens are refreshed by the main application; this crate only picks the
//! freshest one that has not expired.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoogleTokenRow {
    pub account_id: i64,
    pub organization_id: i64,
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Returns the latest unexpired token for a Google account within an
/// organization, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_access_token(
    pool: &PgPool,
    account_id: i64,
    organization_id: i64,
) -> Result<Option<GoogleTokenRow>, DbError> {
    let row = sqlx::query_as::<_, GoogleTokenRow>(
        "SELECT account_id, organization_id, access_token, expires_at \
         FROM google_tokens \
         WHERE account_id = $1 \
           AND organization_id = $2 \
           AND (expires_at IS NULL OR expires_at > NOW()) \
         ORDER BY expires_at DESC NULLS LAST \
         LIMIT 1",
    )
    .bind(account_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

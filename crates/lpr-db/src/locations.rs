//! Reads for the `gmb_locations` table.

use lpr_core::LocationRef;
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GmbLocationRow {
    pub id: i64,
    pub business_name: String,
    pub locality: Option<String>,
    pub address_lines: Option<Vec<String>>,
    pub gmb_id: String,
    pub account_id: i64,
}

impl From<GmbLocationRow> for LocationRef {
    fn from(row: GmbLocationRow) -> Self {
        LocationRef {
            id: row.id,
            business_name: row.business_name,
            locality: row.locality,
            address: row.address_lines.unwrap_or_default().join(", "),
            gmb_id: row.gmb_id,
            account_id: row.account_id,
        }
    }
}

/// Returns the locations with the given ids, ordered by business name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_locations_by_ids(
    pool: &PgPool,
    ids: &[i64],
) -> Result<Vec<GmbLocationRow>, DbError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, GmbLocationRow>(
        "SELECT id, business_name, locality, address_lines, gmb_id, account_id \
         FROM gmb_locations \
         WHERE id = ANY($1) \
         ORDER BY business_name",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

use sqlx::PgPool;

use crate::DbError;

/// Returns the organization's name, or `None` if no row matches.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_organization_name(pool: &PgPool, id: i64) -> Result<Option<String>, DbError> {
    let name = sqlx::query_scalar::<_, String>("SELECT name FROM organizations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(name)
}

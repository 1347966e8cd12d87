//! Live metrics provider: Postgres for submissions, locations, names and
//! tokens; the Performance API for daily counters.

use async_trait::async_trait;
use lpr_core::{
    AppConfig, CounterId, DatedValue, LocationRef, ReportPeriod, SubAccount, SubmissionKind,
    SubmissionRecord,
};
use lpr_db::DbError;
use lpr_engine::{MetricsProvider, ProviderError};
use lpr_google::{GoogleError, PerformanceClient};
use sqlx::PgPool;

pub(crate) struct LiveProvider {
    pool: PgPool,
    google: PerformanceClient,
    /// Organization that owns the report; scopes the token lookup.
    organization_id: i64,
}

impl LiveProvider {
    /// Connect to the database and build the Performance client.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing, the pool cannot connect,
    /// or the Google base URL is invalid.
    pub(crate) async fn connect(config: &AppConfig, organization_id: i64) -> anyhow::Result<Self> {
        let pool = lpr_db::connect_pool_from_config(config).await?;
        let google = PerformanceClient::with_base_url(
            config.google_request_timeout_secs,
            &config.google_base_url,
        )
        .map_err(|e| anyhow::anyhow!("failed to build Performance API client: {e}"))?
        .with_retry(config.google_max_retries, config.google_retry_backoff_base_ms);

        Ok(Self {
            pool,
            google,
            organization_id,
        })
    }
}

#[async_trait]
impl MetricsProvider for LiveProvider {
    async fn fetch_submissions(
        &self,
        kind: SubmissionKind,
        sub_account_id: i64,
        period: &ReportPeriod,
    ) -> Result<Vec<SubmissionRecord>, ProviderError> {
        let rows = lpr_db::list_submissions(
            &self.pool,
            kind,
            sub_account_id,
            period.start_utc(),
            period.end_exclusive_utc(),
        )
        .await
        .map_err(from_db_error)?;
        Ok(rows.into_iter().map(SubmissionRecord::from).collect())
    }

    async fn list_locations(
        &self,
        _sub_account_id: i64,
        location_ids: &[i64],
    ) -> Result<Vec<LocationRef>, ProviderError> {
        let rows = lpr_db::list_locations_by_ids(&self.pool, location_ids)
            .await
            .map_err(from_db_error)?;
        Ok(rows.into_iter().map(LocationRef::from).collect())
    }

    async fn fetch_location_time_series(
        &self,
        location: &LocationRef,
        counter: CounterId,
        period: &ReportPeriod,
    ) -> Result<Vec<DatedValue>, ProviderError> {
        let token = lpr_db::find_access_token(&self.pool, location.account_id, self.organization_id)
            .await
            .map_err(from_db_error)?
            .ok_or_else(|| {
                ProviderError::MissingCredential(format!(
                    "Google account {} in organization {}",
                    location.account_id, self.organization_id
                ))
            })?;

        self.google
            .fetch_daily_metric(&location.gmb_id, counter, period, &token.access_token)
            .await
            .map_err(from_google_error)
    }

    async fn resolve_sub_account_name(&self, sub_account_id: i64) -> String {
        match lpr_db::get_organization_name(&self.pool, sub_account_id).await {
            Ok(Some(name)) => name,
            Ok(None) => SubAccount::placeholder_name(sub_account_id),
            Err(e) => {
                tracing::warn!(sub_account = sub_account_id, error = %e, "name lookup failed");
                SubAccount::placeholder_name(sub_account_id)
            }
        }
    }
}

pub(crate) fn from_db_error(err: DbError) -> ProviderError {
    match err {
        DbError::MissingDatabaseUrl => ProviderError::Connectivity(err.to_string()),
        DbError::Sqlx(
            ref e @ (sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed),
        ) => ProviderError::Connectivity(e.to_string()),
        DbError::Sqlx(e) => ProviderError::Storage(e.to_string()),
    }
}

pub(crate) fn from_google_error(err: GoogleError) -> ProviderError {
    match err {
        GoogleError::Unauthorized { .. } => ProviderError::Unauthorized(err.to_string()),
        GoogleError::Http(ref e) if e.is_connect() || e.is_timeout() => {
            ProviderError::Connectivity(err.to_string())
        }
        GoogleError::Http(_)
        | GoogleError::RateLimited { .. }
        | GoogleError::UnexpectedStatus { .. }
        | GoogleError::Deserialize { .. }
        | GoogleError::InvalidBaseUrl(_) => ProviderError::Upstream(err.to_string()),
    }
}

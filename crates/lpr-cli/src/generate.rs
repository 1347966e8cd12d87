//! `generate` command: collect, assemble and write one report document.

use std::path::Path;

use chrono::Utc;
use lpr_core::{AppConfig, ReportDocument};
use lpr_engine::{AssemblyOutcome, CollectOptions, Collector, FixtureProvider};

use crate::provider::LiveProvider;

/// Build the report described by `request_path` and write it as pretty JSON.
///
/// Uses the fixture at `fixture_path` when given, otherwise the database and
/// the Performance API. A partial document is still written; only a fatal
/// request error fails the command.
///
/// # Errors
///
/// Returns an error if the request or fixture cannot be loaded, the live
/// provider cannot connect, the request is rejected, or the output cannot be
/// written.
pub(crate) async fn run_generate(
    config: &AppConfig,
    request_path: &Path,
    fixture_path: Option<&Path>,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let request = lpr_core::load_request(request_path)?;
    let options = CollectOptions::from_app_config(config);
    let generated_at = Utc::now();

    let outcome = match fixture_path {
        Some(path) => {
            let provider = FixtureProvider::from_path(path)?;
            Collector::new(&provider, options)
                .run(&request, generated_at)
                .await
        }
        None => {
            let provider = LiveProvider::connect(config, request.organization_id).await?;
            Collector::new(&provider, options)
                .run(&request, generated_at)
                .await
        }
    };

    let document = match outcome {
        AssemblyOutcome::Complete(document) => {
            tracing::info!(
                report_id = ?request.report_id,
                sub_accounts = document.sub_accounts.len(),
                "report complete"
            );
            document
        }
        AssemblyOutcome::Partial { document, issues } => {
            log_issue_summary(&document, issues);
            document
        }
        AssemblyOutcome::Failed(e) => {
            tracing::error!(report_id = ?request.report_id, error = %e, "report generation failed");
            anyhow::bail!("report generation failed: {e}");
        }
    };

    write_document(&document, out)
}

fn log_issue_summary(document: &ReportDocument, issues: usize) {
    tracing::warn!(issues, "report generated with errors");
    for section in &document.sub_accounts {
        let count = section.metrics.issue_count();
        if count > 0 {
            tracing::warn!(
                sub_account = section.sub_account.id,
                name = %section.sub_account.display_name,
                issues = count,
                "sub-account has incomplete metrics"
            );
        }
    }
}

fn write_document(document: &ReportDocument, out: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    match out {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

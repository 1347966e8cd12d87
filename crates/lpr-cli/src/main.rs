mod generate;
mod provider;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lpr")]
#[command(about = "Listing performance report generator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect metrics for a report request and emit the report document as JSON
    Generate {
        /// Report request file (JSON, or YAML with a .yaml/.yml extension)
        #[arg(long)]
        request: PathBuf,
        /// Read metrics from a JSON fixture instead of the database and Google
        #[arg(long)]
        fixture: Option<PathBuf>,
        /// Write the document here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List every supported metric identifier and its display name
    Metrics,
    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Verify the database is reachable
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = lpr_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Generate {
            request,
            fixture,
            out,
        }) => {
            generate::run_generate(&config, &request, fixture.as_deref(), out.as_deref()).await?;
        }
        Some(Commands::Metrics) => {
            for kind in lpr_core::MetricKind::all() {
                println!("{}\t{}", kind.raw_id(), kind.display_name());
            }
        }
        Some(Commands::Db {
            command: DbCommands::Ping,
        }) => {
            let pool = lpr_db::connect_pool_from_config(&config).await?;
            lpr_db::ping(&pool).await?;
            println!("database connection ok");
        }
        None => println!("lpr: no command given, see --help"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;

//! clinreport - a clinical data reporting CLI for PostgreSQL.

use clinreport::catalog::REPORTS;
use clinreport::cli::Cli;
use clinreport::config::{Config, ConnectionConfig};
use clinreport::db;
use clinreport::error::{ReportError, Result};
use clinreport::report::{ReportOptions, ReportRunner};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr so report tables on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Pick up PG* variables and friends from a local .env file.
    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    if cli.list_reports {
        for report in REPORTS {
            println!("{:32} {}", report.name, report.title);
        }
        return Ok(());
    }

    let config_path = cli.config_path();
    let config = Config::load_from_file(&config_path)?;

    // Connection precedence: CLI arguments, then the named connection,
    // then the default connection, then PG* environment variables.
    let connection = resolve_connection(&cli, &config)?.ok_or_else(|| {
        ReportError::config(
            "No database connection configured. \
             Pass a postgres:// URL or add [connections.default] to the config file.",
        )
    })?;

    info!("Connection: {}", connection.display_string());
    let client = db::connect(&connection).await?;

    let options = ReportOptions {
        patient: cli.patient.clone().or_else(|| config.report.patient.clone()),
    };

    let outcome = {
        let stdout = std::io::stdout();
        let mut runner = ReportRunner::new(client.as_ref(), stdout.lock(), options);
        match cli.report.as_deref() {
            Some(name) => runner.run_one(name).await,
            None => runner.run_all().await,
        }
    };

    // Release the connection on every exit path, error included.
    if let Err(e) = client.close().await {
        warn!("Failed to close database connection: {e}");
    }

    outcome
}

/// Resolves the final connection configuration from CLI args, config file,
/// and environment.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<Option<ConnectionConfig>> {
    let mut connection = cli.to_connection_config()?;

    // If no CLI connection, try the named connection from config.
    if connection.is_none() {
        if let Some(name) = cli.connection_name() {
            connection = config.get_connection(Some(name)).cloned();
            if connection.is_none() {
                return Err(ReportError::config(format!(
                    "Connection '{}' not found in config file",
                    name
                )));
            }
        }
    }

    // If still no connection, try the default from config.
    if connection.is_none() {
        connection = config.get_connection(None).cloned();
    }

    // Apply environment variable defaults.
    if let Some(ref mut conn) = connection {
        conn.apply_env_defaults();
    }

    Ok(connection)
}

use clap::Parser;
use configuration::ServerSettings;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Looks up course descriptions for a conversational assistant.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    server: ServerSettings,
}

/// Installs the global subscriber. The returned guard flushes the log file on
/// drop, so it has to live as long as `main`.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "course-lookup.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// The main entry point for the course lookup service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the variables may come from the real environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.server.log_dir.as_deref());

    // Refuse to come up half-configured.
    let db_settings = configuration::load_db_settings().inspect_err(|e| {
        tracing::error!(error = %e, "Database configuration is incomplete.");
    })?;

    web_server::run_server(cli.server, db_settings).await
}

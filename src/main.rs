//! pkghist binary entrypoint kept minimal. The full runtime lives in `app`.

use std::fmt;
use std::sync::OnceLock;

use clap::Parser;

use pkghist::args::Args;
use pkghist::catalog::VersionCatalog;
use pkghist::{app, net};

/// Timestamp formatter for log lines, `YYYY-MM-DDTHH:MM:SS` in UTC.
struct HistTimer;

impl tracing_subscriber::fmt::time::FormatTime for HistTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string();
        w.write_str(&ts)
    }
}

/// Keeps the non-blocking log writer alive for the process lifetime.
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Initialize tracing, writing to the state-directory log file with a
/// stderr fallback when the file cannot be opened.
fn init_logging(default_level: &str) {
    let log_path = pkghist::theme::logs_dir().join("pkghist.log");
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level))
    };
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(HistTimer)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::info!(path = %log_path.display(), "logging initialized");
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_timer(HistTimer)
                .init();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

/// Report a bootstrap failure and exit non-zero before any interactive
/// state exists.
fn bootstrap_fail(message: &str) -> ! {
    tracing::error!("{message}");
    eprintln!("pkghist: {message}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);
    tracing::info!(package = %args.package, registry = %args.registry, "pkghist starting");

    if let Err(e) = net::ensure_npm() {
        bootstrap_fail(&e.to_string());
    }

    let doc = match net::fetch_packument(&args.registry, &args.package).await {
        Ok(doc) => doc,
        Err(e) => bootstrap_fail(&format!(
            "failed to fetch metadata for {}: {e}",
            args.package
        )),
    };
    if doc.oclif.is_none() {
        bootstrap_fail(&format!("No oclif config found for {}", doc.name));
    }
    let catalog = VersionCatalog::from_packument(&doc);
    if catalog.is_empty() {
        bootstrap_fail(&format!("no published versions found for {}", doc.name));
    }
    tracing::info!(versions = catalog.len(), "catalog loaded");

    let scope = args.effective_scope();
    if let Err(err) = app::run(doc.name, scope, args.registry, catalog).await {
        tracing::error!(error = ?err, "Application error");
    }
    tracing::info!("pkghist exited");
}

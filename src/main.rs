//! earthview binary entrypoint kept minimal. The pipeline lives in the library.

use std::fmt;
use std::process::ExitCode;
use std::sync::OnceLock;

use clap::Parser as _;

use earthview::args::{Args, determine_log_level};
use earthview::config::Settings;
use earthview::fetch::HttpSource;
use earthview::wallpaper::WallpaperApplier;
use earthview::{Pipeline, paths};

struct EarthviewTimer;

impl tracing_subscriber::fmt::time::FormatTime for EarthviewTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        use fmt::Write as _;
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"))
    }
}

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// What: Initialise tracing to `~/.config/earthview/logs/earthview.log`.
///
/// Inputs:
/// - `level`: Default filter when `RUST_LOG` is unset
///
/// Output:
/// - Global subscriber installed; falls back to stderr when the log file cannot be opened.
fn init_logging(level: &str) {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
    };
    let log_path = paths::logs_dir().join("earthview.log");
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
                .with_timer(EarthviewTimer)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::info!(path = %log_path.display(), "logging initialized");
        }
        Err(e) => {
            // Fallback: stderr logger so the run still reports progress
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(true)
                .with_writer(std::io::stderr)
                .with_timer(EarthviewTimer)
                .init();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&determine_log_level(&args));

    let settings_path = args.config.clone().unwrap_or_else(paths::settings_path);
    let settings = Settings::load(&settings_path);
    tracing::info!(
        cache_dir = %settings.cache_dir.display(),
        lower = settings.id_range.lower,
        upper = settings.id_range.upper,
        "earthview starting"
    );

    let source = match HttpSource::new() {
        Ok(source) => source,
        Err(e) => {
            tracing::error!(error = %e, "failed to build HTTP client");
            eprintln!("earthview: failed to build HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let applier = if args.no_wallpaper || !settings.apply_wallpaper {
        None
    } else {
        let applier = WallpaperApplier::detect();
        if applier.is_none() {
            tracing::warn!("no wallpaper backend for this desktop; image will only be cached");
        }
        applier
    };

    let pipeline = Pipeline::new(settings, source, applier);
    match pipeline.run().await {
        Ok(report) => {
            tracing::info!(id = report.id, path = %report.path.display(), "earthview finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "earthview failed");
            eprintln!("earthview: {err}");
            ExitCode::FAILURE
        }
    }
}

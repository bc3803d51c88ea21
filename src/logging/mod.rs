/*!
 * Logging Module
 * Subscriber setup and request logging middleware
 */
pub mod middleware;

use std::io;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::SiteConfig;

/// Build the default filter directive for this crate and the HTTP stack.
fn default_directive(level: &str) -> String {
    format!("personal_site={},tower_http=debug,axum=debug", level)
}

/// Initialize the logging system.
///
/// The returned guards flush the background writers when dropped, so the
/// caller has to keep them alive for as long as it wants logs written.
pub fn init(config: &SiteConfig) -> Vec<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(&config.log_dir) {
        eprintln!(
            "could not create log directory {}: {}",
            config.log_dir.display(),
            e
        );
    }

    let (file_writer, file_guard) = non_blocking(rolling::daily(&config.log_dir, "app.log"));
    let (console_writer, console_guard) = non_blocking(io::stdout());
    let mut guards = vec![file_guard, console_guard];

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config.effective_log_level())));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.is_production() {
        let (error_writer, error_guard) =
            non_blocking(rolling::daily(&config.log_dir, "error.log"));
        guards.push(error_guard);

        let file_layer = fmt::layer()
            .json()
            .with_writer(file_writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        let error_layer = fmt::layer()
            .json()
            .with_writer(error_writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(tracing_subscriber::filter::LevelFilter::ERROR);

        let console_layer = fmt::layer()
            .json()
            .with_writer(console_writer)
            .with_target(false);

        subscriber
            .with(file_layer)
            .with(error_layer)
            .with(console_layer)
            .init();
    } else {
        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false);

        let console_layer = fmt::layer()
            .with_writer(console_writer)
            .with_target(true)
            .pretty();

        subscriber.with(file_layer).with(console_layer).init();
    }

    tracing::info!(
        environment = %config.environment,
        log_dir = %config.log_dir.display(),
        "logging initialized"
    );

    guards
}

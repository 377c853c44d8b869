use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable overriding the log level.
pub const LOG_LEVEL_ENV: &str = "ATLAS_CLI_LOG";
/// When set, logs from every crate are shown instead of only ours.
pub const LOG_ALL_ENV: &str = "ATLAS_CLI_LOG_ALL";

/// Setup logging.
///
/// Logs go to stderr so that stdout only contains command output.
/// The level is `info`, or `debug` when `debug` is set, and can be overridden with `ATLAS_CLI_LOG`.
/// Only logs from this crate are shown unless `ATLAS_CLI_LOG_ALL` is set.
pub fn setup_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let log_level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_level.to_string());
    let show_all_logs = std::env::var(LOG_ALL_ENV).is_ok();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::new(filter_directive(&log_level, show_all_logs)))
        .init();
}

/// Either `level` or `atlas=level`.
fn filter_directive(log_level: &str, show_all_logs: bool) -> String {
    if show_all_logs {
        log_level.to_string()
    } else {
        format!("atlas={log_level}")
    }
}

//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the bakeshop backend.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{BakeshopError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer when dropped, so `main` must
/// keep it alive for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "bakeshop.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking),
        )
        .try_init()
        .map_err(|e| BakeshopError::Config(format!("Failed to install logger: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log order status changes
pub fn log_order_transition(kind: &str, order_id: i64, from: &str, to: &str, actor_id: Option<i64>) {
    info!(
        kind = kind,
        order_id = order_id,
        from = from,
        to = to,
        actor_id = actor_id,
        "Order status changed"
    );
}

/// Log sign-in, sign-up and sign-out events
pub fn log_auth_event(user_id: Option<i64>, event: &str, success: bool) {
    if success {
        info!(user_id = user_id, event = event, "Auth event");
    } else {
        warn!(user_id = user_id, event = event, "Auth event failed");
    }
}

/// Log calls to the image storage service
pub fn log_storage_operation(operation: &str, target: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            target = target,
            duration_ms = duration_ms,
            "Storage operation completed"
        );
    } else {
        error!(
            operation = operation,
            target = target,
            duration_ms = duration_ms,
            "Storage operation failed"
        );
    }
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize logging with tracing
///
/// - Reads filter from RUST_LOG environment variable if available
/// - Falls back to `default_filter` (normally `logging.filter` from the config file)
/// - Uses a formatted output layer
///
/// Returns `false` if a global subscriber was already installed.
///
/// # Example
///
/// ```no_run
/// use keyfree_lib::utils::logging::init_logging;
///
/// init_logging("keyfree=debug,warn");
/// ```
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let installed = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("KeyFree logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_initialization_is_idempotent() {
        // 同一进程内只有第一次安装成功，后续调用不应 panic
        init_logging("keyfree=debug,warn");
        assert!(!init_logging("not a [valid filter"));
    }
}

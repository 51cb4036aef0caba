/// Conditional logging module for development builds
///
/// The `log!` macro provides informational logging that is compiled out
/// in production (release) builds by default. Data-quality warnings and
/// errors should continue using `tracing::warn!` and `tracing::error!` directly.
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
///
/// # Examples
///
/// ```rust
/// use network_explorer::logging::log;
///
/// let path = "DEL-BOM";
/// log!("Selected path: {}", path);
/// log!("Render pass took {:.2}ms", 1.25);
/// ```
/// Conditionally log a debug event in development builds
///
/// This macro expands to `tracing::debug!` in debug builds or when
/// the `console_logging` feature is enabled. In production release builds,
/// it compiles to nothing (zero overhead).
#[macro_export]
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            tracing::debug!("{}", format!($($arg),+));
        }
    };
}

pub use log;

/// Install a `tracing` subscriber for binaries.
///
/// The filter is read from `RUST_LOG` and falls back to `default_filter`
/// when the variable is unset or invalid. Calling this more than once is
/// harmless; later calls leave the first subscriber in place.
pub fn init(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

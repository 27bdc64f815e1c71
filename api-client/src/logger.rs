//! Logging facade used by [`ApiClient`](crate::ApiClient).
//!
//! Messages are passed as [`fmt::Arguments`], so nothing is rendered unless a
//! sink actually consumes the event. [`NoopLogger`] drops everything;
//! [`TracingLogger`] forwards to `tracing` under a fixed label.

use std::fmt;
use std::sync::Arc;

use strum::{Display, EnumIter};

/// Severity of a log message.
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
}

/// A sink for client log messages.
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>);
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        (**self).log(level, message);
    }
}

/// Discards every message without formatting it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: LogLevel, _message: fmt::Arguments<'_>) {}
}

/// Forwards messages to `tracing`, tagged with `logger = <label>`.
///
/// `tracing` has no notice or critical level: notice is emitted at INFO and
/// critical at ERROR, both with a `severity` field carrying the original level.
///
/// ## Examples
///
/// ```rust
/// use api_client::{ApiClient, TracingLogger};
///
/// let client = ApiClient::builder()
///     .logger(TracingLogger::new("billing-api"))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TracingLogger {
    label: String,
}

impl TracingLogger {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        let logger = self.label.as_str();
        match level {
            LogLevel::Trace => tracing::trace!(logger, "{message}"),
            LogLevel::Debug => tracing::debug!(logger, "{message}"),
            LogLevel::Info => tracing::info!(logger, "{message}"),
            LogLevel::Notice => tracing::info!(logger, severity = "notice", "{message}"),
            LogLevel::Warning => tracing::warn!(logger, "{message}"),
            LogLevel::Error => tracing::error!(logger, "{message}"),
            LogLevel::Critical => tracing::error!(logger, severity = "critical", "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use strum::IntoEnumIterator;
    use tracing_test::traced_test;

    struct Counted<'a>(&'a AtomicUsize);

    impl fmt::Display for Counted<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fetch_add(1, Ordering::SeqCst);
            f.write_str("rendered")
        }
    }

    #[test]
    fn noop_logger_never_renders_the_message() {
        let renders = AtomicUsize::new(0);
        for level in LogLevel::iter() {
            NoopLogger.log(level, format_args!("{}", Counted(&renders)));
        }
        assert_eq!(renders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Notice < LogLevel::Warning);
        assert!(LogLevel::Error < LogLevel::Critical);
        assert_eq!(LogLevel::Warning.to_string(), "warning");
    }

    #[test]
    #[traced_test]
    fn tracing_logger_tags_events_with_label() {
        let logger = TracingLogger::new("orders-api");
        logger.log(LogLevel::Info, format_args!("fetched {} orders", 3));

        assert!(logs_contain("orders-api"));
        assert!(logs_contain("fetched 3 orders"));
    }

    #[test]
    #[traced_test]
    fn tracing_logger_keeps_levels_without_native_equivalent() {
        let logger = TracingLogger::new("orders-api");
        logger.log(LogLevel::Notice, format_args!("cache warmed"));
        logger.log(LogLevel::Critical, format_args!("disk full"));

        assert!(logs_contain("severity=\"notice\""));
        assert!(logs_contain("severity=\"critical\""));
        assert!(logs_contain("disk full"));
    }

    #[test]
    fn shared_logger_forwards_through_arc() {
        let logger: Arc<dyn Logger> = Arc::new(NoopLogger);
        logger.log(LogLevel::Debug, format_args!("ignored"));
    }
}

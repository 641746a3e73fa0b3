//! Stdout log lines in the form `<timestamp> - <LEVEL> - <message>`.
//!
//! Only the event message is rendered; structured fields stay available to
//! other subscribers but never reach the line.
use chrono::Local;
use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Events logged with this target render as `CRITICAL`.
pub const CRITICAL_TARGET: &str = "critical";

pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let mut message = String::new();
        event.record(&mut MessageOnly { out: &mut message });
        writeln!(
            writer,
            "{} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            level_label(meta.level(), meta.target()),
            message
        )
    }
}

struct MessageOnly<'a> {
    out: &'a mut String,
}

impl Visit for MessageOnly<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.out.push_str(value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.out, "{:?}", value);
        }
    }
}

pub fn level_label(level: &Level, target: &str) -> &'static str {
    if target == CRITICAL_TARGET {
        return "CRITICAL";
    }
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// `RUST_LOG` (or `info`) plus a directive that always lets critical events through.
pub fn filter_directives(rust_log: Option<&str>) -> String {
    let base = rust_log
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("info");
    format!("{},{}=error", base, CRITICAL_TARGET)
}

pub fn init() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::try_new(filter_directives(rust_log.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(None)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .event_format(LineFormat)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture(filter: EnvFilter, emit: impl FnOnce()) -> String {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(move || writer.clone())
            .event_format(LineFormat)
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        buf.contents()
    }

    #[test]
    fn labels() {
        assert_eq!(level_label(&Level::INFO, "homework_bot::notifier"), "INFO");
        assert_eq!(level_label(&Level::ERROR, "homework_bot::watcher"), "ERROR");
        assert_eq!(level_label(&Level::ERROR, CRITICAL_TARGET), "CRITICAL");
    }

    #[test]
    fn line_carries_only_the_message() {
        let out = capture(EnvFilter::new("info"), || {
            tracing::error!(kind = "Transport", from_date = 1000, "Сбой: {}", 42);
        });
        let line = out.lines().next().unwrap();
        assert!(line.ends_with(" - ERROR - Сбой: 42"), "{line}");
        assert!(!line.contains("kind"));
        assert!(!line.contains("from_date"));
        assert_eq!(line.split(" - ").count(), 3);
    }

    #[test]
    fn critical_survives_narrow_rust_log() {
        let directives = filter_directives(Some("homework_bot=info"));
        assert_eq!(directives, "homework_bot=info,critical=error");
        let out = capture(EnvFilter::try_new(&directives).unwrap(), || {
            tracing::error!(target: CRITICAL_TARGET, "Отсутствует переменная окружения: TELEGRAM_TOKEN");
            tracing::info!(target: "other_crate", "hidden");
        });
        assert!(out.contains(" - CRITICAL - Отсутствует переменная окружения: TELEGRAM_TOKEN"));
        assert!(!out.contains("hidden"));
    }

    #[test]
    fn blank_rust_log_defaults_to_info() {
        assert_eq!(filter_directives(None), "info,critical=error");
        assert_eq!(filter_directives(Some("  ")), "info,critical=error");
        assert!(EnvFilter::try_new(filter_directives(None)).is_ok());
    }
}

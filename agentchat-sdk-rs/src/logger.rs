use chrono::Local;
use colored::*;
use std::fmt::Write as _;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Initializes the global logging system with colorized output.
///
/// `RUST_LOG` controls the level (default: info), e.g.
/// `RUST_LOG=agentchat_sdk_rs=debug`. Safe to call more than once; only the
/// first call installs the subscriber.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_writer(std::io::stdout)
        .event_format(ChatFormatter)
        .try_init();
}

struct ChatFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ChatFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string();
        let level = *event.metadata().level();

        write!(
            writer,
            "{} {} {} ",
            now.dimmed(),
            level_label(level),
            event.metadata().target().dimmed()
        )?;

        let mut line = EventLine::default();
        event.record(&mut line);

        write!(writer, "{}{}", line.message, line.fields)?;
        writeln!(writer)
    }
}

fn level_label(level: tracing::Level) -> String {
    match level {
        tracing::Level::ERROR => "ERROR".red().bold().to_string(),
        tracing::Level::WARN => "WARN".yellow().bold().to_string(),
        tracing::Level::INFO => "INFO".green().bold().to_string(),
        tracing::Level::DEBUG => "DEBUG".blue().bold().to_string(),
        tracing::Level::TRACE => "TRACE".magenta().bold().to_string(),
    }
}

/// Collects the message unescaped, with structured fields appended as `k=v`.
#[derive(Default)]
struct EventLine {
    message: String,
    fields: String,
}

impl tracing::field::Visit for EventLine {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name().cyan(), value);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name().cyan(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging();
        init_logging();
        tracing::info!(session = "s1", "logger ready");
    }
}

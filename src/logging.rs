//! Log layers: colored human-readable output and a JSON stream for files.
//!
//! Both layers report span closes, so every instrumented statistic logs how
//! long it took.

use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, MakeWriter, format::FmtSpan},
    registry::LookupSpan,
};

/// Env filter reading `var`, falling back to `default` when it is unset or
/// names no default level.
pub fn env_filter(var: &str, default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var(var)
        .from_env_lossy()
}

pub fn console_layer<S, W>(writer: W, filter: EnvFilter) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(writer)
        .with_filter(filter)
}

pub fn json_layer<S, W>(writer: W, filter: EnvFilter) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(writer)
        .with_filter(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::popular_hour;
    use crate::filter::TimeFilter;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_statistic_timing_logged_at_default_levels() {
        let console = Captured::default();
        let file = Captured::default();
        let subscriber = tracing_subscriber::registry()
            .with(console_layer(console.clone(), EnvFilter::new("info")))
            .with(json_layer(file.clone(), EnvFilter::new("debug")));

        tracing::subscriber::with_default(subscriber, || {
            popular_hour(&[], TimeFilter::All);
        });

        let console = console.contents();
        assert!(console.contains("popular_hour"), "console: {console}");
        assert!(console.contains("time.busy"), "console: {console}");

        let file = file.contents();
        let close = file
            .lines()
            .find(|line| line.contains("time.busy"))
            .unwrap_or_else(|| panic!("no close event in: {file}"));
        let event: serde_json::Value = serde_json::from_str(close).unwrap();
        assert_eq!(event["fields"]["message"], "close");
        assert!(close.contains("popular_hour"));
    }

    #[test]
    fn test_env_filter_falls_back_to_default() {
        let filter = env_filter("BIKESHARE_STATS_UNSET_FILTER", LevelFilter::INFO);
        assert_eq!(filter.to_string(), "info");
    }
}

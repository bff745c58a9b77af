//! Plain-text event formatter that tags each line with the enclosing span ids.
//!
//! Used by `logging::init()` for the `LOG_FILE` layer, so every line written while a
//! turn is running can be grouped by its root span.

use std::fmt;

use tracing_core::Subscriber;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// `TIMESTAMP [trace_id=R span_id=S] LEVEL target: fields`.
///
/// `trace_id` is the id of the outermost span in scope; the pair is omitted for
/// events logged outside any span.
#[derive(Default)]
pub struct SpanTaggedLine {
    timer: SystemTime,
}

impl SpanTaggedLine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, N> FormatEvent<S, N> for SpanTaggedLine
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing_core::Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;
        if let Some(span) = ctx.parent_span() {
            let span_id = span.id().into_u64();
            let trace_id = span
                .scope()
                .from_root()
                .next()
                .map(|root| root.id().into_u64())
                .unwrap_or(span_id);
            write!(writer, " trace_id={trace_id} span_id={span_id}")?;
        }
        let meta = event.metadata();
        write!(writer, " {}: {}: ", meta.level(), meta.target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone)]
    struct VecWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for VecWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let sink = Arc::new(Mutex::new(Vec::<u8>::new()));
        let writer = {
            let sink = Arc::clone(&sink);
            move || VecWriter(Arc::clone(&sink))
        };
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .event_format(SpanTaggedLine::new())
                .with_writer(writer)
                .with_ansi(false),
        );
        tracing::subscriber::with_default(subscriber, f);
        let bytes = sink.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn event_inside_span_carries_ids() {
        let output = capture(|| {
            let turn = tracing::info_span!("turn");
            let _turn = turn.enter();
            let node = tracing::info_span!("node");
            let _node = node.enter();
            tracing::info!(stage = "ready", "routed");
        });
        assert!(output.contains("trace_id="));
        assert!(output.contains("span_id="));
        assert!(output.contains("INFO"));
        assert!(output.contains("routed"));
        assert!(output.contains("stage=\"ready\""));
    }

    #[test]
    fn event_outside_span_has_no_ids() {
        let output = capture(|| tracing::warn!("no span"));
        assert!(!output.contains("trace_id="));
        assert!(output.contains("WARN"));
        assert!(output.ends_with("no span\n"));
    }
}

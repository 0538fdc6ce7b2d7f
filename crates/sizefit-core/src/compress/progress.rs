//! Progress reporting to an external observer.
//!
//! Reporting is synchronous and purely observational: the compressor calls
//! [`ProgressSink::report`] at fixed checkpoints and never waits on the sink.

/// One progress update: a bar position and the current status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// 0 to 100
    pub percent: u8,
    pub status: String,
}

/// Receives progress events in order.
pub trait ProgressSink {
    fn report(&mut self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressEvent),
{
    fn report(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _event: &ProgressEvent) {}
}

/// Sink that records every event, mostly useful in tests and logs.
#[derive(Debug, Clone, Default)]
pub struct ProgressLog {
    events: Vec<ProgressEvent>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&ProgressEvent> {
        self.events.last()
    }

    pub fn into_events(self) -> Vec<ProgressEvent> {
        self.events
    }
}

impl ProgressSink for ProgressLog {
    fn report(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}

/// Remembers the last bar position and status so either can be updated
/// on its own.
pub(crate) struct Reporter<'a> {
    sink: &'a mut dyn ProgressSink,
    current: ProgressEvent,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self {
            sink,
            current: ProgressEvent {
                percent: 0,
                status: String::new(),
            },
        }
    }

    pub(crate) fn update(&mut self, percent: u8, status: impl Into<String>) {
        self.current.percent = percent.min(100);
        self.current.status = status.into();
        self.sink.report(&self.current);
    }

    pub(crate) fn percent(&mut self, percent: u8) {
        self.current.percent = percent.min(100);
        self.sink.report(&self.current);
    }

    pub(crate) fn status(&mut self, status: impl Into<String>) {
        self.current.status = status.into();
        self.sink.report(&self.current);
    }
}

/// Bytes as mebibytes with two decimals, e.g. `1.50`.
pub(crate) fn format_mb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / (1024.0 * 1024.0))
}

/// Bytes as kibibytes with one decimal, e.g. `512.0`.
pub(crate) fn format_kb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / 1024.0)
}

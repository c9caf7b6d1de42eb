use crate::LineSink;

/// The active output destinations of a logger.
///
/// A set holds at most one standard-stream sink and one log-file sink. Every
/// line is written to each sink that is present; write failures are dropped
/// so logging never fails the caller.
#[derive(Debug, Default)]
pub struct SinkSet {
    stream: Option<LineSink>,
    file: Option<LineSink>,
}

impl SinkSet {
    /// Creates a set from an optional stream sink and an optional file sink.
    #[must_use]
    pub const fn new(stream: Option<LineSink>, file: Option<LineSink>) -> Self {
        Self { stream, file }
    }

    /// Replaces all output with `sink`, dropping any secondary file sink.
    pub fn redirect(&mut self, sink: LineSink) {
        self.stream = Some(sink);
        self.file = None;
    }

    /// Writes `line` to every active sink.
    pub fn write_line(&self, line: &str) {
        for sink in self.stream.iter().chain(self.file.iter()) {
            // A failing destination only loses this line.
            let _ = sink.write_line(line);
        }
    }

    /// Reports whether no sink is active, in which case lines are discarded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stream.is_none() && self.file.is_none()
    }

    /// Reports whether a log-file sink is active.
    #[must_use]
    pub const fn has_file(&self) -> bool {
        self.file.is_some()
    }
}

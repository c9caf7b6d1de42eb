//! crates/logging/src/tracing_bridge.rs
//! Bridge from the `tracing` ecosystem into a [`Logger`].
//!
//! [`FilterLayer`] is a `tracing-subscriber` layer that turns events emitted
//! with the standard `tracing` macros into logger calls. The event's file,
//! line and module path stand in for the call site, so per-file filter
//! rules apply to them exactly as to native calls.
//!
//! | `tracing` level | request                                  |
//! |-----------------|------------------------------------------|
//! | `ERROR`         | `ERROR`                                  |
//! | `WARN`          | `WARN`                                   |
//! | `INFO`          | `INFO`                                   |
//! | `DEBUG`         | `DEBUG`                                  |
//! | `TRACE`         | trace at the `depth` field (default `1`) |
//!
//! # Usage
//!
//! ```rust,ignore
//! use filterlog::{Logger, init_tracing};
//!
//! init_tracing(Logger::from_env());
//! tracing::info!("listening");
//! tracing::trace!(depth = 3, "frame decoded");
//! ```

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::caller::{Caller, ResolveCaller};
use crate::gate::Request;
use crate::levels::Severity;
use crate::logger::Logger;

/// Depth used for `TRACE` events without a `depth` field.
pub const DEFAULT_TRACE_DEPTH: i32 = 1;

const DEPTH_FIELD: &str = "depth";
const MESSAGE_FIELD: &str = "message";

impl ResolveCaller for Metadata<'_> {
    fn resolve_caller(&self, _skip_frames: usize) -> Option<Caller<'_>> {
        Some(Caller {
            file: self.file()?,
            line: self.line().unwrap_or(0),
            function: self.module_path().unwrap_or_default(),
        })
    }
}

/// A tracing layer that routes events through a [`Logger`].
#[derive(Clone, Debug)]
pub struct FilterLayer {
    logger: Arc<Logger>,
}

impl FilterLayer {
    /// Creates a layer writing through `logger`.
    #[must_use]
    pub fn new(logger: impl Into<Arc<Logger>>) -> Self {
        Self {
            logger: logger.into(),
        }
    }

    /// Maps a tracing level to the logger request it is filtered as.
    fn request_for(level: Level, depth: i32) -> Request {
        match level {
            Level::ERROR => Request::Level(Severity::Error),
            Level::WARN => Request::Level(Severity::Warn),
            Level::INFO => Request::Level(Severity::Info),
            Level::DEBUG => Request::Level(Severity::Debug),
            _ => Request::Trace(depth),
        }
    }
}

impl<S> Layer<S> for FilterLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() == Level::TRACE && !self.logger.gate().trace_enabled() {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        let depth = visitor.depth.unwrap_or(DEFAULT_TRACE_DEPTH);
        let request = Self::request_for(*metadata.level(), depth);
        self.logger.log(metadata, request, &visitor);
    }
}

/// Collects the message, the trace depth and any other fields of an event.
#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: String,
    depth: Option<i32>,
}

impl Visit for EventVisitor {
    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == DEPTH_FIELD {
            if let Ok(depth) = i32::try_from(value) {
                self.depth = Some(depth);
                return;
            }
        }
        self.record_debug(field, &value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == DEPTH_FIELD {
            if let Ok(depth) = i32::try_from(value) {
                self.depth = Some(depth);
                return;
            }
        }
        self.record_debug(field, &value);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

impl fmt::Display for EventVisitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        f.write_str(&self.fields)
    }
}

/// Installs a global `tracing` subscriber that routes every event through
/// `logger`.
///
/// Does nothing when a global subscriber is already installed.
pub fn init_tracing(logger: Logger) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(FilterLayer::new(logger))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EnvConfig, Setting};
    use std::io;
    use test_support::SharedBuffer;
    use tracing_subscriber::layer::SubscriberExt;

    fn capture(config: EnvConfig) -> (FilterLayer, SharedBuffer) {
        let config = config
            .with(Setting::LogNoTime, "yes")
            .with(Setting::ConfFile, "/nonexistent/filterlog-test.conf");
        let mut logger = Logger::with_diagnostics(config, "filterlog-test", "", &mut io::sink());
        let buffer = SharedBuffer::new();
        logger.redirect(buffer.clone());
        (FilterLayer::new(logger), buffer)
    }

    fn with_layer(layer: FilterLayer, body: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, body);
    }

    #[test]
    fn levels_map_to_severities() {
        assert_eq!(
            FilterLayer::request_for(Level::ERROR, 1),
            Request::Level(Severity::Error)
        );
        assert_eq!(
            FilterLayer::request_for(Level::DEBUG, 1),
            Request::Level(Severity::Debug)
        );
        assert_eq!(FilterLayer::request_for(Level::TRACE, 4), Request::Trace(4));
    }

    #[test]
    fn events_are_filtered_by_file() {
        let (layer, buffer) = capture(
            EnvConfig::default().with(Setting::LogLevel, "tracing_bridge.rs=ERROR,DEBUG"),
        );
        with_layer(layer, || {
            tracing::warn!("dropped");
            tracing::error!(code = 7, "kept");
        });
        assert_eq!(buffer.lines(), vec!["ERROR    : kept code=7"]);
    }

    #[test]
    fn trace_events_use_depth_field() {
        let (layer, buffer) = capture(EnvConfig::default().with(Setting::TraceLevel, "2"));
        with_layer(layer, || {
            tracing::trace!(depth = 2, "shallow enough");
            tracing::trace!(depth = 3, "too deep");
            tracing::trace!("default depth");
        });
        assert_eq!(
            buffer.lines(),
            vec!["TRACE(2) : shallow enough", "TRACE(1) : default depth"]
        );
    }

    #[test]
    fn caller_info_uses_event_metadata() {
        let (layer, buffer) = capture(EnvConfig::default().with(Setting::CallerInfo, "1"));
        with_layer(layer, || tracing::info!("located"));
        let contents = buffer.contents();
        assert!(
            contents.starts_with("INFO     : [src/tracing_bridge.rs:"),
            "{contents}"
        );
        assert!(
            contents.ends_with(&format!("({})] located\n", module_path!())),
            "{contents}"
        );
    }
}

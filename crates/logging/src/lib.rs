#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filterlog` is a leveled logging facade that decides, per call site,
//! whether a message is emitted. Rules map the calling source file and the
//! requested severity (or trace depth) to an accept/reject decision using
//! glob patterns layered over a global default.
//!
//! # Design
//!
//! - [`Severity`] is the ordered level model; trace depths are plain
//!   integers on a separate axis.
//! - A [`Filter`] is one rule: a glob over the caller's base file name plus a
//!   threshold. A [`FilterSpec`] is an ordered rule list compiled from a
//!   string such as `client.rs=ERROR,INFO` and evaluated
//!   first-matching-pattern-wins, with the global rule always last.
//! - [`EnvConfig`] gathers raw settings from the environment and merges a
//!   [`ConfigFile`] on top, honouring `!` priority markers.
//! - [`Settings`] is the compiled, read-only result; the [`DispatchGate`]
//!   inside it answers every logging call.
//! - [`Logger`] owns the settings and offers the emission methods and
//!   macros ([`info!`], [`trace!`], ...).
//!
//! # Invariants
//!
//! - Logging never fails the caller. Configuration problems become
//!   [`ConfigDiagnostic`]s reported on standard error and are otherwise
//!   skipped.
//! - A trace spec without rules rejects before the caller is resolved.
//! - Reconfiguration needs `&mut Logger`, so it cannot race with emission.
//!
//! # Examples
//!
//! ```
//! use filterlog::{EnvConfig, Logger, Setting};
//!
//! let config = EnvConfig::default()
//!     .with(Setting::LogLevel, "net.rs=DEBUG,WARN")
//!     .with(Setting::TraceLevel, "2")
//!     .with(Setting::LogStream, "NONE");
//! let logger = Logger::new(config);
//!
//! filterlog::warn!(logger, "queue is {}% full", 80);
//! filterlog::trace!(logger, 1, "polling");
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Severity`] and [`EnvConfig`].
//! - `tracing`: the `FilterLayer` bridge and `init_tracing`, and
//!   diagnostics mirrored as `tracing` warnings.

mod caller;
mod config;
mod diagnostics;
mod filter;
mod gate;
mod levels;
mod logger;
mod macros;
mod settings;
mod spec;
mod time_format;

#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use caller::{CallSite, Caller, ResolveCaller, module_and_file};
pub use config::{
    ConfigEntry, ConfigFile, EnvConfig, PRIORITY_MARKER, Setting, app_name, default_config_path,
    is_true_bool_string,
};
pub use diagnostics::{ConfigDiagnostic, report};
pub use filter::{Filter, FilterMatch, base_name};
pub use gate::{CALLER_SKIP_FRAMES, Decision, DispatchGate, Request};
pub use levels::{Severity, TRACE_DISABLED, UnknownSeverity};
pub use logger::Logger;
pub use logging_sink::{LineSink, SinkSet, StreamTarget};
pub use settings::Settings;
pub use spec::{Axis, FilterSpec};
pub use time_format::TimeFormat;

#[cfg(feature = "tracing")]
pub use tracing_bridge::{DEFAULT_TRACE_DEPTH, FilterLayer, init_tracing};

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides the output side of the `filterlog` facade: a
//! [`LineSink`] that owns a writable destination and appends fully rendered
//! log lines to it, a [`StreamTarget`] selector for the standard streams, and
//! a [`SinkSet`] that fans each line out to the primary stream and an optional
//! secondary log file.
//!
//! # Design
//!
//! Every [`LineSink`] wraps its writer in a [`std::sync::Mutex`] so a single
//! sink can be shared by any number of logging threads. A line is assembled
//! completely before the lock is taken and is handed to the writer with one
//! `write_all` call, so concurrent writers never interleave partial lines.
//!
//! # Invariants
//!
//! - Every line is terminated with exactly one `\n`; lines that already end
//!   in a newline are written untouched.
//! - [`SinkSet::write_line`] never fails. Write errors are dropped per sink so
//!   a broken log file cannot disturb the standard stream or the caller.
//! - A poisoned sink lock is recovered rather than propagated.
//!
//! # Errors
//!
//! [`LineSink::write_line`] and [`LineSink::append_file`] surface
//! [`std::io::Error`] values from the underlying writer or file system.
//!
//! # Examples
//!
//! ```
//! use logging_sink::{LineSink, SinkSet};
//!
//! let mut sinks = SinkSet::new(Some(LineSink::stderr()), None);
//! sinks.redirect(LineSink::new(std::io::sink()));
//! sinks.write_line("INFO     : ready");
//! assert!(!sinks.has_file());
//! ```

mod set;
mod sink;
mod stream;

pub use set::SinkSet;
pub use sink::LineSink;
pub use stream::StreamTarget;

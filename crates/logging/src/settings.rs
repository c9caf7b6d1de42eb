//! crates/logging/src/settings.rs
//! Configuration compiled into the read-only state consulted by every call.

use std::path::Path;

use logging_sink::{LineSink, SinkSet, StreamTarget};

use crate::config::{ConfigFile, EnvConfig, is_true_bool_string};
use crate::diagnostics::ConfigDiagnostic;
use crate::gate::DispatchGate;
use crate::spec::{Axis, FilterSpec};
use crate::time_format::TimeFormat;

/// Compiled settings owned by a [`Logger`](crate::Logger).
///
/// Built once from merged configuration; the emission path only reads it.
#[derive(Debug)]
pub struct Settings {
    config: EnvConfig,
    gate: DispatchGate,
    time_format: TimeFormat,
    caller_info: bool,
    sinks: SinkSet,
}

impl Settings {
    /// Merges the config file named by `env` (or the default location for
    /// `app_name`) into `env` and compiles the result.
    ///
    /// A missing or unreadable config file is ignored. Diagnostics from the
    /// file and from compilation are returned in the order they arose.
    #[must_use]
    pub fn load(env: EnvConfig, app_name: &str, prefix: &str) -> (Self, Vec<ConfigDiagnostic>) {
        let path = env.config_path(app_name);
        let mut diagnostics = Vec::new();
        let merged = match ConfigFile::load(&path, prefix) {
            Some((file, file_diagnostics)) => {
                diagnostics.extend(file_diagnostics);
                env.merge(&file)
            }
            None => env,
        };
        let (settings, compile_diagnostics) = Self::compile(merged);
        diagnostics.extend(compile_diagnostics);
        (settings, diagnostics)
    }

    /// Compiles already-merged configuration.
    ///
    /// Filter specs get the default global thresholds (`INFO` for the log
    /// axis, disabled tracing). A log file that cannot be opened leaves the
    /// file sink off.
    #[must_use]
    pub fn compile(config: EnvConfig) -> (Self, Vec<ConfigDiagnostic>) {
        let mut diagnostics = Vec::new();

        let gate = DispatchGate::new(
            FilterSpec::parse(&config.log_level, Axis::Log),
            FilterSpec::parse(&config.trace_level, Axis::Trace),
        );

        let time_format = if is_true_bool_string(&config.log_no_time) {
            TimeFormat::Disabled
        } else {
            let (format, diagnostic) = TimeFormat::resolve(&config.time_format);
            diagnostics.extend(diagnostic);
            format
        };

        let stream = StreamTarget::from_selector(&config.log_stream).open();
        let file = open_log_file(&config.log_file);

        let settings = Self {
            caller_info: is_true_bool_string(&config.caller_info),
            config,
            gate,
            time_format,
            sinks: SinkSet::new(stream, file),
        };
        (settings, diagnostics)
    }

    /// Returns the merged configuration the settings were compiled from.
    #[must_use]
    pub const fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Returns the dispatch gate.
    #[must_use]
    pub const fn gate(&self) -> &DispatchGate {
        &self.gate
    }

    /// Returns the timestamp format.
    #[must_use]
    pub const fn time_format(&self) -> &TimeFormat {
        &self.time_format
    }

    /// Reports whether lines carry the caller decoration.
    #[must_use]
    pub const fn caller_info(&self) -> bool {
        self.caller_info
    }

    /// Returns the active output sinks.
    #[must_use]
    pub const fn sinks(&self) -> &SinkSet {
        &self.sinks
    }

    pub(crate) fn sinks_mut(&mut self) -> &mut SinkSet {
        &mut self.sinks
    }
}

fn open_log_file(path: &str) -> Option<LineSink> {
    if path.is_empty() {
        return None;
    }
    LineSink::append_file(Path::new(path)).ok()
}

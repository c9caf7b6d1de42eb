//! crates/logging/src/logger.rs
//! The logger handle and its emission operations.

use std::fmt::{self, Display, Write as _};
use std::io::{self, Write};
use std::panic::Location;

use logging_sink::LineSink;

use crate::caller::ResolveCaller;
use crate::config::{EnvConfig, app_name};
use crate::diagnostics::{self, ConfigDiagnostic};
use crate::gate::{Decision, DispatchGate, Request};
use crate::levels::Severity;
use crate::settings::Settings;
use crate::time_format;

/// A leveled logger with per-file filtering.
///
/// A `Logger` owns its compiled [`Settings`]. Emission methods take `&self`
/// and may be called from any number of threads; reconfiguration through
/// [`reinitialize`](Self::reinitialize) or [`redirect`](Self::redirect)
/// needs `&mut self` and therefore cannot race with in-flight calls.
///
/// # Examples
///
/// ```
/// use filterlog::{EnvConfig, Logger, Setting};
///
/// let config = EnvConfig::default()
///     .with(Setting::LogLevel, "WARN")
///     .with(Setting::LogStream, "NONE");
/// let logger = Logger::new(config);
///
/// logger.warn(&[&"disk usage at", &93, &"percent"]);
/// filterlog::info!(logger, "suppressed: {}", 1);
/// ```
#[derive(Debug)]
pub struct Logger {
    settings: Settings,
    app_name: String,
    prefix: String,
}

/// Generates the variadic and formatted emission methods of one severity.
macro_rules! severity_methods {
    ($($severity:ident => $variadic:ident, $formatted:ident;)+) => {
        $(
            #[doc = concat!(
                "Logs `values` joined by single spaces at `",
                stringify!($severity),
                "` severity."
            )]
            #[track_caller]
            pub fn $variadic(&self, values: &[&dyn Display]) {
                self.log(
                    Location::caller(),
                    Request::Level(Severity::$severity),
                    &Joined(values),
                );
            }

            #[doc = concat!(
                "Logs pre-formatted `message` at `",
                stringify!($severity),
                "` severity. Pair with [`format_args!`]."
            )]
            #[track_caller]
            pub fn $formatted(&self, message: fmt::Arguments<'_>) {
                self.log(Location::caller(), Request::Level(Severity::$severity), &message);
            }
        )+
    };
}

impl Logger {
    /// Creates a logger from the unprefixed process environment and the
    /// executable's default config file.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_prefix("")
    }

    /// Creates a logger whose setting names carry `prefix`, for example
    /// `MYAPP_` for `MYAPP_LOG_LEVEL`.
    #[must_use]
    pub fn from_env_with_prefix(prefix: &str) -> Self {
        Self::build(
            EnvConfig::from_env_with_prefix(prefix),
            app_name(),
            prefix.to_owned(),
            &mut io::stderr(),
        )
    }

    /// Creates a logger from explicit configuration values.
    ///
    /// The config file they name (or the default one) is still merged in.
    /// Diagnostics go to standard error.
    #[must_use]
    pub fn new(config: EnvConfig) -> Self {
        Self::build(config, app_name(), String::new(), &mut io::stderr())
    }

    /// Like [`new`](Self::new) with an explicit application name, setting
    /// prefix and diagnostic stream.
    #[must_use]
    pub fn with_diagnostics<W>(
        config: EnvConfig,
        app_name: &str,
        prefix: &str,
        diagnostics: &mut W,
    ) -> Self
    where
        W: Write + ?Sized,
    {
        Self::build(config, app_name.to_owned(), prefix.to_owned(), diagnostics)
    }

    /// Wraps already-compiled settings.
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            settings,
            app_name: app_name(),
            prefix: String::new(),
        }
    }

    fn build<W>(config: EnvConfig, app_name: String, prefix: String, stream: &mut W) -> Self
    where
        W: Write + ?Sized,
    {
        let settings = Self::compile(config, &app_name, &prefix, stream);
        Self {
            settings,
            app_name,
            prefix,
        }
    }

    fn compile<W>(config: EnvConfig, app_name: &str, prefix: &str, stream: &mut W) -> Settings
    where
        W: Write + ?Sized,
    {
        let (settings, found): (Settings, Vec<ConfigDiagnostic>) =
            Settings::load(config, app_name, prefix);
        diagnostics::report(&found, stream);
        settings
    }

    /// Replaces every compiled setting, as if the logger were created anew
    /// from `config`. Diagnostics go to standard error.
    pub fn reinitialize(&mut self, config: EnvConfig) {
        self.reinitialize_with_diagnostics(config, &mut io::stderr());
    }

    /// [`reinitialize`](Self::reinitialize) with an explicit diagnostic
    /// stream.
    pub fn reinitialize_with_diagnostics<W>(&mut self, config: EnvConfig, diagnostics: &mut W)
    where
        W: Write + ?Sized,
    {
        self.settings = Self::compile(config, &self.app_name, &self.prefix, diagnostics);
    }

    /// Sends all further output to `writer` alone, closing any log file.
    pub fn redirect<W>(&mut self, writer: W)
    where
        W: Write + Send + 'static,
    {
        self.settings.sinks_mut().redirect(LineSink::new(writer));
    }

    /// Returns the compiled settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the dispatch gate.
    #[must_use]
    pub const fn gate(&self) -> &DispatchGate {
        self.settings.gate()
    }

    /// Emits `message` for `request` if the gate accepts the call described
    /// by `resolver`.
    ///
    /// The message is only formatted after acceptance. Output errors are
    /// dropped.
    pub fn log<R>(&self, resolver: &R, request: Request, message: &dyn Display)
    where
        R: ResolveCaller + ?Sized,
    {
        let decision = self.settings.gate().should_emit(resolver, request);
        if !decision.emit {
            return;
        }
        let line = self.render_line(request, &decision, message);
        self.settings.sinks().write_line(&line);
    }

    fn render_line(
        &self,
        request: Request,
        decision: &Decision<'_>,
        message: &dyn Display,
    ) -> String {
        let format = self.settings.time_format();
        let mut line = if format.is_enabled() {
            format.prefix(time_format::now())
        } else {
            String::new()
        };
        let _ = write!(line, "{request:<9}: ");
        if self.settings.caller_info() {
            line.push_str(&decision.caller_info());
        }
        let _ = write!(line, "{message}");
        line
    }

    severity_methods! {
        Critical => critical, criticalf;
        Error => error, errorf;
        Warn => warn, warnf;
        Info => info, infof;
        Debug => debug, debugf;
    }

    /// Logs `values` joined by single spaces as a trace message at `depth`.
    ///
    /// Returns immediately when tracing is disabled.
    #[track_caller]
    pub fn trace(&self, depth: i32, values: &[&dyn Display]) {
        if self.settings.gate().trace_enabled() {
            self.log(Location::caller(), Request::Trace(depth), &Joined(values));
        }
    }

    /// Logs pre-formatted `message` as a trace message at `depth`.
    #[track_caller]
    pub fn tracef(&self, depth: i32, message: fmt::Arguments<'_>) {
        if self.settings.gate().trace_enabled() {
            self.log(Location::caller(), Request::Trace(depth), &message);
        }
    }

    /// Alias of [`info`](Self::info) for code written against `println`-style
    /// loggers.
    #[track_caller]
    pub fn println(&self, values: &[&dyn Display]) {
        self.log(Location::caller(), Request::Level(Severity::Info), &Joined(values));
    }

    /// Alias of [`infof`](Self::infof).
    #[track_caller]
    pub fn printf(&self, message: fmt::Arguments<'_>) {
        self.log(Location::caller(), Request::Level(Severity::Info), &message);
    }
}

struct Joined<'a>(&'a [&'a dyn Display]);

impl Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caller::CallSite;
    use crate::config::Setting;
    use test_support::SharedBuffer;

    fn capture(config: EnvConfig) -> (Logger, SharedBuffer) {
        let config = config
            .with(Setting::LogNoTime, "y")
            .with(Setting::ConfFile, "/nonexistent/filterlog-test.conf");
        let mut logger = Logger::with_diagnostics(config, "filterlog-test", "", &mut io::sink());
        let buffer = SharedBuffer::new();
        logger.redirect(buffer.clone());
        (logger, buffer)
    }

    #[test]
    fn joined_values_use_single_spaces() {
        let rendered = Joined(&[&"a", &1, &'c']).to_string();
        assert_eq!(rendered, "a 1 c");
        assert_eq!(Joined(&[]).to_string(), "");
    }

    #[test]
    fn lines_are_padded_and_terminated() {
        let (logger, buffer) = capture(EnvConfig::default());
        logger.info(&[&"hello", &42]);
        logger.warnf(format_args!("{} of {}\n", 3, 4));
        assert_eq!(buffer.contents(), "INFO     : hello 42\nWARN     : 3 of 4\n");
    }

    #[test]
    fn filtered_levels_are_dropped() {
        let (logger, buffer) = capture(EnvConfig::default().with(Setting::LogLevel, "ERROR"));
        logger.warn(&[&"dropped"]);
        logger.critical(&[&"kept"]);
        assert_eq!(buffer.lines(), vec!["CRITICAL : kept".to_owned()]);
    }

    #[test]
    fn trace_label_carries_depth() {
        let (logger, buffer) = capture(EnvConfig::default().with(Setting::TraceLevel, "2"));
        logger.trace(2, &[&"inside"]);
        logger.tracef(3, format_args!("too deep"));
        assert_eq!(buffer.lines(), vec!["TRACE(2) : inside".to_owned()]);
    }

    #[test]
    fn caller_info_decorates_line() {
        let (logger, buffer) = capture(EnvConfig::default().with(Setting::CallerInfo, "yes"));
        let site = CallSite::new("src/net/client.rs", 17, "app::net");
        logger.log(&site, Request::Level(Severity::Error), &"refused");
        assert_eq!(
            buffer.contents(),
            "ERROR    : [net/client.rs:17 (app::net)] refused\n"
        );
    }

    #[test]
    fn track_caller_reports_this_file() {
        let (logger, buffer) = capture(
            EnvConfig::default()
                .with(Setting::CallerInfo, "1")
                .with(Setting::LogLevel, "logger.rs=DEBUG,NONE"),
        );
        logger.debug(&[&"here"]);
        let contents = buffer.contents();
        assert!(contents.starts_with("DEBUG    : [src/logger.rs:"), "{contents}");
        assert!(contents.ends_with(" ()] here\n"), "{contents}");
    }

    #[test]
    fn println_and_printf_log_at_info() {
        let (logger, buffer) = capture(EnvConfig::default().with(Setting::LogLevel, "WARN"));
        logger.println(&[&"dropped"]);
        logger.printf(format_args!("dropped"));
        assert!(buffer.contents().is_empty());

        let (logger, buffer) = capture(EnvConfig::default());
        logger.println(&[&"kept"]);
        logger.printf(format_args!("{}", "also"));
        assert_eq!(buffer.lines(), vec!["INFO     : kept", "INFO     : also"]);
    }

    #[test]
    fn timestamp_prefix_precedes_level() {
        let config = EnvConfig::default()
            .with(Setting::TimeFormat, "[year]")
            .with(Setting::ConfFile, "/nonexistent/filterlog-test.conf");
        let mut logger = Logger::with_diagnostics(config, "filterlog-test", "", &mut io::sink());
        let buffer = SharedBuffer::new();
        logger.redirect(buffer.clone());
        logger.info(&[&"stamped"]);

        let contents = buffer.contents();
        let (year, rest) = contents.split_once(' ').expect("timestamp");
        assert_eq!(year.len(), 4);
        assert!(year.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(rest, "INFO     : stamped\n");
    }

    #[test]
    fn reinitialize_replaces_rules_and_reports() {
        let (mut logger, _) = capture(EnvConfig::default());
        let mut diagnostics: Vec<u8> = Vec::new();
        logger.reinitialize_with_diagnostics(
            EnvConfig::default()
                .with(Setting::LogStream, "NONE")
                .with(Setting::TimeFormat, "[nope")
                .with(Setting::ConfFile, "/nonexistent/filterlog-test.conf"),
            &mut diagnostics,
        );
        let buffer = SharedBuffer::new();
        logger.redirect(buffer.clone());
        logger.info(&[&"after"]);

        let report = String::from_utf8(diagnostics).expect("utf-8");
        assert!(report.starts_with("WARN: filterlog - invalid time format"), "{report}");
        assert!(buffer.contents().ends_with("INFO     : after\n"));
    }

    #[test]
    fn logger_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Logger>();
    }
}

//! crates/logging/src/macros.rs
//! Emission macros that capture the call site.
//!
//! Each macro records `file!()`, `line!()` and `module_path!()` at the point
//! of use and forwards a `format!`-style message to [`Logger::log`]. The
//! module path stands in for the enclosing function name in caller info.
//!
//! [`Logger::log`]: crate::Logger::log

/// Logs at an explicit [`Request`](crate::Request).
///
/// # Example
/// ```
/// use filterlog::{EnvConfig, Logger, Request, Setting, Severity};
///
/// let logger = Logger::new(EnvConfig::default().with(Setting::LogStream, "NONE"));
/// filterlog::log!(logger, Request::Level(Severity::Warn), "retrying in {}s", 5);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $request:expr, $($arg:tt)+) => {
        $logger.log(
            &$crate::CallSite::new(::core::file!(), ::core::line!(), ::core::module_path!()),
            $request,
            &::core::format_args!($($arg)+),
        )
    };
}

/// Logs at `CRITICAL`.
///
/// # Example
/// ```ignore
/// filterlog::critical!(logger, "cannot open {}", path.display());
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Request::Level($crate::Severity::Critical), $($arg)+)
    };
}

/// Logs at `ERROR`.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Request::Level($crate::Severity::Error), $($arg)+)
    };
}

/// Logs at `WARN`.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Request::Level($crate::Severity::Warn), $($arg)+)
    };
}

/// Logs at `INFO`.
///
/// # Example
/// ```ignore
/// filterlog::info!(logger, "listening on {addr}");
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Request::Level($crate::Severity::Info), $($arg)+)
    };
}

/// Logs at `DEBUG`.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Request::Level($crate::Severity::Debug), $($arg)+)
    };
}

/// Logs a trace message at `depth`.
///
/// Nothing is evaluated beyond the depth when tracing is disabled.
///
/// # Example
/// ```ignore
/// filterlog::trace!(logger, 2, "frame {} acknowledged", seq);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $depth:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        if logger.gate().trace_enabled() {
            $crate::log!(logger, $crate::Request::Trace($depth), $($arg)+);
        }
    }};
}

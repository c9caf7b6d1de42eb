//! crates/logging/src/gate.rs
//! The per-call accept/reject decision.

use std::borrow::Cow;
use std::fmt;

use crate::caller::{ResolveCaller, module_and_file};
use crate::levels::Severity;
use crate::spec::{Axis, FilterSpec};

/// Logging-library frames between a user's call and the gate.
pub const CALLER_SKIP_FRAMES: usize = 2;

/// What a logging call asks to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// A message at a severity, filtered on the log axis.
    Level(Severity),
    /// A trace message at a depth, filtered on the trace axis.
    Trace(i32),
}

impl Request {
    /// Returns the axis whose rules decide this request.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Level(_) => Axis::Log,
            Self::Trace(_) => Axis::Trace,
        }
    }

    /// Returns the value compared against rule thresholds.
    #[must_use]
    pub const fn threshold_value(self) -> i32 {
        match self {
            Self::Level(severity) => severity.number(),
            Self::Trace(depth) => depth,
        }
    }
}

impl fmt::Display for Request {
    /// Renders the level label, e.g. `WARN` or `TRACE(3)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(severity) => f.pad(severity.name()),
            Self::Trace(depth) => f.pad(&format!("{}({depth})", Severity::Trace.name())),
        }
    }
}

/// The gate's verdict together with the resolved caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision<'a> {
    /// Whether the message should be emitted.
    pub emit: bool,
    /// Caller reduced to `<parent-dir>/<file>`; empty when unresolved.
    pub location: Cow<'a, str>,
    /// Caller line; zero when unresolved.
    pub line: u32,
    /// Caller function or module path; empty when unknown.
    pub function: &'a str,
}

impl Decision<'_> {
    const fn rejected() -> Self {
        Self {
            emit: false,
            location: Cow::Borrowed(""),
            line: 0,
            function: "",
        }
    }

    /// Renders the `[<location>:<line> (<function>)] ` decoration.
    #[must_use]
    pub fn caller_info(&self) -> String {
        format!("[{}:{} ({})] ", self.location, self.line, self.function)
    }
}

/// Holds the compiled rules of both axes and decides every logging call.
#[derive(Clone, Debug, Default)]
pub struct DispatchGate {
    log: FilterSpec,
    trace: FilterSpec,
}

impl DispatchGate {
    /// Creates a gate from compiled log-axis and trace-axis rules.
    #[must_use]
    pub const fn new(log: FilterSpec, trace: FilterSpec) -> Self {
        Self { log, trace }
    }

    /// Compiles both axes from their specification strings with the default
    /// global thresholds (`INFO`, tracing disabled).
    #[must_use]
    pub fn from_specs(log_spec: &str, trace_spec: &str) -> Self {
        Self::new(
            FilterSpec::parse(log_spec, Axis::Log),
            FilterSpec::parse(trace_spec, Axis::Trace),
        )
    }

    /// Returns the rules for `axis`.
    #[must_use]
    pub const fn spec(&self, axis: Axis) -> &FilterSpec {
        match axis {
            Axis::Log => &self.log,
            Axis::Trace => &self.trace,
        }
    }

    /// Reports whether any trace message could pass.
    #[must_use]
    pub fn trace_enabled(&self) -> bool {
        !self.trace.is_empty()
    }

    /// Decides whether the call described by `request` is emitted.
    ///
    /// An axis without rules rejects before the caller is resolved, as
    /// does a trace request below depth zero.
    /// Otherwise the caller is reduced to `<parent-dir>/<file>` and the
    /// axis's rules are queried with it.
    ///
    /// # Examples
    ///
    /// ```
    /// use filterlog::{CallSite, DispatchGate, Request, Severity};
    ///
    /// let gate = DispatchGate::from_specs("client.rs=ERROR,INFO", "");
    /// let site = CallSite::new("src/net/client.rs", 10, "app::net");
    ///
    /// let decision = gate.should_emit(&site, Request::Level(Severity::Warn));
    /// assert!(!decision.emit);
    /// assert!(!gate.should_emit(&site, Request::Trace(0)).emit);
    /// ```
    #[must_use]
    pub fn should_emit<'r, R>(&self, resolver: &'r R, request: Request) -> Decision<'r>
    where
        R: ResolveCaller + ?Sized,
    {
        let spec = self.spec(request.axis());
        if spec.is_empty() || matches!(request, Request::Trace(depth) if depth < 0) {
            return Decision::rejected();
        }

        let Some(caller) = resolver.resolve_caller(CALLER_SKIP_FRAMES) else {
            return Decision {
                emit: spec.match_any("", request.threshold_value()),
                ..Decision::rejected()
            };
        };
        let location = module_and_file(caller.file);
        Decision {
            emit: spec.match_any(&location, request.threshold_value()),
            location,
            line: caller.line,
            function: caller.function,
        }
    }
}

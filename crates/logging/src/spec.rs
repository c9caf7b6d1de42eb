//! crates/logging/src/spec.rs
//! Ordered filter rules compiled from a specification string.

use crate::filter::Filter;
use crate::levels::{Severity, TRACE_DISABLED};

/// The two independent filtering axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Severity filtering; thresholds are [`Severity`] names.
    Log,
    /// Trace-depth filtering; thresholds are integers.
    Trace,
}

impl Axis {
    /// Parses a threshold token for this axis.
    ///
    /// The trace axis accepts any integer. The log axis accepts severity names
    /// case-insensitively, except `TRACE`.
    fn parse_threshold(self, token: &str) -> Option<i32> {
        match self {
            Self::Trace => token.parse().ok(),
            Self::Log => Severity::parse(token)
                .filter(|severity| severity.is_log_threshold())
                .map(Severity::number),
        }
    }

    /// Threshold used when a specification names no global level.
    #[must_use]
    pub const fn default_threshold(self) -> i32 {
        match self {
            Self::Log => Severity::Info.number(),
            Self::Trace => TRACE_DISABLED,
        }
    }
}

/// Ordered rules for one axis, evaluated first-matching-pattern-wins.
///
/// The global rule, when present, is always last so every patterned rule gets
/// a chance to match first. A spec without rules rejects every query, which
/// gives disabled tracing a constant-time exit.
///
/// # Examples
///
/// ```
/// use filterlog::{Axis, FilterSpec, Severity};
///
/// let spec = FilterSpec::from_spec_string("client.rs=ERROR,INFO", Axis::Log, Severity::Info.number());
/// assert!(!spec.match_any("net/client.rs", Severity::Warn.number()));
/// assert!(spec.match_any("net/server.rs", Severity::Warn.number()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FilterSpec {
    rules: Vec<Filter>,
}

impl FilterSpec {
    /// Creates a spec from rules in evaluation order.
    #[must_use]
    pub const fn from_rules(rules: Vec<Filter>) -> Self {
        Self { rules }
    }

    /// Compiles a specification string of the form
    /// `token(,token)*` where each token is `level` or `pattern=level`.
    ///
    /// Malformed tokens are skipped. The last valid global token replaces
    /// `default_global`, and the resulting global rule is appended after all
    /// patterned rules. On the trace axis a global threshold of
    /// [`TRACE_DISABLED`] with no patterned rules yields an empty spec.
    #[must_use]
    pub fn from_spec_string(spec: &str, axis: Axis, default_global: i32) -> Self {
        let mut global = default_global;
        let mut rules = Vec::new();

        for token in spec.split(',') {
            let mut parts = token.split('=');
            let (pattern, level) = match (parts.next(), parts.next(), parts.next()) {
                (Some(level), None, None) => ("", level),
                (Some(pattern), Some(level), None) => (pattern, level),
                _ => continue,
            };
            let Some(threshold) = axis.parse_threshold(level) else {
                continue;
            };
            if pattern.is_empty() {
                global = threshold;
            } else {
                rules.push(Filter::new(pattern, threshold));
            }
        }

        if axis == Axis::Log || global != TRACE_DISABLED || !rules.is_empty() {
            rules.push(Filter::global(global));
        }

        Self { rules }
    }

    /// Compiles `spec` with the axis's default global threshold.
    #[must_use]
    pub fn parse(spec: &str, axis: Axis) -> Self {
        Self::from_spec_string(spec, axis, axis.default_threshold())
    }

    /// Decides whether a message at `level` from `file` passes.
    ///
    /// Returns the verdict of the first rule whose pattern matches, even when
    /// that rule's threshold rejects the message. No matching rule, or no
    /// rules at all, means reject.
    #[must_use]
    pub fn match_any(&self, file: &str, level: i32) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        self.rules
            .iter()
            .map(|rule| rule.matches(file, level))
            .find(|outcome| outcome.pattern_matched)
            .is_some_and(|outcome| outcome.should_log)
    }

    /// Reports whether the spec has no rules and rejects everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Filter] {
        &self.rules
    }
}

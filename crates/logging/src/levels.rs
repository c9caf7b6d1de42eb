//! crates/logging/src/levels.rs
//! Severity levels and trace depths.

use std::fmt;
use std::str::FromStr;

/// Trace depth that disables trace output when used as a threshold.
pub const TRACE_DISABLED: i32 = -1;

/// Ordered log severity.
///
/// Lower numeric values are more urgent. A message passes a threshold when its
/// severity is at or below it, so a threshold of [`Severity::Warn`] admits
/// `CRITICAL`, `ERROR` and `WARN` messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[repr(u8)]
pub enum Severity {
    /// No output. Only meaningful as a threshold.
    None = 0,
    /// Unrecoverable conditions.
    Critical = 1,
    /// Failed operations.
    Error = 2,
    /// Unexpected but handled conditions.
    Warn = 3,
    /// Normal operational messages.
    Info = 4,
    /// Developer diagnostics.
    Debug = 5,
    /// Label of trace output. Never accepted as a log-level threshold.
    Trace = 6,
}

const NAMES: [(Severity, &str); 7] = [
    (Severity::None, "NONE"),
    (Severity::Critical, "CRITICAL"),
    (Severity::Error, "ERROR"),
    (Severity::Warn, "WARN"),
    (Severity::Info, "INFO"),
    (Severity::Debug, "DEBUG"),
    (Severity::Trace, "TRACE"),
];

impl Severity {
    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        NAMES[self as usize].1
    }

    /// Looks up a severity by name, ignoring ASCII case.
    ///
    /// Returns `None` for unknown names; callers decide whether to ignore
    /// the input.
    ///
    /// # Examples
    ///
    /// ```
    /// use filterlog::Severity;
    ///
    /// assert_eq!(Severity::parse("warn"), Some(Severity::Warn));
    /// assert_eq!(Severity::parse("verbose"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(_, candidate)| candidate.eq_ignore_ascii_case(name))
            .map(|(severity, _)| *severity)
    }

    /// Returns the severity with the given numeric value.
    #[must_use]
    pub const fn from_number(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Critical),
            2 => Some(Self::Error),
            3 => Some(Self::Warn),
            4 => Some(Self::Info),
            5 => Some(Self::Debug),
            6 => Some(Self::Trace),
            _ => None,
        }
    }

    /// Returns the numeric value used for threshold comparisons.
    #[must_use]
    pub const fn number(self) -> i32 {
        self as i32
    }

    /// Reports whether users may select this severity as a log threshold.
    #[must_use]
    pub const fn is_log_threshold(self) -> bool {
        !matches!(self, Self::Trace)
    }

    /// Severities that messages can be emitted at, most urgent first.
    pub const EMITTABLE: [Self; 5] = [
        Self::Critical,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
    ];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Error returned by [`Severity::from_str`] for unknown names.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity name '{0}'")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownSeverity(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_parse() {
        for (severity, name) in NAMES {
            assert_eq!(severity.name(), name);
            assert_eq!(Severity::parse(name), Some(severity));
            assert_eq!(Severity::from_number(severity.number()), Some(severity));
        }
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!(Severity::parse("critical"), Some(Severity::Critical));
        assert_eq!(Severity::parse("Debug"), Some(Severity::Debug));
        assert_eq!(Severity::parse(""), None);
        assert_eq!(Severity::parse(" INFO"), None);
    }

    #[test]
    fn lower_number_is_more_urgent() {
        assert!(Severity::Critical < Severity::Error);
        assert!(Severity::Warn.number() < Severity::Info.number());
        assert_eq!(Severity::None.number(), 0);
        assert_eq!(Severity::Trace.number(), 6);
    }

    #[test]
    fn trace_is_not_a_log_threshold() {
        assert!(!Severity::Trace.is_log_threshold());
        assert!(Severity::None.is_log_threshold());
        assert!(Severity::EMITTABLE.iter().all(|s| s.is_log_threshold()));
    }

    #[test]
    fn from_str_reports_unknown_names() {
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        let err = "loud".parse::<Severity>().unwrap_err();
        assert_eq!(err.to_string(), "unknown severity name 'loud'");
    }

    #[test]
    fn display_honours_padding() {
        assert_eq!(format!("{:<9}|", Severity::Warn), "WARN     |");
        assert_eq!(Severity::from_number(7), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_upper_case_names() {
        let json = serde_json::to_string(&Severity::Warn).unwrap();
        assert_eq!(json, "\"WARN\"");
        let decoded: Severity = serde_json::from_str("\"DEBUG\"").unwrap();
        assert_eq!(decoded, Severity::Debug);
    }
}

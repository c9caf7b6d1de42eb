//! crates/logging/src/time_format.rs
//! Timestamp formats for log lines.

use time::OffsetDateTime;
use time::format_description::{self, BorrowedFormatItem, OwnedFormatItem};
use time::macros::format_description;

use crate::diagnostics::ConfigDiagnostic;

const ANSIC: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second] [year]"
);
const UNIX_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
);
const RUBY_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short] [month repr:short] [day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
);
const RFC822: &[BorrowedFormatItem<'static>] = format_description!(
    "[day] [month repr:short] [year repr:last_two] [hour]:[minute] [offset_hour sign:mandatory][offset_minute]"
);
const RFC1123: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute]"
);
const RFC3339: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);
const RFC3339_NANO: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9][offset_hour sign:mandatory]:[offset_minute]"
);
const KITCHEN: &[BorrowedFormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute][period]");

const NAMED: [(&str, &[BorrowedFormatItem<'static>]); 10] = [
    ("ANSIC", ANSIC),
    ("UNIXDATE", UNIX_DATE),
    ("RUBYDATE", RUBY_DATE),
    ("RFC822", RFC822),
    ("RFC822Z", RFC822),
    ("RFC1123", RFC1123),
    ("RFC1123Z", RFC1123),
    ("RFC3339", RFC3339),
    ("RFC3339NANO", RFC3339_NANO),
    ("KITCHEN", KITCHEN),
];

/// How the timestamp prefix of a log line is rendered.
#[derive(Clone, Debug)]
pub enum TimeFormat {
    /// No timestamp and no separating space.
    Disabled,
    /// One of the built-in named formats.
    Named(&'static [BorrowedFormatItem<'static>]),
    /// A user-supplied format description.
    Custom(OwnedFormatItem),
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self::Named(RFC3339)
    }
}

impl TimeFormat {
    /// Resolves a `TIME_FORMAT` value.
    ///
    /// Named formats are matched case-insensitively. Any other non-empty value
    /// is parsed as a `time` format description; when that fails the default
    /// format is used and a diagnostic is returned.
    #[must_use]
    pub fn resolve(value: &str) -> (Self, Option<ConfigDiagnostic>) {
        if value.is_empty() {
            return (Self::default(), None);
        }
        if let Some((_, items)) = NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
        {
            return (Self::Named(items), None);
        }
        match format_description::parse_owned::<2>(value) {
            Ok(items) => (Self::Custom(items), None),
            Err(err) => (
                Self::default(),
                Some(ConfigDiagnostic::InvalidTimeFormat {
                    format: value.to_owned(),
                    reason: err.to_string(),
                }),
            ),
        }
    }

    /// Reports whether timestamps are rendered at all.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Renders `at` followed by a separating space; empty when disabled or
    /// when `at` cannot be represented in the format.
    #[must_use]
    pub fn prefix(&self, at: OffsetDateTime) -> String {
        let rendered = match self {
            Self::Disabled => return String::new(),
            Self::Named(items) => at.format(*items),
            Self::Custom(items) => at.format(items),
        };
        rendered
            .map(|mut text| {
                text.push(' ');
                text
            })
            .unwrap_or_default()
    }
}

/// Current time in the local offset, or UTC when the offset is unknown.
#[must_use]
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

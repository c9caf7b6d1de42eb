//! crates/logging/src/diagnostics.rs
//! Non-fatal configuration problems and their reporting.

use std::io::Write;

/// A configuration problem that was skipped during initialization.
///
/// None of these abort initialization. The offending entry is ignored and the
/// previous or default value stays in effect.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigDiagnostic {
    /// A config-file line without `=`.
    #[error("malformed line in config file {origin}:{line}: {content:?}")]
    MalformedLine {
        /// Config file the line came from.
        origin: String,
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        content: String,
    },
    /// A config file tried to set the config-file path itself.
    #[error("ignoring attempt to change config file in config file {origin}:{line}")]
    ConfigFileRedirect {
        /// Config file the line came from.
        origin: String,
        /// 1-based line number.
        line: usize,
    },
    /// A config-file line naming an unrecognized setting.
    #[error("unknown setting name in config file {origin}:{line}: {name}")]
    UnknownSetting {
        /// Config file the line came from.
        origin: String,
        /// 1-based line number.
        line: usize,
        /// The unrecognized name, without any priority marker.
        name: String,
    },
    /// A literal time format that could not be parsed.
    #[error("invalid time format {format:?}, using the default: {reason}")]
    InvalidTimeFormat {
        /// The rejected format text.
        format: String,
        /// Parser explanation.
        reason: String,
    },
}

/// Writes each diagnostic to `stream` as a `WARN` line.
///
/// Write failures are ignored. With the `tracing` feature the diagnostics are
/// also emitted as `tracing` warnings.
pub fn report<W>(diagnostics: &[ConfigDiagnostic], stream: &mut W)
where
    W: Write + ?Sized,
{
    for diagnostic in diagnostics {
        let _ = writeln!(stream, "WARN: filterlog - {diagnostic}");
        #[cfg(feature = "tracing")]
        tracing::warn!(target: "filterlog::config", "{diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_prefixes_each_diagnostic() {
        let diagnostics = [
            ConfigDiagnostic::MalformedLine {
                origin: "/etc/app/app.conf".into(),
                line: 3,
                content: "LOG_LEVEL".into(),
            },
            ConfigDiagnostic::ConfigFileRedirect {
                origin: "/etc/app/app.conf".into(),
                line: 4,
            },
        ];
        let mut out: Vec<u8> = Vec::new();
        report(&diagnostics, &mut out);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "WARN: filterlog - malformed line in config file /etc/app/app.conf:3: \"LOG_LEVEL\"",
                "WARN: filterlog - ignoring attempt to change config file in config file /etc/app/app.conf:4",
            ]
        );
    }

    #[test]
    fn unknown_setting_names_the_setting() {
        let diagnostic = ConfigDiagnostic::UnknownSetting {
            origin: "app.conf".into(),
            line: 9,
            name: "LOG_COLOR".into(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "unknown setting name in config file app.conf:9: LOG_COLOR"
        );
    }
}

//! crates/logging/src/config.rs
//! Raw configuration values from the environment and an optional config file.

use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::ConfigDiagnostic;

/// Marker that lets a config-file line override an environment value.
pub const PRIORITY_MARKER: char = '!';

/// A recognized configuration setting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Setting {
    /// Log-level filter specification.
    LogLevel,
    /// Trace-level filter specification.
    TraceLevel,
    /// Named or literal timestamp format.
    TimeFormat,
    /// Path of a file that receives a copy of every line.
    LogFile,
    /// Path of the config file. Cannot be set from a config file.
    ConfFile,
    /// `STDOUT`, `STDERR` or `NONE`.
    LogStream,
    /// Boolean: omit timestamps.
    LogNoTime,
    /// Boolean: decorate lines with caller information.
    CallerInfo,
}

impl Setting {
    /// Every setting, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::LogLevel,
        Self::TraceLevel,
        Self::TimeFormat,
        Self::LogFile,
        Self::ConfFile,
        Self::LogStream,
        Self::LogNoTime,
        Self::CallerInfo,
    ];

    /// Returns the unprefixed variable name, e.g. `LOG_LEVEL`.
    #[must_use]
    pub const fn base_name(self) -> &'static str {
        match self {
            Self::LogLevel => "LOG_LEVEL",
            Self::TraceLevel => "TRACE_LEVEL",
            Self::TimeFormat => "TIME_FORMAT",
            Self::LogFile => "LOG_FILE",
            Self::ConfFile => "CONF_FILE",
            Self::LogStream => "LOG_STREAM",
            Self::LogNoTime => "LOG_NOTIME",
            Self::CallerInfo => "CALLER_INFO",
        }
    }

    /// Returns the environment variable and config-file key for `prefix`.
    #[must_use]
    pub fn key(self, prefix: &str) -> String {
        format!("{prefix}{}", self.base_name())
    }

    /// Resolves a prefixed key back to its setting.
    #[must_use]
    pub fn from_key(key: &str, prefix: &str) -> Option<Self> {
        let name = key.strip_prefix(prefix)?;
        Self::ALL
            .into_iter()
            .find(|setting| setting.base_name() == name)
    }
}

/// Configuration values as supplied by the user, one string per setting.
///
/// Empty strings mean "unset". Values are interpreted only when compiled into
/// [`Settings`](crate::Settings).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnvConfig {
    /// Log-level filter specification.
    pub log_level: String,
    /// Trace-level filter specification.
    pub trace_level: String,
    /// Named or literal timestamp format.
    pub time_format: String,
    /// Secondary log file path.
    pub log_file: String,
    /// Config file path.
    pub conf_file: String,
    /// Upper-cased stream selector.
    pub log_stream: String,
    /// Boolean-ish flag disabling timestamps.
    pub log_no_time: String,
    /// Boolean-ish flag enabling caller information.
    pub caller_info: String,
}

impl EnvConfig {
    /// Reads every setting from the process environment without a prefix.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_prefix("")
    }

    /// Reads every setting from the process environment using `prefix`.
    ///
    /// Variables that are unset or not valid Unicode read as empty.
    #[must_use]
    pub fn from_env_with_prefix(prefix: &str) -> Self {
        Self::from_lookup(prefix, |key| env::var(key).ok())
    }

    /// Reads every setting through `lookup`, which receives prefixed keys.
    #[must_use]
    pub fn from_lookup<F>(prefix: &str, mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for setting in Setting::ALL {
            if let Some(value) = lookup(&setting.key(prefix)) {
                config.set(setting, value);
            }
        }
        config
    }

    /// Returns the value of `setting`.
    #[must_use]
    pub fn get(&self, setting: Setting) -> &str {
        match setting {
            Setting::LogLevel => &self.log_level,
            Setting::TraceLevel => &self.trace_level,
            Setting::TimeFormat => &self.time_format,
            Setting::LogFile => &self.log_file,
            Setting::ConfFile => &self.conf_file,
            Setting::LogStream => &self.log_stream,
            Setting::LogNoTime => &self.log_no_time,
            Setting::CallerInfo => &self.caller_info,
        }
    }

    fn slot(&mut self, setting: Setting) -> &mut String {
        match setting {
            Setting::LogLevel => &mut self.log_level,
            Setting::TraceLevel => &mut self.trace_level,
            Setting::TimeFormat => &mut self.time_format,
            Setting::LogFile => &mut self.log_file,
            Setting::ConfFile => &mut self.conf_file,
            Setting::LogStream => &mut self.log_stream,
            Setting::LogNoTime => &mut self.log_no_time,
            Setting::CallerInfo => &mut self.caller_info,
        }
    }

    /// Stores `value` for `setting`. Stream selectors are upper-cased.
    pub fn set(&mut self, setting: Setting, value: impl Into<String>) {
        let mut value = value.into();
        if setting == Setting::LogStream {
            value.make_ascii_uppercase();
        }
        *self.slot(setting) = value;
    }

    /// Builder-style variant of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, setting: Setting, value: impl Into<String>) -> Self {
        self.set(setting, value);
        self
    }

    /// Applies config-file entries in file order.
    ///
    /// An entry replaces the current value only when the current value is
    /// empty or the entry carries the priority marker.
    #[must_use]
    pub fn merge(mut self, file: &ConfigFile) -> Self {
        for entry in &file.entries {
            if entry.priority || self.get(entry.setting).is_empty() {
                self.set(entry.setting, entry.value.clone());
            }
        }
        self
    }

    /// Returns the config-file path to read: the configured one, or the
    /// default location for `app_name`.
    #[must_use]
    pub fn config_path(&self, app_name: &str) -> PathBuf {
        if self.conf_file.is_empty() {
            default_config_path(app_name)
        } else {
            PathBuf::from(&self.conf_file)
        }
    }
}

/// One accepted `NAME=VALUE` line of a config file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigEntry {
    /// The setting being assigned.
    pub setting: Setting,
    /// The trimmed value.
    pub value: String,
    /// Whether the name carried the priority marker.
    pub priority: bool,
    /// 1-based line number.
    pub line: usize,
}

/// The accepted entries of a config file, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigFile {
    origin: String,
    entries: Vec<ConfigEntry>,
}

impl ConfigFile {
    /// Parses config-file text.
    ///
    /// `origin` names the file in diagnostics. Blank lines are ignored;
    /// malformed lines, unknown names and attempts to set the config-file
    /// path are reported and skipped without affecting later lines.
    #[must_use]
    pub fn parse(origin: &str, prefix: &str, text: &str) -> (Self, Vec<ConfigDiagnostic>) {
        let mut entries = Vec::new();
        let mut diagnostics = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Some((name, value)) = trimmed.split_once('=') else {
                diagnostics.push(ConfigDiagnostic::MalformedLine {
                    origin: origin.to_owned(),
                    line,
                    content: trimmed.to_owned(),
                });
                continue;
            };

            let name = name.trim();
            let (name, priority) = match name.strip_prefix(PRIORITY_MARKER) {
                Some(rest) => (rest, true),
                None => (name, false),
            };

            match Setting::from_key(name, prefix) {
                Some(Setting::ConfFile) => {
                    diagnostics.push(ConfigDiagnostic::ConfigFileRedirect {
                        origin: origin.to_owned(),
                        line,
                    });
                }
                Some(setting) => entries.push(ConfigEntry {
                    setting,
                    value: value.trim().to_owned(),
                    priority,
                    line,
                }),
                None => diagnostics.push(ConfigDiagnostic::UnknownSetting {
                    origin: origin.to_owned(),
                    line,
                    name: name.to_owned(),
                }),
            }
        }

        (
            Self {
                origin: origin.to_owned(),
                entries,
            },
            diagnostics,
        )
    }

    /// Reads and parses the config file at `path`.
    ///
    /// Returns `None` when the file cannot be read; a missing config file is
    /// not an error.
    #[must_use]
    pub fn load(path: &Path, prefix: &str) -> Option<(Self, Vec<ConfigDiagnostic>)> {
        let bytes = fs::read(path).ok()?;
        let text = String::from_utf8_lossy(&bytes);
        Some(Self::parse(&path.display().to_string(), prefix, &text))
    }

    /// Returns the file the entries came from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the accepted entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }
}

/// Interprets a boolean-ish setting value.
///
/// `Y`, `YES`, `T`, `TRUE` and `1` are true regardless of case; everything
/// else, including the empty string, is false.
///
/// # Examples
///
/// ```
/// use filterlog::is_true_bool_string;
///
/// assert!(is_true_bool_string("yes"));
/// assert!(!is_true_bool_string("on"));
/// ```
#[must_use]
pub fn is_true_bool_string(value: &str) -> bool {
    ["Y", "YES", "T", "TRUE", "1"]
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(value))
}

/// Returns `/etc/<app_name>/<app_name>.conf`.
#[must_use]
pub fn default_config_path(app_name: &str) -> PathBuf {
    Path::new("/etc")
        .join(app_name)
        .join(format!("{app_name}.conf"))
}

/// Returns the base name of the running executable, extension included.
#[must_use]
pub fn app_name() -> String {
    base_name_of(env::args_os().next().as_deref())
}

fn base_name_of(arg0: Option<&OsStr>) -> String {
    arg0.and_then(|arg0| Path::new(arg0).file_name())
        .map_or_else(
            || String::from("filterlog"),
            |name| name.to_string_lossy().into_owned(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn parse(text: &str) -> (ConfigFile, Vec<ConfigDiagnostic>) {
        ConfigFile::parse("test.conf", "", text)
    }

    #[test]
    fn lookup_fills_each_setting() {
        let config = EnvConfig::from_lookup(
            "",
            lookup_from(&[("LOG_LEVEL", "DEBUG"), ("LOG_STREAM", "stdout")]),
        );
        assert_eq!(config.log_level, "DEBUG");
        assert_eq!(config.log_stream, "STDOUT");
        assert!(config.trace_level.is_empty());
    }

    #[test]
    fn lookup_honours_prefix() {
        let config = EnvConfig::from_lookup(
            "APP_",
            lookup_from(&[("APP_TRACE_LEVEL", "2"), ("TRACE_LEVEL", "9")]),
        );
        assert_eq!(config.trace_level, "2");
    }

    #[test]
    fn environment_value_beats_plain_file_line() {
        let env = EnvConfig::default().with(Setting::LogLevel, "DEBUG");
        let (file, diagnostics) = parse("LOG_LEVEL=INFO\n");
        assert!(diagnostics.is_empty());
        assert_eq!(env.merge(&file).log_level, "DEBUG");
    }

    #[test]
    fn priority_line_beats_environment() {
        let env = EnvConfig::default().with(Setting::LogLevel, "DEBUG");
        let (file, _) = parse("!LOG_LEVEL=INFO\n");
        assert_eq!(env.merge(&file).log_level, "INFO");
    }

    #[test]
    fn file_fills_unset_values() {
        let (file, _) = parse("TRACE_LEVEL = 3\nLOG_STream=x\nLOG_STREAM = stdout\n");
        let merged = EnvConfig::default().merge(&file);
        assert_eq!(merged.trace_level, "3");
        assert_eq!(merged.log_stream, "STDOUT");
    }

    #[test]
    fn earlier_file_line_is_kept_over_later_plain_line() {
        let (file, _) = parse("LOG_LEVEL=WARN\nLOG_LEVEL=ERROR\n");
        assert_eq!(EnvConfig::default().merge(&file).log_level, "WARN");

        let (file, _) = parse("LOG_LEVEL=WARN\n!LOG_LEVEL=ERROR\n");
        assert_eq!(EnvConfig::default().merge(&file).log_level, "ERROR");
    }

    #[test]
    fn malformed_line_does_not_stop_parsing() {
        let (file, diagnostics) = parse("LOG_LEVEL\n\nCALLER_INFO=yes\n");
        assert_eq!(
            diagnostics,
            vec![ConfigDiagnostic::MalformedLine {
                origin: "test.conf".into(),
                line: 1,
                content: "LOG_LEVEL".into(),
            }]
        );
        assert_eq!(file.entries().len(), 1);
        assert_eq!(file.entries()[0].setting, Setting::CallerInfo);
        assert_eq!(file.entries()[0].line, 3);
    }

    #[test]
    fn config_file_cannot_redirect_itself() {
        let (file, diagnostics) = parse("!CONF_FILE=/tmp/other.conf\n");
        assert!(file.entries().is_empty());
        assert_eq!(
            diagnostics,
            vec![ConfigDiagnostic::ConfigFileRedirect {
                origin: "test.conf".into(),
                line: 1,
            }]
        );
    }

    #[test]
    fn unknown_names_are_reported() {
        let (file, diagnostics) = parse("LOG_COLOUR=red\n=x\n");
        assert!(file.entries().is_empty());
        assert!(matches!(
            &diagnostics[..],
            [
                ConfigDiagnostic::UnknownSetting { name, line: 1, .. },
                ConfigDiagnostic::UnknownSetting { line: 2, .. },
            ] if name == "LOG_COLOUR"
        ));
    }

    #[test]
    fn values_may_contain_equals_signs() {
        let (file, _) = parse("LOG_LEVEL=client.rs=ERROR,INFO\n");
        assert_eq!(file.entries()[0].value, "client.rs=ERROR,INFO");
    }

    #[test]
    fn missing_file_is_tolerated() {
        assert!(ConfigFile::load(Path::new("/nonexistent/filterlog/app.conf"), "").is_none());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let (_dir, path) = test_support::temp_config("!LOG_STREAM=none\n");
        let (file, diagnostics) = ConfigFile::load(&path, "").expect("config file exists");
        assert!(diagnostics.is_empty());
        assert_eq!(file.origin(), path.display().to_string());
        assert_eq!(
            EnvConfig::default()
                .with(Setting::LogStream, "stdout")
                .merge(&file)
                .log_stream,
            "NONE"
        );
    }

    #[test]
    fn bool_recognizer() {
        for truthy in ["y", "Y", "yes", "YES", "Yes", "true", "TRUE", "t", "1"] {
            assert!(is_true_bool_string(truthy), "{truthy}");
        }
        for falsy in ["", "n", "no", "false", "0", "on", "2", " yes"] {
            assert!(!is_true_bool_string(falsy), "{falsy}");
        }
    }

    #[test]
    fn default_path_uses_app_name() {
        assert_eq!(
            default_config_path("myapp"),
            PathBuf::from("/etc/myapp/myapp.conf")
        );
        let config = EnvConfig::default().with(Setting::ConfFile, "/tmp/x.conf");
        assert_eq!(config.config_path("myapp"), PathBuf::from("/tmp/x.conf"));
    }

    #[test]
    fn app_name_keeps_the_extension() {
        let name = base_name_of(Some(OsStr::new("/usr/local/bin/svc.bin")));
        assert_eq!(name, "svc.bin");
        assert_eq!(
            default_config_path(&name),
            PathBuf::from("/etc/svc.bin/svc.bin.conf")
        );
        assert_eq!(base_name_of(None), "filterlog");
    }

    #[test]
    fn setting_keys_round_trip() {
        for setting in Setting::ALL {
            assert_eq!(Setting::from_key(&setting.key("P_"), "P_"), Some(setting));
            assert_eq!(Setting::from_key(setting.base_name(), "P_"), None);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn env_config_serde_roundtrip() {
        let config = EnvConfig::default()
            .with(Setting::LogLevel, "WARN")
            .with(Setting::CallerInfo, "yes");
        let json = serde_json::to_string(&config).unwrap();
        let decoded: EnvConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, config);
        let partial: EnvConfig = serde_json::from_str(r#"{"trace_level":"2"}"#).unwrap();
        assert_eq!(partial.trace_level, "2");
    }
}

use crate::LineSink;

/// Standard stream selected for primary log output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StreamTarget {
    /// Write to standard output.
    Stdout,
    /// Write to standard error.
    #[default]
    Stderr,
    /// Do not write to a standard stream at all.
    Disabled,
}

impl StreamTarget {
    /// Interprets a stream selector.
    ///
    /// `STDOUT` and `NONE` are recognised case-insensitively; every other
    /// value, including the empty string, selects standard error.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging_sink::StreamTarget;
    ///
    /// assert_eq!(StreamTarget::from_selector("stdout"), StreamTarget::Stdout);
    /// assert_eq!(StreamTarget::from_selector("NONE"), StreamTarget::Disabled);
    /// assert_eq!(StreamTarget::from_selector("bogus"), StreamTarget::Stderr);
    /// ```
    #[must_use]
    pub fn from_selector(selector: &str) -> Self {
        if selector.eq_ignore_ascii_case("STDOUT") {
            Self::Stdout
        } else if selector.eq_ignore_ascii_case("NONE") {
            Self::Disabled
        } else {
            Self::Stderr
        }
    }

    /// Opens the sink for this target, or `None` when output is disabled.
    #[must_use]
    pub fn open(self) -> Option<LineSink> {
        match self {
            Self::Stdout => Some(LineSink::stdout()),
            Self::Stderr => Some(LineSink::stderr()),
            Self::Disabled => None,
        }
    }
}

//! crates/logging/src/filter.rs
//! A single file-pattern rule with its threshold.

use globset::{GlobBuilder, GlobMatcher};

/// Outcome of testing one [`Filter`] against a call site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterMatch {
    /// The rule's pattern matched the file name.
    pub pattern_matched: bool,
    /// The message passes the rule's threshold. Always `false` when the
    /// pattern did not match.
    pub should_log: bool,
}

#[derive(Clone, Debug)]
enum FileMatcher {
    Any,
    Glob(GlobMatcher),
    // Unparsable globs keep their slot in the rule list but never match.
    Invalid,
}

/// A rule pairing an optional shell glob over the caller's file base name
/// with a severity or trace-depth threshold.
///
/// An empty pattern matches every file; such a rule is the *global* rule of a
/// [`FilterSpec`](crate::FilterSpec).
///
/// # Examples
///
/// ```
/// use filterlog::{Filter, Severity};
///
/// let rule = Filter::new("client*.rs", Severity::Error.number());
/// let outcome = rule.matches("net/client_pool.rs", Severity::Warn.number());
/// assert!(outcome.pattern_matched);
/// assert!(!outcome.should_log);
/// ```
#[derive(Clone, Debug)]
pub struct Filter {
    pattern: String,
    matcher: FileMatcher,
    threshold: i32,
}

impl Filter {
    /// Creates a rule for `pattern`. An empty pattern creates a global rule.
    #[must_use]
    pub fn new(pattern: impl Into<String>, threshold: i32) -> Self {
        let pattern = pattern.into();
        let matcher = if pattern.is_empty() {
            FileMatcher::Any
        } else {
            GlobBuilder::new(&pattern)
                .literal_separator(true)
                .backslash_escape(true)
                .build()
                .map_or(FileMatcher::Invalid, |glob| {
                    FileMatcher::Glob(glob.compile_matcher())
                })
        };
        Self {
            pattern,
            matcher,
            threshold,
        }
    }

    /// Creates a rule that matches every file.
    #[must_use]
    pub fn global(threshold: i32) -> Self {
        Self::new(String::new(), threshold)
    }

    /// Returns the pattern text; empty for the global rule.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the threshold messages are compared against.
    #[must_use]
    pub const fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Reports whether this rule matches every file.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        matches!(self.matcher, FileMatcher::Any)
    }

    /// Tests the rule against `file` at `level`.
    ///
    /// Only the base name of `file` is matched against the pattern. A pattern
    /// match with a failing threshold still reports `pattern_matched`, which
    /// ends rule evaluation in [`FilterSpec::match_any`](crate::FilterSpec::match_any).
    #[must_use]
    pub fn matches(&self, file: &str, level: i32) -> FilterMatch {
        let pattern_matched = match &self.matcher {
            FileMatcher::Any => true,
            FileMatcher::Glob(glob) => glob.is_match(base_name(file)),
            FileMatcher::Invalid => false,
        };
        FilterMatch {
            pattern_matched,
            should_log: pattern_matched && level <= self.threshold,
        }
    }
}

/// Strips every directory component from `path`, accepting `/` and `\`.
#[must_use]
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

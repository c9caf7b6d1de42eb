//! crates/logging/src/caller.rs
//! Identity of the code that issued a logging call.

use std::borrow::Cow;
use std::panic::Location;

/// Source location and enclosing function of a logging call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caller<'a> {
    /// Source file path as recorded by the compiler.
    pub file: &'a str,
    /// 1-based line number.
    pub line: u32,
    /// Enclosing function or module path; empty when unknown.
    pub function: &'a str,
}

impl<'a> Caller<'a> {
    /// Returns the `<parent-dir>/<file>` form used for pattern matching and
    /// display.
    #[must_use]
    pub fn module_and_file(&self) -> Cow<'a, str> {
        module_and_file(self.file)
    }
}

/// Source of caller identity for the dispatch gate.
///
/// `skip_frames` counts the logging-library frames between the user's call
/// and the gate. Resolvers that captured the call site up front ignore it;
/// it exists for resolvers that walk the stack.
pub trait ResolveCaller {
    /// Returns the caller, or `None` when it cannot be determined.
    fn resolve_caller(&self, skip_frames: usize) -> Option<Caller<'_>>;
}

/// A call site captured at compile time by the emission macros.
///
/// # Examples
///
/// ```
/// use filterlog::{CallSite, ResolveCaller};
///
/// let site = CallSite::new("src/net/client.rs", 42, "app::net::client");
/// let caller = site.resolve_caller(0).unwrap();
/// assert_eq!(caller.module_and_file(), "net/client.rs");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallSite {
    file: &'static str,
    line: u32,
    function: &'static str,
}

impl CallSite {
    /// Creates a call site; normally invoked through `file!()`, `line!()` and
    /// `module_path!()`.
    #[must_use]
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }
}

impl ResolveCaller for CallSite {
    fn resolve_caller(&self, _skip_frames: usize) -> Option<Caller<'_>> {
        Some(Caller {
            file: self.file,
            line: self.line,
            function: self.function,
        })
    }
}

impl ResolveCaller for Location<'_> {
    fn resolve_caller(&self, _skip_frames: usize) -> Option<Caller<'_>> {
        Some(Caller {
            file: self.file(),
            line: self.line(),
            function: "",
        })
    }
}

impl<R> ResolveCaller for &R
where
    R: ResolveCaller + ?Sized,
{
    fn resolve_caller(&self, skip_frames: usize) -> Option<Caller<'_>> {
        (**self).resolve_caller(skip_frames)
    }
}

/// Reduces `path` to its last directory component and file name.
///
/// `a/b/c.rs` becomes `b/c.rs`; a bare `c.rs` becomes `/c.rs`. The reduction
/// borrows from `path` unless there is no directory component.
#[must_use]
pub fn module_and_file(path: &str) -> Cow<'_, str> {
    let is_separator = |c: char| c == '/' || c == '\\';
    let Some(file_start) = path.rfind(is_separator) else {
        return Cow::Owned(format!("/{path}"));
    };
    let module_start = path[..file_start]
        .rfind(is_separator)
        .map_or(0, |index| index + 1);
    Cow::Borrowed(&path[module_start..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_keeps_parent_directory() {
        assert_eq!(module_and_file("crates/app/src/net/client.rs"), "net/client.rs");
        assert_eq!(module_and_file("src/main.rs"), "src/main.rs");
        assert_eq!(module_and_file("src\\net\\client.rs"), "net\\client.rs");
    }

    #[test]
    fn reduction_borrows_when_possible() {
        assert!(matches!(module_and_file("a/b/c.rs"), Cow::Borrowed("b/c.rs")));
        assert!(matches!(module_and_file("c.rs"), Cow::Owned(ref s) if s == "/c.rs"));
    }

    #[test]
    fn root_level_file_has_empty_module() {
        assert_eq!(module_and_file("/c.rs"), "/c.rs");
    }

    #[test]
    fn location_resolves_without_function() {
        let location = Location::caller();
        let caller = location.resolve_caller(2).unwrap();
        assert!(caller.file.ends_with("caller.rs"));
        assert_eq!(caller.function, "");
    }

    #[test]
    fn references_forward_to_resolver() {
        let site = CallSite::new("x/y/z.rs", 7, "app::y");
        let by_ref: &dyn ResolveCaller = &site;
        let caller = by_ref.resolve_caller(0).unwrap();
        assert_eq!(caller.line, 7);
        assert_eq!(caller.function, "app::y");
        assert_eq!(caller.module_and_file(), "y/z.rs");
    }
}

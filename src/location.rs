//! Call-site capture for error construction.
//!
//! File and line come from `#[track_caller]` propagation, which is exact and
//! free: every public constructor in this crate is annotated, so the location
//! reported by [`std::panic::Location::caller`] is the application's call
//! site rather than a line inside the library.
//!
//! The name of the calling function has no compile-time equivalent. With the
//! `function-names` feature (enabled by default) the stack is walked with the
//! `backtrace` crate and the frame is identified by its line table: the
//! innermost symbol whose file and line equal the `#[track_caller]` location
//! is the function that contains the call. Inlined frames are counted as
//! logical frames, so inlining of the constructors does not shift the result.
//! Line tables are required (`debug = "line-tables-only"` is enough); without
//! them, without the feature, or when no frame matches, the function name is
//! left empty rather than guessed.
//!
//! Capture never fails: error construction must not itself become a source
//! of errors.

use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
#[cfg(feature = "function-names")]
use std::path::Path;

/// Logical frames inspected before giving up on function-name resolution.
#[cfg(feature = "function-names")]
const MAX_RESOLVED_FRAMES: usize = 128;

/// Snapshot of a single call-stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    file: Cow<'static, str>,
    line: u32,
    function: Cow<'static, str>,
}

impl SourceLocation {
    /// The zero value: empty file, line 0, empty function.
    pub const UNKNOWN: SourceLocation = SourceLocation {
        file: Cow::Borrowed(""),
        line: 0,
        function: Cow::Borrowed(""),
    };

    /// Build a location from explicit parts.
    ///
    /// The function name is reduced to its bare form with [`function_name_of`].
    pub fn new(
        file: impl Into<Cow<'static, str>>,
        line: u32,
        function: impl AsRef<str>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            function: Cow::Owned(function_name_of(function.as_ref()).to_owned()),
        }
    }

    /// Location of the caller, skipping no frames.
    #[track_caller]
    #[inline(never)]
    pub fn caller() -> Self {
        capture_location(0)
    }

    /// Source file path, as the compiler recorded it.
    #[inline]
    pub fn file(&self) -> &str {
        self.file.as_ref()
    }

    /// One-based line number, 0 when unknown.
    #[inline]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Bare name of the enclosing function, empty when unresolved.
    #[inline]
    pub fn function(&self) -> &str {
        self.function.as_ref()
    }

    /// True for [`SourceLocation::UNKNOWN`].
    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.file.is_empty() && self.line == 0
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

impl From<&'static Location<'static>> for SourceLocation {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
            function: Cow::Borrowed(""),
        }
    }
}

/// Capture the location of a frame in the current call sequence.
///
/// `skip = 0` records the frame that `#[track_caller]` attributes the call to:
/// the immediate caller of this function, or the caller of the outermost
/// `#[track_caller]` function in between. Every increment moves one logical
/// frame further up. File, line and function always describe the same frame.
///
/// At `skip = 0` file and line are exact even without debug information; only
/// the function name depends on symbol resolution. A frame above that can
/// only be located by walking the stack, so with `skip > 0` the result is
/// [`SourceLocation::UNKNOWN`] when the frame cannot be resolved.
#[track_caller]
#[inline(never)]
pub fn capture_location(skip: usize) -> SourceLocation {
    let caller = Location::caller();
    match resolve_frame_at(caller, skip) {
        Some(location) => location,
        None if skip == 0 => SourceLocation::from(caller),
        None => SourceLocation::UNKNOWN,
    }
}

/// Walk the stack to the frame holding `caller`, then `skip` logical frames up.
#[cfg(feature = "function-names")]
#[inline(never)]
fn resolve_frame_at(caller: &'static Location<'static>, skip: usize) -> Option<SourceLocation> {
    let mut walk = FrameWalk {
        caller,
        skip,
        index: 0,
        anchor: None,
        found: None,
    };

    backtrace::trace(|frame| {
        let mut resolved = false;
        backtrace::resolve_frame(frame, |symbol| {
            resolved = true;
            let name = symbol.name().map(|name| format!("{name:#}"));
            walk.visit(name.as_deref(), symbol.filename(), symbol.lineno());
        });
        if !resolved {
            walk.visit(None, None, None);
        }
        walk.found.is_none() && walk.index < MAX_RESOLVED_FRAMES
    });

    walk.found
}

#[cfg(not(feature = "function-names"))]
#[inline]
fn resolve_frame_at(_caller: &'static Location<'static>, _skip: usize) -> Option<SourceLocation> {
    None
}

/// Logical-frame cursor used while walking the stack.
///
/// Inlined calls appear as several symbols for one physical frame; each is
/// one logical frame. The anchor is the innermost symbol whose file and line
/// are the `#[track_caller]` location, which is the function containing the
/// call site whether or not the constructors in between were inlined.
#[cfg(feature = "function-names")]
struct FrameWalk {
    caller: &'static Location<'static>,
    skip: usize,
    index: usize,
    anchor: Option<usize>,
    found: Option<SourceLocation>,
}

#[cfg(feature = "function-names")]
impl FrameWalk {
    fn visit(&mut self, symbol: Option<&str>, file: Option<&Path>, line: Option<u32>) {
        if self.found.is_some() {
            return;
        }
        let function = symbol.map(function_name_of).unwrap_or("");

        match self.anchor {
            None if self.is_call_site(file, line) => {
                self.anchor = Some(self.index);
                if self.skip == 0 {
                    self.found = Some(SourceLocation {
                        file: Cow::Borrowed(self.caller.file()),
                        line: self.caller.line(),
                        function: Cow::Owned(function.to_owned()),
                    });
                }
            }
            Some(at) if self.index == at + self.skip => {
                self.found = Some(match (file, line) {
                    (Some(file), Some(line)) => SourceLocation {
                        file: Cow::Owned(file.to_string_lossy().into_owned()),
                        line,
                        function: Cow::Owned(function.to_owned()),
                    },
                    _ => SourceLocation::UNKNOWN,
                });
            }
            _ => {}
        }
        self.index += 1;
    }

    fn is_call_site(&self, file: Option<&Path>, line: Option<u32>) -> bool {
        line == Some(self.caller.line())
            && file.is_some_and(|file| file.ends_with(self.caller.file()))
    }
}

/// Reduce a demangled symbol path to the bare function name.
///
/// Drops the module path, a trailing `::h<hash>`, closure segments and
/// generic arguments:
///
/// ```rust
/// use classified_errors::function_name_of;
///
/// assert_eq!(function_name_of("app::users::load_profile::h0123456789abcdef"), "load_profile");
/// assert_eq!(function_name_of("app::run::{{closure}}"), "run");
/// assert_eq!(function_name_of("<app::Repo as app::Store>::fetch"), "fetch");
/// assert_eq!(function_name_of("main"), "main");
/// ```
pub fn function_name_of(symbol: &str) -> &str {
    split_path(symbol)
        .into_iter()
        .rev()
        .map(|segment| segment.split('<').next().unwrap_or(""))
        .find(|segment| !segment.is_empty() && !segment.starts_with('{') && !is_hash(segment))
        .unwrap_or("")
}

/// Split on `::` outside of generic brackets.
fn split_path(path: &str) -> SmallVec<[&str; 8]> {
    let bytes = path.as_bytes();
    let mut parts = SmallVec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'[' => depth += 1,
            b'>' | b']' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                parts.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&path[start..]);
    parts
}

fn is_hash(segment: &str) -> bool {
    segment.len() == 17
        && segment.starts_with('h')
        && segment[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_records_call_site_line() {
        let expected = line!() + 1;
        let location = capture_location(0);

        assert_eq!(location.line(), expected);
        assert!(location.file().ends_with("location.rs"));
    }

    #[test]
    fn caller_matches_capture_at_zero() {
        let line = line!() + 1;
        let location = SourceLocation::caller();

        assert_eq!(location.line(), line);
        assert!(!location.is_unknown());
    }

    #[cfg(feature = "function-names")]
    #[test]
    fn capture_resolves_enclosing_function() {
        let location = capture_location(0);
        assert_eq!(location.function(), "capture_resolves_enclosing_function");
    }

    #[cfg(feature = "function-names")]
    #[test]
    fn skip_one_describes_the_calling_frame() {
        #[inline(never)]
        fn helper() -> SourceLocation {
            capture_location(1)
        }

        let line = line!() + 1;
        let location = helper();

        assert_eq!(location.line(), line);
        assert!(location.file().ends_with("location.rs"));
        assert_eq!(location.function(), "skip_one_describes_the_calling_frame");
    }

    #[cfg(feature = "function-names")]
    #[test]
    fn track_caller_helper_reports_its_caller() {
        #[track_caller]
        #[inline(never)]
        fn helper() -> SourceLocation {
            capture_location(0)
        }

        let line = line!() + 1;
        let location = helper();

        assert_eq!(location.line(), line);
        assert_eq!(location.function(), "track_caller_helper_reports_its_caller");
    }

    #[cfg(feature = "function-names")]
    #[test]
    fn inlined_frames_keep_their_own_name() {
        #[inline(always)]
        fn inlined() -> (u32, SourceLocation) {
            (line!(), capture_location(0))
        }

        let (line, location) = inlined();

        assert_eq!(location.line(), line);
        assert_eq!(location.function(), "inlined");
    }

    #[cfg(not(feature = "function-names"))]
    #[test]
    fn function_name_empty_without_feature() {
        assert_eq!(capture_location(0).function(), "");
    }

    #[cfg(not(feature = "function-names"))]
    #[test]
    fn skip_without_stack_walk_is_unknown() {
        assert!(capture_location(1).is_unknown());
    }

    #[test]
    fn unknown_is_zero_value() {
        let unknown = SourceLocation::default();
        assert_eq!(unknown.file(), "");
        assert_eq!(unknown.line(), 0);
        assert_eq!(unknown.function(), "");
        assert!(unknown.is_unknown());
        assert_eq!(unknown.to_string(), ":0");
    }

    #[test]
    fn display_is_file_and_line() {
        let location = SourceLocation::new("src/users.rs", 42, "app::users::load");
        assert_eq!(location.to_string(), "src/users.rs:42");
        assert_eq!(location.function(), "load");
    }

    #[test]
    fn function_name_strips_paths_and_hashes() {
        assert_eq!(function_name_of("a::b::c"), "c");
        assert_eq!(function_name_of("a::b::c::h0123456789abcdef"), "c");
        assert_eq!(function_name_of("a::b::{{closure}}"), "b");
        assert_eq!(function_name_of("a::b::{closure#0}"), "b");
        assert_eq!(function_name_of("<a::X as a::Y>::go"), "go");
        assert_eq!(function_name_of("<a::X<u8>>::new"), "new");
        assert_eq!(function_name_of("a::make::<alloc::string::String>"), "make");
        assert_eq!(function_name_of(""), "");
    }

    #[test]
    fn hash_detection_requires_exact_shape() {
        assert!(is_hash("h0123456789abcdef"));
        assert!(!is_hash("handler"));
        assert!(!is_hash("h0123456789abcdeg"));
    }
}

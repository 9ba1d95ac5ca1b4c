//! # Classified Errors
//!
//! Errors tagged with a stable classification code, chained to their causes,
//! and stamped with the location that raised them.
//!
//! ## Design Philosophy
//!
//! 1. **Classification is not text**: callers branch on an [`ErrorCode`], never on a message
//! 2. **Context is appended, never replaced**: wrapping keeps the original error and its code
//! 3. **Every error knows where it was raised**: location is captured once, at construction
//! 4. **Foreign errors are first-class**: every inspection accepts any `dyn Error`
//! 5. **Nothing here can fail**: construction, inspection and rendering are total
//!
//! ## Data Model
//!
//! A [`ClassifiedError`] carries:
//!
//! - a code (defaults to [`DEFAULT_ERROR`] when wrapping a foreign error)
//! - a human message for this occurrence
//! - an optional cause, which may be a `ClassifiedError` or any other error
//! - the message of that cause, frozen at wrap time
//! - an optional opaque [`Payload`] (request IDs, offending values, ...)
//! - the [`SourceLocation`] of the call that built it
//!
//! Errors are immutable. Cloning is cheap and shares the cause chain.
//!
//! ## Quick Start
//!
//! ```rust
//! use classified_errors::{
//!     code_of, define_error_codes, is_classified_as, render_error, ClassifiedError, Result,
//! };
//!
//! define_error_codes! {
//!     pub NOT_FOUND = "not_found",
//! }
//!
//! fn find_user(id: u32) -> Result<String> {
//!     Err(ClassifiedError::new_with_data(NOT_FOUND, None, format!("user {id} missing"), id))
//! }
//!
//! fn load_profile(id: u32) -> Result<String> {
//!     find_user(id).map_err(|e| ClassifiedError::wrap(e, "failed to load profile"))
//! }
//!
//! let err = load_profile(42).unwrap_err();
//!
//! // Classification survives the wrap.
//! assert!(is_classified_as(&err, &NOT_FOUND));
//! assert_eq!(code_of(&err), NOT_FOUND);
//!
//! // Display is the message; the full chain is one `render` away.
//! assert_eq!(err.to_string(), "failed to load profile");
//! let rendered = render_error(&err);
//! assert!(rendered.starts_with("failed to load profile | [code: not_found]"));
//! assert!(rendered.contains("[cause: {user 42 missing | [code: not_found] | [data: 42]"));
//! ```
//!
//! ## Wrapping Foreign Errors
//!
//! ```rust
//! use classified_errors::{code_of, render_error, ClassifiedError, DEFAULT_ERROR};
//! use std::io;
//!
//! let disk = io::Error::new(io::ErrorKind::Other, "disk full");
//! let err = ClassifiedError::wrap(disk, "could not persist session");
//!
//! assert_eq!(code_of(&err), DEFAULT_ERROR);
//! assert!(render_error(&err).ends_with("[cause: {disk full}]"));
//! ```
//!
//! ## Features
//!
//! - `function-names` (default): resolve the name of the function that raised
//!   an error by walking the stack. Without it, file and line are still
//!   captured and the function name is left empty.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::result;
use std::sync::Arc;
use zeroize::Zeroize;

pub mod chain;
pub mod codes;
pub mod convenience;
pub mod inspect;
pub mod location;
pub mod logging;
pub mod payload;
pub mod render;

pub use chain::*;
pub use codes::*;
pub use convenience::*;
pub use inspect::*;
pub use location::*;
pub use logging::*;
pub use payload::*;
pub use render::*;

/// Type alias for Results using our error type.
pub type Result<T, E = ClassifiedError> = result::Result<T, E>;

/// Boxed form in which causes are accepted.
///
/// Every `E: Error + Send + Sync + 'static` converts into it, as do `String`
/// and `&str` (which become opaque foreign errors).
pub type Cause = Box<dyn Error + Send + Sync + 'static>;

/// The error value: code, message, cause chain, payload and location.
///
/// # Construction
///
/// | Constructor | Code | Cause |
/// |---|---|---|
/// | [`new`](Self::new) / [`new_with_data`](Self::new_with_data) | explicit | optional |
/// | [`root`](Self::root) | explicit | none |
/// | [`wrap`](Self::wrap) / [`wrap_with_data`](Self::wrap_with_data) | inherited, or [`DEFAULT_ERROR`] | the wrapped error |
///
/// All constructors are `#[track_caller]`: the captured location is the line
/// that called them, not a line inside this crate.
///
/// # Display
///
/// `{}` prints the message only, as foreign code expects from an error.
/// `{:#}` prints the full diagnostic produced by [`render`].
#[derive(Clone)]
#[must_use = "errors should be handled or propagated"]
pub struct ClassifiedError {
    code: ErrorCode,
    message: Cow<'static, str>,
    cause: Option<Arc<dyn Error + Send + Sync + 'static>>,
    cause_message: Option<String>,
    data: Option<Arc<dyn Payload>>,
    location: SourceLocation,
}

impl ClassifiedError {
    /// Create an error with the given classification, optional cause and message.
    #[track_caller]
    pub fn new(code: ErrorCode, cause: Option<Cause>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::assemble(code, cause, message.into(), None, capture_location(0))
    }

    /// Like [`new`](Self::new), with an attached payload.
    #[track_caller]
    pub fn new_with_data(
        code: ErrorCode,
        cause: Option<Cause>,
        message: impl Into<Cow<'static, str>>,
        data: impl Payload,
    ) -> Self {
        Self::assemble(
            code,
            cause,
            message.into(),
            Some(Arc::new(data)),
            capture_location(0),
        )
    }

    /// Create a root cause: a classified error with no predecessor.
    #[track_caller]
    pub fn root(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::assemble(code, None, message.into(), None, capture_location(0))
    }

    /// Add context to `err`.
    ///
    /// The new error keeps `err`'s code when `err` is a `ClassifiedError`
    /// and falls back to [`DEFAULT_ERROR`] otherwise. `err` becomes the cause
    /// and is left untouched.
    #[track_caller]
    pub fn wrap(err: impl Into<Cause>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::wrapped(err.into(), message.into(), None, capture_location(0))
    }

    /// Like [`wrap`](Self::wrap), with an attached payload.
    #[track_caller]
    pub fn wrap_with_data(
        err: impl Into<Cause>,
        message: impl Into<Cow<'static, str>>,
        data: impl Payload,
    ) -> Self {
        Self::wrapped(
            err.into(),
            message.into(),
            Some(Arc::new(data)),
            capture_location(0),
        )
    }

    pub(crate) fn wrapped(
        cause: Cause,
        message: Cow<'static, str>,
        data: Option<Arc<dyn Payload>>,
        location: SourceLocation,
    ) -> Self {
        let code = inspect::classified(cause.as_ref())
            .map_or(DEFAULT_ERROR, |inner| inner.code.clone());
        Self::assemble(code, Some(cause), message, data, location)
    }

    pub(crate) fn assemble(
        code: ErrorCode,
        cause: Option<Cause>,
        message: Cow<'static, str>,
        data: Option<Arc<dyn Payload>>,
        location: SourceLocation,
    ) -> Self {
        let cause_message = cause.as_ref().map(|cause| cause.to_string());
        Self {
            code,
            message,
            cause: cause.map(Arc::from),
            cause_message,
            data,
            location,
        }
    }

    /// Classification code.
    #[inline]
    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    /// Message of this occurrence (not including causes).
    #[inline]
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// The wrapped error, if any.
    #[inline]
    pub fn cause(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }

    /// Message of the immediate cause as it read when this error was built.
    #[inline]
    pub fn cause_message(&self) -> Option<&str> {
        self.cause_message.as_deref()
    }

    /// Attached payload, if any.
    #[inline]
    pub fn data(&self) -> Option<&(dyn Payload + 'static)> {
        self.data.as_deref()
    }

    /// Attached payload as a `T`; `None` when absent or of another type.
    #[inline]
    pub fn data_as<T: 'static>(&self) -> Option<&T> {
        self.data().and_then(|data| data.downcast_ref::<T>())
    }

    /// Where this error was constructed.
    #[inline]
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// True if this error carries `code`.
    #[inline]
    pub fn is(&self, code: &ErrorCode) -> bool {
        self.code == *code
    }

    /// Full single-line diagnostic, causes included. See [`render`].
    pub fn render(&self) -> String {
        render_error(self)
    }

    /// Borrowed structured view for log pipelines.
    ///
    /// ```rust
    /// # use classified_errors::{ClassifiedError, ErrorCode};
    /// let err = ClassifiedError::root(ErrorCode::define("timeout"), "upstream timed out");
    /// let record = err.record();
    /// assert_eq!(record.code().as_str(), "timeout");
    /// assert_eq!(record.message(), "upstream timed out");
    /// ```
    #[inline]
    pub fn record(&self) -> ErrorRecord<'_> {
        ErrorRecord::of(self)
    }

    /// Callback form of [`record`](Self::record); the record cannot escape `f`.
    #[inline]
    pub fn with_record<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ErrorRecord<'_>) -> R,
    {
        let record = self.record();
        f(&record)
    }
}

impl Drop for ClassifiedError {
    fn drop(&mut self) {
        if let Cow::Owned(ref mut message) = self.message {
            message.zeroize();
        }
        if let Some(ref mut cause_message) = self.cause_message {
            cause_message.zeroize();
        }
    }
}

impl fmt::Debug for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifiedError")
            .field("code", &self.code.as_str())
            .field("message", &self.message)
            .field("data", &self.data)
            .field("location", &format_args!("{}", self.location))
            .field("function", &self.location.function())
            .field("cause", &self.cause)
            .finish()
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write_rendered(f, self)
        } else {
            f.write_str(&self.message)
        }
    }
}

impl Error for ClassifiedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause()
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use std::io;
    use std::thread;

    const NOT_FOUND: ErrorCode = ErrorCode::define("not_found");
    const INVALID_INPUT: ErrorCode = ErrorCode::define("invalid_input");

    #[test]
    fn new_keeps_code_message_and_no_cause() {
        let err = ClassifiedError::new(NOT_FOUND, None, "user 42 missing");

        assert_eq!(err.code(), &NOT_FOUND);
        assert_eq!(err.message(), "user 42 missing");
        assert!(err.cause().is_none());
        assert!(err.cause_message().is_none());
        assert!(err.data().is_none());
        assert!(err.is(&NOT_FOUND));
        assert!(!err.is(&INVALID_INPUT));
    }

    #[test]
    fn new_with_cause_freezes_cause_message() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let err = ClassifiedError::new(INVALID_INPUT, Some(io.into()), "cannot open");

        assert_eq!(err.cause_message(), Some("permission denied"));
        assert_eq!(err.cause().map(|c| c.to_string()).as_deref(), Some("permission denied"));
    }

    #[test]
    fn wrap_inherits_classification() {
        let inner = ClassifiedError::root(NOT_FOUND, "user 42 missing");
        let outer = ClassifiedError::wrap(inner, "failed to load profile");

        assert_eq!(outer.code(), &NOT_FOUND);
        assert_eq!(outer.message(), "failed to load profile");
        assert_eq!(outer.cause_message(), Some("user 42 missing"));

        let cause = outer.cause().and_then(|c| c.downcast_ref::<ClassifiedError>());
        assert_eq!(cause.map(ClassifiedError::message), Some("user 42 missing"));
    }

    #[test]
    fn wrap_foreign_defaults_classification() {
        let err = ClassifiedError::wrap(io::Error::other("disk full"), "flush failed");

        assert_eq!(err.code(), &DEFAULT_ERROR);
        assert!(err.cause().is_some_and(|c| c.is::<io::Error>()));
    }

    #[test]
    fn wrap_accepts_boxed_classified_errors() {
        let boxed: Cause = Box::new(ClassifiedError::root(NOT_FOUND, "gone"));
        let err = ClassifiedError::wrap(boxed, "lookup failed");

        assert_eq!(err.code(), &NOT_FOUND);
    }

    #[test]
    fn wrap_inherits_through_arc_and_box() {
        let shared = Arc::new(ClassifiedError::root(NOT_FOUND, "gone"));
        let boxed = Box::new(ClassifiedError::root(INVALID_INPUT, "bad"));

        assert_eq!(ClassifiedError::wrap(shared, "ctx").code(), &NOT_FOUND);
        assert_eq!(ClassifiedError::wrap(boxed, "ctx").code(), &INVALID_INPUT);
    }

    #[test]
    fn data_is_absent_unless_supplied() {
        let with = ClassifiedError::new_with_data(NOT_FOUND, None, "x", 42);
        let without = ClassifiedError::new(NOT_FOUND, None, "x");

        assert_eq!(with.data_as::<i32>(), Some(&42));
        assert_eq!(with.data_as::<u64>(), None);
        assert!(without.data().is_none());
    }

    #[test]
    fn wrap_with_data_attaches_to_new_layer_only() {
        let inner = ClassifiedError::root(NOT_FOUND, "missing");
        let outer = ClassifiedError::wrap_with_data(inner, "handler failed", "req-7");

        assert_eq!(outer.data_as::<&str>(), Some(&"req-7"));
        let inner = outer.cause().and_then(|c| c.downcast_ref::<ClassifiedError>());
        assert!(inner.is_some_and(|e| e.data().is_none()));
    }

    #[test]
    fn location_points_at_caller() {
        let line = line!() + 1;
        let err = ClassifiedError::root(NOT_FOUND, "here");

        assert_eq!(err.location().line(), line);
        assert!(err.location().file().ends_with("lib.rs"));
    }

    #[cfg(feature = "function-names")]
    #[test]
    fn location_names_calling_function() {
        let err = ClassifiedError::wrap("plain text cause", "wrapped");
        assert_eq!(err.location().function(), "location_names_calling_function");
    }

    #[cfg(feature = "function-names")]
    #[test]
    fn raising_function_is_named_not_its_caller() {
        #[inline(never)]
        fn raise_not_found() -> (u32, ClassifiedError) {
            (line!(), ClassifiedError::new(NOT_FOUND, None, "missing"))
        }

        let (line, err) = raise_not_found();
        assert_eq!(err.location().line(), line);
        assert_eq!(err.location().function(), "raise_not_found");
    }

    #[cfg(feature = "function-names")]
    #[test]
    fn inlined_raiser_is_named() {
        #[inline(always)]
        fn raise_inline() -> (u32, ClassifiedError) {
            (line!(), ClassifiedError::wrap(io::Error::other("eof"), "short read"))
        }

        let (line, err) = raise_inline();
        assert_eq!(err.location().line(), line);
        assert_eq!(err.location().function(), "raise_inline");
    }

    #[test]
    fn display_is_message_alternate_is_render() {
        let err = ClassifiedError::wrap(ClassifiedError::root(NOT_FOUND, "inner"), "outer");

        assert_eq!(format!("{err}"), "outer");
        assert_eq!(format!("{err:#}"), err.render());
        assert!(err.render().contains("[cause: {inner"));
    }

    #[test]
    fn source_exposes_cause() {
        let err = ClassifiedError::wrap(ClassifiedError::root(NOT_FOUND, "inner"), "outer");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("inner"));
    }

    #[test]
    fn debug_lists_fields() {
        let err = ClassifiedError::new_with_data(NOT_FOUND, None, "missing", 7u8);
        let debug = format!("{err:?}");

        assert!(debug.contains("not_found"));
        assert!(debug.contains("missing"));
        assert!(debug.contains('7'));
    }

    #[test]
    fn errors_are_shareable_across_threads() {
        let err = Arc::new(ClassifiedError::wrap(
            ClassifiedError::root(NOT_FOUND, "inner"),
            "outer",
        ));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let err = Arc::clone(&err);
                thread::spawn(move || err.render())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), err.render());
        }
    }

    #[test]
    fn clones_share_the_chain() {
        let err = ClassifiedError::wrap(ClassifiedError::root(NOT_FOUND, "inner"), "outer");
        let copy = err.clone();

        let a = err.cause().map(|c| c as *const dyn Error as *const ());
        let b = copy.cause().map(|c| c as *const dyn Error as *const ());
        assert_eq!(a, b);
    }

    #[test]
    fn converts_into_boxed_std_error() {
        fn foreign() -> result::Result<(), Box<dyn Error + Send + Sync>> {
            Err(ClassifiedError::root(NOT_FOUND, "gone"))?
        }

        let err = foreign().unwrap_err();
        assert_eq!(err.to_string(), "gone");
        assert!(err.downcast_ref::<ClassifiedError>().is_some());
    }
}

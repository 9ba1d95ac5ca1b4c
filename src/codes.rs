//! Classification codes - stable identifiers that outlive message text.
//!
//! A code is nothing more than a string identifier. Two codes are the same
//! classification exactly when their identifiers are equal; there is no
//! registry and no uniqueness check. Choosing distinct identifiers for
//! distinct failure classes is the caller's job.
//!
//! # Example
//!
//! ```rust
//! use classified_errors::{define_error_codes, ClassifiedError, ErrorCode, is_classified_as};
//!
//! define_error_codes! {
//!     /// A lookup came back empty.
//!     pub NOT_FOUND = "not_found",
//!     pub INVALID_INPUT = "invalid_input",
//! }
//!
//! let err = ClassifiedError::root(NOT_FOUND, "user 42 missing");
//! assert!(is_classified_as(&err, &NOT_FOUND));
//! assert!(!is_classified_as(&err, &INVALID_INPUT));
//!
//! // Runtime identifiers compare by value as well.
//! assert_eq!(ErrorCode::new(String::from("not_found")), NOT_FOUND);
//! ```

use std::borrow::Cow;
use std::fmt;

/// Code attached to errors raised without an explicit classification,
/// most notably when a foreign error is wrapped.
pub const DEFAULT_ERROR: ErrorCode = ErrorCode::define("default_error");

/// Opaque, value-comparable classification tag.
///
/// Cloning is free for codes built with [`ErrorCode::define`] (the identifier
/// is borrowed from the binary); runtime identifiers are owned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode {
    id: Cow<'static, str>,
}

impl ErrorCode {
    /// The absence of a classification. Returned by [`crate::code_of`] for
    /// errors that were not built by this crate.
    pub const EMPTY: ErrorCode = ErrorCode::define("");

    /// Define a code from a string literal. Usable in `const` items.
    #[inline]
    pub const fn define(id: &'static str) -> Self {
        Self {
            id: Cow::Borrowed(id),
        }
    }

    /// Build a code from a runtime identifier (configuration, plugins, ...).
    #[inline]
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self { id: id.into() }
    }

    /// The identifier this code compares by.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.id.as_ref()
    }

    /// True for [`ErrorCode::EMPTY`] (or any code defined with `""`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

impl Default for ErrorCode {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ErrorCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Define a code. Equivalent to [`ErrorCode::define`].
#[inline]
pub const fn define(id: &'static str) -> ErrorCode {
    ErrorCode::define(id)
}

/// Declare several classification codes as `const` items at once.
///
/// ```rust
/// use classified_errors::define_error_codes;
///
/// define_error_codes! {
///     pub TIMEOUT = "timeout",
///     CONFLICT = "conflict",
/// }
///
/// assert_eq!(TIMEOUT.as_str(), "timeout");
/// assert_eq!(CONFLICT.to_string(), "conflict");
/// ```
#[macro_export]
macro_rules! define_error_codes {
    ($( $(#[$meta:meta])* $vis:vis $name:ident = $id:literal ),+ $(,)?) => {
        $(
            $(#[$meta])*
            $vis const $name: $crate::ErrorCode = $crate::ErrorCode::define($id);
        )+
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_compare_by_identifier() {
        const A: ErrorCode = ErrorCode::define("not_found");
        let b = ErrorCode::new(String::from("not_found"));
        let c = define("invalid_input");

        assert_eq!(A, b);
        assert_ne!(A, c);
    }

    #[test]
    fn default_error_identifier_is_stable() {
        assert_eq!(DEFAULT_ERROR.as_str(), "default_error");
        assert_eq!(DEFAULT_ERROR.to_string(), "default_error");
        assert!(!DEFAULT_ERROR.is_empty());
    }

    #[test]
    fn empty_code_is_the_default() {
        assert!(ErrorCode::EMPTY.is_empty());
        assert_eq!(ErrorCode::default(), ErrorCode::EMPTY);
        assert_ne!(ErrorCode::EMPTY, DEFAULT_ERROR);
    }

    #[test]
    fn codes_hash_by_identifier() {
        let mut seen = HashSet::new();
        seen.insert(define("timeout"));
        seen.insert(ErrorCode::new("timeout".to_owned()));
        seen.insert(define("conflict"));

        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn macro_batch_definition() {
        define_error_codes! {
            READ_FAILED = "read_failed",
            /// documented
            WRITE_FAILED = "write_failed",
        }

        assert_eq!(READ_FAILED.as_str(), "read_failed");
        assert_eq!(WRITE_FAILED.as_str(), "write_failed");
        assert_ne!(READ_FAILED, WRITE_FAILED);
    }
}

//! Convenience layer: extension traits and formatted-message macros.
//!
//! Everything here is a thin front over the constructors on
//! [`ClassifiedError`]. All of it is `#[track_caller]` (or a macro expanding
//! to a `#[track_caller]` call), so the recorded location is still the line
//! the application wrote.
//!
//! # Usage
//!
//! ```rust
//! use classified_errors::{bail, classified, ensure, wrap, ErrorCode, ResultExt, Result};
//! use std::fs;
//!
//! const INVALID_INPUT: ErrorCode = ErrorCode::define("invalid_input");
//! const NOT_FOUND: ErrorCode = ErrorCode::define("not_found");
//!
//! fn parse_port(raw: &str) -> Result<u16> {
//!     let port = raw.parse::<u32>().classify(INVALID_INPUT, "port is not a number")?;
//!     ensure!(port <= 65535, INVALID_INPUT, "port {port} out of range");
//!     Ok(port as u16)
//! }
//!
//! fn read_config(path: &str) -> Result<String> {
//!     if path.is_empty() {
//!         bail!(NOT_FOUND, "no config path given");
//!     }
//!     fs::read_to_string(path).wrap_err_with(|| format!("cannot read {path}"))
//! }
//!
//! assert!(parse_port("8080").is_ok());
//! assert_eq!(parse_port("x").unwrap_err().code(), &INVALID_INPUT);
//! assert_eq!(parse_port("70000").unwrap_err().message(), "port 70000 out of range");
//!
//! let err = read_config("/definitely/not/here").unwrap_err();
//! assert!(err.message().starts_with("cannot read"));
//!
//! let err = classified!(NOT_FOUND, "user {} missing", 42);
//! let err = wrap!(err, "profile {} unavailable", "alice");
//! assert_eq!(err.code(), &NOT_FOUND);
//! ```

use crate::{Cause, ClassifiedError, ErrorCode, Payload, capture_location};
use std::borrow::Cow;
use std::result;
use std::sync::Arc;

/// Context and classification for any `Result` whose error converts into a
/// [`Cause`].
pub trait ResultExt<T> {
    /// Wrap the error with a message, inheriting its classification
    /// (see [`ClassifiedError::wrap`]).
    fn wrap_err<M>(self, message: M) -> result::Result<T, ClassifiedError>
    where
        M: Into<Cow<'static, str>>;

    /// Like [`wrap_err`](Self::wrap_err), building the message only on error.
    fn wrap_err_with<M, F>(self, message: F) -> result::Result<T, ClassifiedError>
    where
        M: Into<Cow<'static, str>>,
        F: FnOnce() -> M;

    /// Wrap the error with a message and a payload.
    fn wrap_err_with_data<M, D>(self, message: M, data: D) -> result::Result<T, ClassifiedError>
    where
        M: Into<Cow<'static, str>>,
        D: Payload;

    /// Replace the classification: the error becomes the cause of a new
    /// error carrying `code`.
    fn classify<M>(self, code: ErrorCode, message: M) -> result::Result<T, ClassifiedError>
    where
        M: Into<Cow<'static, str>>;
}

impl<T, E> ResultExt<T> for result::Result<T, E>
where
    E: Into<Cause>,
{
    #[track_caller]
    fn wrap_err<M>(self, message: M) -> result::Result<T, ClassifiedError>
    where
        M: Into<Cow<'static, str>>,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(ClassifiedError::wrapped(
                err.into(),
                message.into(),
                None,
                capture_location(0),
            )),
        }
    }

    #[track_caller]
    fn wrap_err_with<M, F>(self, message: F) -> result::Result<T, ClassifiedError>
    where
        M: Into<Cow<'static, str>>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(ClassifiedError::wrapped(
                err.into(),
                message().into(),
                None,
                capture_location(0),
            )),
        }
    }

    #[track_caller]
    fn wrap_err_with_data<M, D>(self, message: M, data: D) -> result::Result<T, ClassifiedError>
    where
        M: Into<Cow<'static, str>>,
        D: Payload,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(ClassifiedError::wrapped(
                err.into(),
                message.into(),
                Some(Arc::new(data)),
                capture_location(0),
            )),
        }
    }

    #[track_caller]
    fn classify<M>(self, code: ErrorCode, message: M) -> result::Result<T, ClassifiedError>
    where
        M: Into<Cow<'static, str>>,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(ClassifiedError::assemble(
                code,
                Some(err.into()),
                message.into(),
                None,
                capture_location(0),
            )),
        }
    }
}

/// Turn an absent value into a classified root cause.
pub trait OptionExt<T> {
    /// `Some(v)` stays `Ok(v)`; `None` becomes a root error carrying `code`.
    ///
    /// ```rust
    /// use classified_errors::{ErrorCode, OptionExt};
    ///
    /// const NOT_FOUND: ErrorCode = ErrorCode::define("not_found");
    ///
    /// let users = ["alice", "bob"];
    /// let found = users.iter().find(|u| **u == "carol").ok_or_classified(NOT_FOUND, "no carol");
    /// assert_eq!(found.unwrap_err().code(), &NOT_FOUND);
    /// ```
    fn ok_or_classified<M>(self, code: ErrorCode, message: M) -> result::Result<T, ClassifiedError>
    where
        M: Into<Cow<'static, str>>;
}

impl<T> OptionExt<T> for Option<T> {
    #[track_caller]
    fn ok_or_classified<M>(self, code: ErrorCode, message: M) -> result::Result<T, ClassifiedError>
    where
        M: Into<Cow<'static, str>>,
    {
        match self {
            Some(value) => Ok(value),
            None => Err(ClassifiedError::assemble(
                code,
                None,
                message.into(),
                None,
                capture_location(0),
            )),
        }
    }
}

// ============================================================================
// Error Creation Macros
// ============================================================================

/// Create a root [`ClassifiedError`] with a formatted message.
///
/// ```rust
/// # use classified_errors::{classified, ErrorCode};
/// const TIMEOUT: ErrorCode = ErrorCode::define("timeout");
/// let secs = 30;
/// let err = classified!(TIMEOUT, "gave up after {secs}s");
/// assert_eq!(err.message(), "gave up after 30s");
/// ```
#[macro_export]
macro_rules! classified {
    ($code:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::ClassifiedError::root($code, ::std::format!($fmt $(, $arg)*))
    };
}

/// Wrap an error with a formatted message. See [`ClassifiedError::wrap`].
///
/// ```rust
/// # use classified_errors::{wrap, DEFAULT_ERROR};
/// let io = std::io::Error::other("disk full");
/// let err = wrap!(io, "cannot write {}", "journal.log");
/// assert_eq!(err.message(), "cannot write journal.log");
/// assert_eq!(err.code(), &DEFAULT_ERROR);
/// ```
#[macro_export]
macro_rules! wrap {
    ($err:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::ClassifiedError::wrap($err, ::std::format!($fmt $(, $arg)*))
    };
}

/// Return early with a classified root error.
///
/// The error is converted with `Into`, so the enclosing function may return
/// any error type that a `ClassifiedError` converts into.
#[macro_export]
macro_rules! bail {
    ($code:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        return ::std::result::Result::Err(
            ::std::convert::Into::into($crate::classified!($code, $fmt $(, $arg)*))
        )
    };
}

/// Return early with a classified root error unless a condition holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $code:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        if !$cond {
            $crate::bail!($code, $fmt $(, $arg)*);
        }
    };
}

// ============================================================================
// Tests
// ============================================================================

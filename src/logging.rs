//! Structured log view of a single error.
//!
//! This crate does not ship a logger. Callers feed errors into whatever sink
//! they run; [`ErrorRecord`] gives them the fields without forcing a string
//! format on them, plus a bounded `key='value'` line for plain-text sinks.
//!
//! # Properties
//!
//! - Borrows from the [`ClassifiedError`] and cannot outlive it
//! - No heap allocation in accessors
//! - `write_to` bounds every field to [`MAX_FIELD_OUTPUT_LEN`] bytes so a
//!   runaway message cannot flood a log line
//!
//! [`render`](crate::render()) remains the lossless representation; records
//! trade completeness for a predictable line size.

use crate::{ClassifiedError, ErrorCode, Payload, SourceLocation, depth};
use std::borrow::Cow;
use std::fmt;

/// Maximum length for any individual field in formatted output.
pub const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Truncation indicator appended to truncated strings.
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Structured log entry with borrowed data from a `ClassifiedError`.
///
/// # Example
///
/// ```rust
/// # use classified_errors::{ClassifiedError, ErrorCode};
/// let err = ClassifiedError::wrap(
///     ClassifiedError::root(ErrorCode::define("not_found"), "user 42 missing"),
///     "failed to load profile",
/// );
///
/// err.with_record(|record| {
///     let mut line = String::new();
///     record.write_to(&mut line).unwrap();
///     assert!(line.starts_with("[not_found] message='failed to load profile' cause='user 42 missing'"));
///     assert!(line.ends_with("depth=1"));
/// });
/// ```
#[derive(Debug)]
pub struct ErrorRecord<'a> {
    code: &'a ErrorCode,
    message: &'a str,
    cause_message: Option<&'a str>,
    location: &'a SourceLocation,
    data: Option<&'a (dyn Payload + 'static)>,
    depth: usize,
}

impl<'a> ErrorRecord<'a> {
    pub(crate) fn of(err: &'a ClassifiedError) -> Self {
        Self {
            code: err.code(),
            message: err.message(),
            cause_message: err.cause_message(),
            location: err.location(),
            data: err.data(),
            depth: depth(err),
        }
    }

    /// Write the record as a single line of `key='value'` pairs.
    ///
    /// Format: `[{code}] message='..' cause='..' at='file:line' fn='..' data='..' depth=N`.
    /// Absent fields are omitted.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(
            f,
            "[{}] message='{}'",
            self.code,
            bounded(self.message)
        )?;

        if let Some(cause) = self.cause_message {
            write!(f, " cause='{}'", bounded(cause))?;
        }

        write!(
            f,
            " at='{}'",
            bounded(&self.location.to_string())
        )?;

        if !self.location.function().is_empty() {
            write!(f, " fn='{}'", self.location.function())?;
        }

        if let Some(data) = self.data {
            write!(
                f,
                " data='{}'",
                bounded(&format!("{data:?}"))
            )?;
        }

        write!(f, " depth={}", self.depth)
    }

    /// Classification code.
    #[inline]
    pub const fn code(&self) -> &ErrorCode {
        self.code
    }

    /// Message of this occurrence.
    #[inline]
    pub const fn message(&self) -> &str {
        self.message
    }

    /// Message of the immediate cause, frozen at construction.
    #[inline]
    pub const fn cause_message(&self) -> Option<&str> {
        self.cause_message
    }

    /// Construction site.
    #[inline]
    pub const fn location(&self) -> &SourceLocation {
        self.location
    }

    /// Attached payload.
    #[inline]
    pub const fn data(&self) -> Option<&(dyn Payload + 'static)> {
        self.data
    }

    /// Number of causes below this error.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

/// Bound a field to [`MAX_FIELD_OUTPUT_LEN`] bytes, marking the cut.
///
/// The cut lands on a char boundary, so the result is always valid UTF-8.
fn bounded(field: &str) -> Cow<'_, str> {
    if field.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(field);
    }

    let mut cut = MAX_FIELD_OUTPUT_LEN - TRUNCATION_INDICATOR.len();
    while !field.is_char_boundary(cut) {
        cut -= 1;
    }
    Cow::Owned(format!("{}{TRUNCATION_INDICATOR}", &field[..cut]))
}

//! Inspection of arbitrary errors.
//!
//! Every function here accepts `&(dyn Error + 'static)`, so it works the same
//! on a [`ClassifiedError`], a `Box<dyn Error>` that holds one, or an error
//! this crate has never seen. Foreign errors degrade to explicit absence:
//! [`ErrorCode::EMPTY`], `None`, or `false`. Nothing here fails or panics.
//!
//! Only the error passed in is examined; use [`crate::chain_of`] to look
//! further down the chain.

use crate::{ClassifiedError, ErrorCode, Payload, SourceLocation};
use std::any::Any;
use std::error::Error;
use std::ptr;
use std::sync::Arc;

/// The `ClassifiedError` behind `err`, looking through one `Arc` or `Box`.
pub(crate) fn classified<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a ClassifiedError> {
    err.downcast_ref::<ClassifiedError>()
        .or_else(|| err.downcast_ref::<Arc<ClassifiedError>>().map(Arc::as_ref))
        .or_else(|| err.downcast_ref::<Box<ClassifiedError>>().map(Box::as_ref))
}

/// True iff `err` is a `ClassifiedError` whose code equals `code`.
///
/// ```rust
/// use classified_errors::{is_classified_as, ClassifiedError, ErrorCode};
/// use std::io;
///
/// const NOT_FOUND: ErrorCode = ErrorCode::define("not_found");
/// const CONFLICT: ErrorCode = ErrorCode::define("conflict");
///
/// let err = ClassifiedError::root(NOT_FOUND, "no such user");
/// assert!(is_classified_as(&err, &NOT_FOUND));
/// assert!(!is_classified_as(&err, &CONFLICT));
///
/// let foreign = io::Error::other("boom");
/// assert!(!is_classified_as(&foreign, &NOT_FOUND));
/// ```
#[inline]
pub fn is_classified_as(err: &(dyn Error + 'static), code: &ErrorCode) -> bool {
    classified(err).is_some_and(|err| err.is(code))
}

/// Negation of [`is_classified_as`].
#[inline]
pub fn is_not(err: &(dyn Error + 'static), code: &ErrorCode) -> bool {
    !is_classified_as(err, code)
}

/// Error-to-error comparison.
///
/// Two classified errors match when their codes are equal. Any other pairing
/// falls back to identity: `err` and `target` must be the same object.
pub fn is(err: &(dyn Error + 'static), target: &(dyn Error + 'static)) -> bool {
    match (classified(err), classified(target)) {
        (Some(err), Some(target)) => err.code() == target.code(),
        _ => ptr::addr_eq(err as *const dyn Error, target as *const dyn Error),
    }
}

/// Classification of `err`, or [`ErrorCode::EMPTY`] for foreign errors.
#[inline]
pub fn code_of(err: &(dyn Error + 'static)) -> ErrorCode {
    classified(err).map_or(ErrorCode::EMPTY, |err| err.code().clone())
}

/// Payload attached to `err`; `None` for foreign errors or when none was set.
#[inline]
pub fn data_of<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a (dyn Payload + 'static)> {
    classified(err).and_then(ClassifiedError::data)
}

/// Payload of `err` as a `T`.
///
/// ```rust
/// use classified_errors::{data_as, data_of, ClassifiedError, ErrorCode};
///
/// const BAD_PORT: ErrorCode = ErrorCode::define("bad_port");
///
/// let err = ClassifiedError::new_with_data(BAD_PORT, None, "port out of range", 70000u32);
/// assert_eq!(data_as::<u32>(&err), Some(&70000));
///
/// let bare = ClassifiedError::new(BAD_PORT, None, "port out of range");
/// assert!(data_of(&bare).is_none());
/// ```
#[inline]
pub fn data_as<'a, T: Any>(err: &'a (dyn Error + 'static)) -> Option<&'a T> {
    data_of(err).and_then(|data| data.downcast_ref::<T>())
}

/// The error `err` wraps; `None` for foreign errors or root causes.
#[inline]
pub fn cause_of<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a (dyn Error + 'static)> {
    classified(err).and_then(ClassifiedError::cause)
}

/// Message of the immediate cause, as frozen when `err` was built.
#[inline]
pub fn cause_message_of<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a str> {
    classified(err).and_then(ClassifiedError::cause_message)
}

/// Construction site of `err`; `None` for foreign errors.
#[inline]
pub fn location_of<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a SourceLocation> {
    classified(err).map(ClassifiedError::location)
}

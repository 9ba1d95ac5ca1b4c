//! Single-line diagnostic rendering of an error and its whole cause chain.
//!
//! Format for a classified link:
//!
//! ```text
//! {message} | [code: {code}] | [data: {data:?}] | [at: {file}:{line} in {function}]
//! ```
//!
//! The data marker appears only when a payload is attached, and ` in
//! {function}` only when the function name was resolved. A foreign link is
//! rendered as its own `Display` output. Each cause is nested inside the
//! previous link as ` | [cause: {...}]`, so the most recent context comes first
//! and the root cause sits innermost.
//!
//! Nothing is truncated. A chain that loops back on itself ends with `<cycle>`
//! and a runaway chain ends with `<truncated>` after
//! [`MAX_CHAIN_DEPTH`](crate::MAX_CHAIN_DEPTH) links.

use crate::inspect::classified;
use crate::{ChainStop, chain_of};
use std::error::Error;
use std::fmt::{self, Write};

const CAUSE_OPEN: &str = " | [cause: {";
const CAUSE_CLOSE: &str = "}]";

/// Render an optional error. `None` renders as the empty string.
///
/// A foreign error renders as its `Display` text. If it reports a
/// [`source`](Error::source), that source is rendered too, nested as a cause
/// exactly like a classified link, so `render` of a bare foreign error is
/// only its message when it has no source.
///
/// ```rust
/// use classified_errors::{render, ClassifiedError, ErrorCode};
///
/// assert_eq!(render(None), "");
///
/// let err = ClassifiedError::root(ErrorCode::define("timeout"), "upstream timed out");
/// assert!(render(Some(&err)).starts_with("upstream timed out | [code: timeout] | [at: "));
/// ```
pub fn render(err: Option<&(dyn Error + 'static)>) -> String {
    err.map(render_error).unwrap_or_default()
}

/// Render an error and its causes.
pub fn render_error(err: &(dyn Error + 'static)) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_rendered(&mut out, err);
    out
}

/// Stream the rendering of `err` into `out` without an intermediate buffer.
pub fn write_rendered<W>(out: &mut W, err: &(dyn Error + 'static)) -> fmt::Result
where
    W: Write + ?Sized,
{
    let mut chain = chain_of(err);
    let mut opened = 0usize;

    for (index, link) in chain.by_ref().enumerate() {
        if index > 0 {
            out.write_str(CAUSE_OPEN)?;
            opened += 1;
        }
        write_link(out, link)?;
    }

    match chain.stopped() {
        Some(ChainStop::Cycle) => out.write_str(" | <cycle>")?,
        Some(ChainStop::DepthLimit) => out.write_str(" | <truncated>")?,
        None => {}
    }

    for _ in 0..opened {
        out.write_str(CAUSE_CLOSE)?;
    }
    Ok(())
}

fn write_link<W>(out: &mut W, link: &(dyn Error + 'static)) -> fmt::Result
where
    W: Write + ?Sized,
{
    let Some(err) = classified(link) else {
        return write!(out, "{link}");
    };

    write!(out, "{} | [code: {}]", err.message(), err.code())?;
    if let Some(data) = err.data() {
        write!(out, " | [data: {data:?}]")?;
    }

    let location = err.location();
    write!(out, " | [at: {location}")?;
    if !location.function().is_empty() {
        write!(out, " in {}", location.function())?;
    }
    out.write_str("]")
}

//! Cause-chain walking.
//!
//! A chain runs from the most recent context down to the root cause, following
//! [`Error::source`]. For a [`ClassifiedError`](crate::ClassifiedError) the
//! source is its cause, so classified and foreign links are walked the same
//! way and a classified error wrapping an `io::Error` that itself has a source
//! is fully unrolled.
//!
//! Chains built by this crate cannot loop: every wrap captures an existing,
//! immutable error. Foreign errors make no such promise, so the walk stops
//! when it meets an error it has already visited or after
//! [`MAX_CHAIN_DEPTH`] links, and records why it stopped.
//!
//! # Example
//!
//! ```rust
//! use classified_errors::{chain_of, root_cause, ClassifiedError};
//! use std::io;
//!
//! let disk = io::Error::new(io::ErrorKind::Other, "disk full");
//! let err = ClassifiedError::wrap(ClassifiedError::wrap(disk, "flush failed"), "save failed");
//!
//! let messages: Vec<String> = chain_of(&err).map(|e| e.to_string()).collect();
//! assert_eq!(messages, ["save failed", "flush failed", "disk full"]);
//! assert_eq!(root_cause(&err).to_string(), "disk full");
//! ```

use smallvec::SmallVec;
use std::error::Error;

/// Links walked before a chain is considered runaway.
pub const MAX_CHAIN_DEPTH: usize = 256;

/// Why a walk ended before reaching an error without a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStop {
    /// A link pointed back at an error already visited.
    Cycle,
    /// [`MAX_CHAIN_DEPTH`] links were produced.
    DepthLimit,
}

/// Iterator over an error and its causes, most recent first.
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
    // Addresses of the errors already yielded. Most chains are short.
    seen: SmallVec<[usize; 8]>,
    stopped: Option<ChainStop>,
}

impl<'a> Chain<'a> {
    /// Start a walk at `err` (which is yielded first).
    pub fn new(err: &'a (dyn Error + 'static)) -> Self {
        Self {
            next: Some(err),
            seen: SmallVec::new(),
            stopped: None,
        }
    }

    /// Set once the walk was cut short; `None` while iterating or after a
    /// natural end.
    #[inline]
    pub fn stopped(&self) -> Option<ChainStop> {
        self.stopped
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        let address = address_of(current);
        if self.seen.contains(&address) {
            self.stopped = Some(ChainStop::Cycle);
            return None;
        }
        if self.seen.len() >= MAX_CHAIN_DEPTH {
            self.stopped = Some(ChainStop::DepthLimit);
            return None;
        }

        self.seen.push(address);
        self.next = current.source();
        Some(current)
    }
}

#[inline]
fn address_of(err: &(dyn Error + 'static)) -> usize {
    (err as *const dyn Error).cast::<()>() as usize
}

/// Walk `err` and its causes.
#[inline]
pub fn chain_of<'a>(err: &'a (dyn Error + 'static)) -> Chain<'a> {
    Chain::new(err)
}

/// The innermost error reachable from `err` (`err` itself without a cause).
pub fn root_cause<'a>(err: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    chain_of(err).last().unwrap_or(err)
}

/// Number of causes below `err`: 0 for a root cause.
pub fn depth(err: &(dyn Error + 'static)) -> usize {
    chain_of(err).count().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassifiedError, ErrorCode};
    use std::fmt;

    /// A foreign error whose source is itself.
    #[derive(Debug)]
    struct Ouroboros;

    impl fmt::Display for Ouroboros {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("ouroboros")
        }
    }

    impl Error for Ouroboros {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(self)
        }
    }

    const BROKEN: ErrorCode = ErrorCode::define("broken");

    #[test]
    fn walks_classified_and_foreign_links() {
        let root = fmt::Error;
        let err = ClassifiedError::wrap(ClassifiedError::wrap(root, "middle"), "top");

        let mut chain = chain_of(&err);
        assert_eq!(chain.next().map(|e| e.to_string()).as_deref(), Some("top"));
        assert_eq!(chain.next().map(|e| e.to_string()).as_deref(), Some("middle"));
        assert!(chain.next().is_some());
        assert!(chain.next().is_none());
        assert_eq!(chain.stopped(), None);
    }

    #[test]
    fn depth_counts_causes() {
        let root = ClassifiedError::root(BROKEN, "root");
        assert_eq!(depth(&root), 0);

        let wrapped = ClassifiedError::wrap(ClassifiedError::wrap(root, "one"), "two");
        assert_eq!(depth(&wrapped), 2);
        assert_eq!(root_cause(&wrapped).to_string(), "root");
    }

    #[test]
    fn self_referential_source_is_cut() {
        let err = ClassifiedError::wrap(Ouroboros, "outer");

        let mut chain = chain_of(&err);
        assert_eq!(chain.by_ref().count(), 2);
        assert_eq!(chain.stopped(), Some(ChainStop::Cycle));
        assert_eq!(root_cause(&err).to_string(), "ouroboros");
    }

    #[test]
    fn deep_chains_hit_the_limit() {
        let mut err = ClassifiedError::root(BROKEN, "root");
        for i in 0..MAX_CHAIN_DEPTH + 10 {
            err = ClassifiedError::wrap(err, format!("layer {i}"));
        }

        let mut chain = chain_of(&err);
        assert_eq!(chain.by_ref().count(), MAX_CHAIN_DEPTH);
        assert_eq!(chain.stopped(), Some(ChainStop::DepthLimit));
    }
}

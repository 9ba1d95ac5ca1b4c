//! Opaque structured context attached to an error at construction time.
//!
//! Any `'static` value that is `Debug + Send + Sync` can ride along with an
//! error: a request ID, the value that failed validation, a small struct.
//! The `Debug` form is what rendering shows; the concrete type is recovered
//! with [`downcast_ref`](trait.Payload.html#method.downcast_ref).

use std::any::Any;
use std::fmt;

/// Printable, downcastable error payload.
///
/// Implemented for every `T: Any + Debug + Send + Sync`; there is no need to
/// implement it by hand.
pub trait Payload: Any + fmt::Debug + Send + Sync {
    /// Upcast for type recovery.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> Payload for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn Payload {
    /// True if the payload is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Recover the concrete payload.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

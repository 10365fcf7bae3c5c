//! Values that only exist while a request is being handled.
//!
//! Listing selectors reached through an unnamed identifier step are built
//! from an identifier that is unknown while the catalogue is derived. They
//! carry a [`Deferred::Placeholder`] instead, and forcing it is a contract
//! violation.

use std::fmt;

use crate::error::DeferredError;

/// A value that is either bound at request time or still a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub enum Deferred<T> {
    Placeholder,
    Bound(T),
}

impl<T> Deferred<T> {
    /// A value that is not available during derivation.
    pub fn placeholder() -> Self {
        Deferred::Placeholder
    }

    /// Bind the real value, as request handling does.
    pub fn bind(value: T) -> Self {
        Deferred::Bound(value)
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Deferred::Bound(_))
    }

    /// Access the value, or report that it is not available.
    pub fn try_force(&self) -> Result<&T, DeferredError> {
        match self {
            Deferred::Bound(value) => Ok(value),
            Deferred::Placeholder => Err(DeferredError::OutsideHandler),
        }
    }

    /// Access the value.
    ///
    /// # Panics
    ///
    /// Panics when the value is still a placeholder.
    pub fn force(&self) -> &T {
        match self.try_force() {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

// Never forces the value.
impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deferred::Placeholder => f.write_str("Deferred(<placeholder>)"),
            Deferred::Bound(value) => f.debug_tuple("Deferred").field(value).finish(),
        }
    }
}

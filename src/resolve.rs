//! # Runtime-resolved configuration values.
//!
//! Some policy fields (`max_tries`, `max_time`) can be supplied either as a
//! plain literal or as a zero-argument supplier that is consulted fresh on
//! every invocation of the wrapped operation. [`Resolvable`] models that
//! duality explicitly instead of inspecting callables at runtime.
//!
//! Resolution happens **once per invocation**, before the retry loop starts;
//! the resolved value is then fixed for every attempt of that invocation.
//!
//! # Example
//! ```rust
//! use reattempt::Resolvable;
//!
//! let fixed: Resolvable<u32> = 5.into();
//! assert_eq!(fixed.resolve(), 5);
//!
//! let dynamic = Resolvable::supplier(|| 2 + 3);
//! assert_eq!(dynamic.resolve(), 5);
//! ```

use std::fmt;
use std::sync::Arc;

/// A configuration value that is either a literal or a per-invocation supplier.
pub enum Resolvable<T> {
    /// Fixed value, identical for every invocation.
    Literal(T),
    /// Evaluated once per invocation, before the loop starts.
    Supplier(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> Resolvable<T> {
    /// Wraps a supplier closure.
    pub fn supplier<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Resolvable::Supplier(Arc::new(f))
    }

    /// Produces the concrete value for one invocation.
    pub fn resolve(&self) -> T {
        match self {
            Resolvable::Literal(v) => v.clone(),
            Resolvable::Supplier(f) => f(),
        }
    }
}

impl<T> From<T> for Resolvable<T> {
    fn from(value: T) -> Self {
        Resolvable::Literal(value)
    }
}

impl<T: Clone> Clone for Resolvable<T> {
    fn clone(&self) -> Self {
        match self {
            Resolvable::Literal(v) => Resolvable::Literal(v.clone()),
            Resolvable::Supplier(f) => Resolvable::Supplier(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Resolvable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolvable::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Resolvable::Supplier(_) => f.write_str("Supplier(..)"),
        }
    }
}

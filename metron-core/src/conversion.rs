//! Conversion functions
//!
//! A `ConversionFn` is a pure `f64 -> f64` mapping. Units hold two of them,
//! one into their base unit and one back out. Common shapes are kept as plain
//! data so they stay cheap to apply and readable in debug output; anything
//! else is an opaque shared closure.

use std::fmt;
use std::sync::Arc;

type Closure = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

#[derive(Clone)]
enum Repr {
    Identity,
    Multiply(f64),
    Divide(f64),
    Add(f64),
    Custom(Closure),
}

/// A reusable numeric mapping used for unit conversion
#[derive(Clone)]
pub struct ConversionFn {
    repr: Repr,
}

impl ConversionFn {
    /// Wrap an arbitrary function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self { repr: Repr::Custom(Arc::new(f)) }
    }

    /// `x -> x`
    pub fn identity() -> Self {
        Self { repr: Repr::Identity }
    }

    /// `x -> x * factor`
    pub fn multiply(factor: f64) -> Self {
        Self { repr: Repr::Multiply(factor) }
    }

    /// `x -> x / divisor`
    pub fn divide(divisor: f64) -> Self {
        Self { repr: Repr::Divide(divisor) }
    }

    /// `x -> x + offset`
    pub fn add(offset: f64) -> Self {
        Self { repr: Repr::Add(offset) }
    }

    /// Apply the mapping
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        match &self.repr {
            Repr::Identity => x,
            Repr::Multiply(k) => x * k,
            Repr::Divide(k) => x / k,
            Repr::Add(k) => x + k,
            Repr::Custom(f) => f(x),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self.repr, Repr::Identity)
    }

    /// Compose: the result applies `self` first, then `next`.
    pub fn pipe_to(&self, next: &ConversionFn) -> ConversionFn {
        if self.is_identity() {
            return next.clone();
        }
        if next.is_identity() {
            return self.clone();
        }
        let first = self.clone();
        let second = next.clone();
        ConversionFn::new(move |x| second.apply(first.apply(x)))
    }
}

impl Default for ConversionFn {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for ConversionFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Identity => write!(f, "x"),
            Repr::Multiply(k) => write!(f, "x * {}", k),
            Repr::Divide(k) => write!(f, "x / {}", k),
            Repr::Add(k) => write!(f, "x + {}", k),
            Repr::Custom(_) => write!(f, "<fn>"),
        }
    }
}

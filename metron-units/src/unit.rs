//! Unit representation with conversion functions

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use metron_core::{ConversionFn, Dimension, Result, UnitsError};
use crate::builder::UnitBuilder;
use crate::combinator::COMBINATORS;
use crate::Measure;

/// The threshold for two values to be considered equivalent.
/// This is only needed due to floating-point error.
pub const EQUIVALENCE_THRESHOLD: f64 = 1e-12;

/// Non-integral values fed through both units by [`Unit::equivalent`]
pub const EQUIVALENCE_PROBES: [f64; 2] = [16_777.214, -0.027_182_818_284];

static NEXT_UNIT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique identity of a unit instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(u64);

impl UnitId {
    fn next() -> Self {
        UnitId(NEXT_UNIT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// How a unit was assembled from other units
#[derive(Debug, Clone)]
pub enum Composition {
    /// A base unit, or a unit derived from one by the builder
    Simple,
    /// `numerator / denominator`
    Per { numerator: Unit, denominator: Unit },
    /// `a * b`
    Mult { a: Unit, b: Unit },
    /// `numerator / period`, where the period is a unit of time
    Velocity { numerator: Unit, period: Unit },
}

struct UnitData {
    id: UnitId,
    dimension: Dimension,
    to_base: ConversionFn,
    from_base: ConversionFn,
    name: String,
    symbol: String,
    composition: Composition,
}

/// A unit of measurement, such as meters, seconds or volts.
///
/// Units are immutable shared handles: cloning is cheap and clones compare
/// equal. Equality is identity; use [`Unit::equivalent`] to compare two
/// separately built units numerically.
#[derive(Clone)]
pub struct Unit {
    inner: Arc<UnitData>,
}

impl Unit {
    /// Create a unit from an explicit pair of conversion functions
    pub fn new(
        dimension: Dimension,
        to_base: ConversionFn,
        from_base: ConversionFn,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self::with_composition(dimension, to_base, from_base, name.into(), symbol.into(), Composition::Simple)
    }

    /// Create a unit that is `base_unit_equivalent` times the base unit of its dimension.
    ///
    /// The scale must be a positive, finite number.
    pub fn with_scale(
        dimension: Dimension,
        base_unit_equivalent: f64,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Result<Self> {
        check_scale(base_unit_equivalent)?;
        Ok(Self::new(
            dimension,
            ConversionFn::multiply(base_unit_equivalent),
            ConversionFn::divide(base_unit_equivalent),
            name,
            symbol,
        ))
    }

    pub(crate) fn with_composition(
        dimension: Dimension,
        to_base: ConversionFn,
        from_base: ConversionFn,
        name: String,
        symbol: String,
        composition: Composition,
    ) -> Self {
        Unit {
            inner: Arc::new(UnitData {
                id: UnitId::next(),
                dimension,
                to_base,
                from_base,
                name,
                symbol,
                composition,
            }),
        }
    }

    /// Linear unit assembled by a combinator
    pub(crate) fn linear(
        dimension: Dimension,
        factor: f64,
        name: String,
        symbol: String,
        composition: Composition,
    ) -> Self {
        Self::with_composition(
            dimension,
            ConversionFn::multiply(factor),
            ConversionFn::divide(factor),
            name,
            symbol,
            composition,
        )
    }

    pub fn id(&self) -> UnitId {
        self.inner.id
    }

    pub fn dimension(&self) -> &Dimension {
        &self.inner.dimension
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn symbol(&self) -> &str {
        &self.inner.symbol
    }

    pub fn composition(&self) -> &Composition {
        &self.inner.composition
    }

    pub fn converter_to_base(&self) -> &ConversionFn {
        &self.inner.to_base
    }

    pub fn converter_from_base(&self) -> &ConversionFn {
        &self.inner.from_base
    }

    /// Convert a value in this unit to the base unit of its dimension
    #[inline]
    pub fn to_base(&self, value: f64) -> f64 {
        self.inner.to_base.apply(value)
    }

    /// Convert a value in the base unit of this dimension to this unit
    #[inline]
    pub fn from_base(&self, value: f64) -> f64 {
        self.inner.from_base.apply(value)
    }

    /// Check if two units measure the same kind of quantity
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension() == other.dimension()
    }

    pub(crate) fn ensure_compatible(&self, other: &Unit, operation: &'static str) -> Result<()> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(UnitsError::dimension_mismatch(operation, self.dimension(), other.dimension()))
        }
    }

    /// Convert `value`, expressed in `other`, into this unit.
    ///
    /// `Feet.convert(12.0, &Inches)` is `1.0`.
    pub fn convert(&self, value: f64, other: &Unit) -> Result<f64> {
        self.ensure_compatible(other, "convert")?;
        Ok(self.from_base(other.to_base(value)))
    }

    /// Create a measure of this unit
    pub fn of(&self, magnitude: f64) -> Measure {
        Measure::new(magnitude, self.clone())
    }

    /// Create a measure of this unit from a magnitude in base units
    pub fn of_base_units(&self, base_magnitude: f64) -> Measure {
        Measure::new(self.from_base(base_magnitude), self.clone())
    }

    /// Ratio of this unit to `other`. Dividing by a unit of time yields a
    /// velocity-family unit. Results are cached per pair of units.
    pub fn per(&self, other: &Unit) -> Unit {
        COMBINATORS.per(self, other)
    }

    /// Product of this unit with `other`. Results are cached per pair of units.
    pub fn times(&self, other: &Unit) -> Unit {
        COMBINATORS.product(self, other)
    }

    /// Start deriving a new unit from this one
    pub fn derive(&self) -> UnitBuilder {
        UnitBuilder::derive(self)
    }

    /// A unit where one of the new unit equals `scale` of this one
    pub fn multiply(&self, scale: f64) -> Result<Unit> {
        check_scale(scale)?;
        self.derive()
            .aggregate(scale)
            .named(format!("{} {}", scale, self.name()))
            .symbol(format!("{}{}", scale, self.symbol()))
            .make()
    }

    /// A unit where `scale` of the new unit equal one of this one.
    ///
    /// Same as `multiply(1.0 / scale)`.
    pub fn divide(&self, scale: f64) -> Result<Unit> {
        check_scale(scale)?;
        self.multiply(1.0 / scale)
    }

    /// Numeric equivalence: same dimension, and both conversion directions
    /// agree on the probe values within the equivalence threshold.
    pub fn equivalent(&self, other: &Unit) -> bool {
        if !self.is_compatible(other) {
            return false;
        }
        if self == other {
            return true;
        }
        EQUIVALENCE_PROBES.iter().all(|&probe| {
            approx_eq(self.to_base(probe), other.to_base(probe))
                && approx_eq(self.from_base(probe), other.from_base(probe))
        })
    }
}

fn check_scale(scale: f64) -> Result<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(UnitsError::invalid_argument(format!(
            "multiplier to base unit must be a positive number, given {}",
            scale
        )))
    }
}

/// Threshold comparison, relative for magnitudes above one
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EQUIVALENCE_THRESHOLD * a.abs().max(b.abs()).max(1.0)
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("id", &self.inner.id)
            .field("symbol", &self.inner.symbol)
            .field("dimension", &self.inner.dimension)
            .finish()
    }
}

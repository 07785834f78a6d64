//! In-place measures for allocation-averse loops

use std::fmt;
use metron_core::{ConversionFn, Result};
use crate::measure::{format_scientific, Measure};
use crate::unit::Unit;

/// A measure whose magnitude and unit can be updated in place.
///
/// Single-owner: every mutator takes `&mut self`. Wrap it in a lock to share
/// it across threads, or take a [`snapshot`](MutableMeasure::snapshot) and
/// share that instead.
#[derive(Debug, Clone)]
pub struct MutableMeasure {
    magnitude: f64,
    unit: Unit,
}

impl MutableMeasure {
    pub fn new(magnitude: f64, unit: Unit) -> Self {
        MutableMeasure { magnitude, unit }
    }

    pub fn zero(unit: Unit) -> Self {
        Self::new(0.0, unit)
    }

    /// A zeroed accumulator in the same unit as `measure`
    pub fn mutable(measure: &Measure) -> Self {
        Self::zero(measure.unit().clone())
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn base_unit_magnitude(&self) -> f64 {
        self.unit.to_base(self.magnitude)
    }

    pub fn set_magnitude(&mut self, magnitude: f64) -> &mut Self {
        self.magnitude = magnitude;
        self
    }

    pub fn mut_times(&mut self, scalar: f64) -> &mut Self {
        self.magnitude *= scalar;
        self
    }

    pub fn mut_divide(&mut self, divisor: f64) -> &mut Self {
        self.magnitude /= divisor;
        self
    }

    /// Add a raw magnitude, already in this measure's unit
    pub fn acc(&mut self, raw: f64) -> &mut Self {
        self.magnitude += raw;
        self
    }

    /// Add another measure, converted into this measure's unit first
    pub fn acc_measure(&mut self, other: &Measure) -> Result<&mut Self> {
        let magnitude = other.in_unit(&self.unit)?;
        Ok(self.acc(magnitude))
    }

    /// Add `magnitude` expressed in `unit`
    pub fn acc_in(&mut self, magnitude: f64, unit: &Unit) -> Result<&mut Self> {
        let converted = self.unit.convert(magnitude, unit)?;
        Ok(self.acc(converted))
    }

    /// Overwrite both magnitude and unit with those of `other`, which must
    /// have the same dimension
    pub fn replace(&mut self, other: &Measure) -> Result<&mut Self> {
        self.replace_with(other.magnitude(), other.unit())
    }

    /// Overwrite both magnitude and unit; the unit must keep the dimension
    pub fn replace_with(&mut self, magnitude: f64, unit: &Unit) -> Result<&mut Self> {
        self.unit.ensure_compatible(unit, "replace")?;
        self.magnitude = magnitude;
        self.unit = unit.clone();
        Ok(self)
    }

    pub fn in_unit(&self, unit: &Unit) -> Result<f64> {
        if *unit == self.unit {
            return Ok(self.magnitude);
        }
        unit.convert(self.magnitude, &self.unit)
    }

    /// Immutable copy of the current state
    pub fn snapshot(&self) -> Measure {
        Measure::new(self.magnitude, self.unit.clone())
    }
}

impl From<&MutableMeasure> for Measure {
    fn from(measure: &MutableMeasure) -> Self {
        measure.snapshot()
    }
}

impl fmt::Display for MutableMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_scientific(self.magnitude), self.unit.symbol())
    }
}

/// A mutable measure that runs every incoming value through a filter.
///
/// The filter sees values already converted into the measure's unit.
#[derive(Debug, Clone)]
pub struct FilteredMeasure {
    raw: MutableMeasure,
    filter: ConversionFn,
}

impl FilteredMeasure {
    pub fn new(unit: Unit, filter: ConversionFn) -> Self {
        FilteredMeasure { raw: MutableMeasure::zero(unit), filter }
    }

    /// A pass-through filter
    pub fn unfiltered(unit: Unit) -> Self {
        Self::new(unit, ConversionFn::identity())
    }

    /// Store the filtered value of `input`
    pub fn update(&mut self, input: &Measure) -> Result<&mut Self> {
        let value = input.in_unit(self.raw.unit())?;
        self.raw.set_magnitude(self.filter.apply(value));
        Ok(self)
    }

    pub fn current(&self) -> Measure {
        self.raw.snapshot()
    }

    pub fn magnitude(&self) -> f64 {
        self.raw.magnitude()
    }

    pub fn unit(&self) -> &Unit {
        self.raw.unit()
    }
}

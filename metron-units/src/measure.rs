//! Measure type - a magnitude with an associated unit

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Div, Mul, Neg};
use metron_core::{Dimension, Result, UnitsError};
use crate::base::base_unit;
use crate::combinator::COMBINATORS;
use crate::unit::{Composition, Unit, EQUIVALENCE_THRESHOLD};

/// An immutable physical measurement: a magnitude expressed in a unit.
///
/// Arithmetic returns new measures. `==` means the same unit instance and
/// the same magnitude; use [`Measure::is_equivalent`] to compare measures
/// expressed in different units.
#[derive(Debug, Clone)]
pub struct Measure {
    magnitude: f64,
    unit: Unit,
}

impl Measure {
    pub fn new(magnitude: f64, unit: Unit) -> Self {
        Measure { magnitude, unit }
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn dimension(&self) -> &Dimension {
        self.unit.dimension()
    }

    /// Magnitude converted into the base unit of this dimension
    pub fn base_unit_magnitude(&self) -> f64 {
        self.unit.to_base(self.magnitude)
    }

    /// Magnitude of this measure expressed in `unit`
    pub fn in_unit(&self, unit: &Unit) -> Result<f64> {
        if *unit == self.unit {
            return Ok(self.magnitude);
        }
        unit.convert(self.magnitude, &self.unit)
    }

    /// This measure expressed in `unit`
    pub fn to(&self, unit: &Unit) -> Result<Measure> {
        Ok(unit.of(self.in_unit(unit)?))
    }

    pub fn times(&self, scalar: f64) -> Measure {
        self.unit.of(self.magnitude * scalar)
    }

    /// Multiply by another measure.
    ///
    /// The result unit follows the first matching rule:
    /// 1. a dimensionless `other` scales this measure;
    /// 2. `N per D` times a `D` gives an `N`;
    /// 3. a velocity of `X` times a time gives an `X`;
    /// 4. two reciprocal ratios give a dimensionless value;
    /// 5. anything else gives the product unit.
    ///
    /// Tags are never rewritten: volts times amps is a `V·A` product with
    /// the power magnitude in base units, not a measure in watts, and does
    /// not convert to watts. Use [`UnitCatalog::power`](crate::UnitCatalog::power)
    /// for electrical power.
    pub fn times_measure(&self, other: &Measure) -> Measure {
        let other_dimension = other.dimension();
        if other_dimension.is_dimensionless() {
            return self.times(other.base_unit_magnitude());
        }

        let base_product = self.base_unit_magnitude() * other.base_unit_magnitude();
        match (self.dimension(), self.unit.composition()) {
            (Dimension::Per(numerator, denominator), composition) if **denominator == *other_dimension => {
                let unit = match composition {
                    Composition::Per { numerator, .. } => numerator.clone(),
                    _ => base_unit(numerator),
                };
                return unit.of_base_units(base_product);
            }
            (Dimension::Velocity(inner), composition) if other_dimension.is_time() => {
                let unit = match composition {
                    Composition::Velocity { numerator, .. } => numerator.clone(),
                    _ => base_unit(inner),
                };
                return unit.of_base_units(base_product);
            }
            _ => {}
        }

        if self.dimension().is_reciprocal_of(other_dimension) {
            return base_unit(&Dimension::Unitless).of(base_product);
        }

        COMBINATORS.product(&self.unit, &other.unit).of_base_units(base_product)
    }

    pub fn divide(&self, divisor: f64) -> Measure {
        self.unit.of(self.magnitude / divisor)
    }

    /// Divide by a dimensionless measure
    pub fn divide_measure(&self, divisor: &Measure) -> Result<Measure> {
        if !divisor.dimension().is_dimensionless() {
            return Err(UnitsError::dimension_mismatch(
                "divide",
                &Dimension::Unitless,
                divisor.dimension(),
            ));
        }
        Ok(self.divide(divisor.base_unit_magnitude()))
    }

    /// Rate of this measure over the given period of time.
    ///
    /// The magnitude is kept; the unit becomes "this unit per `period`",
    /// e.g. 144 Kg per 53 ms is `144 Kg/53ms`. Rate units are cached, so
    /// repeating the call with the same period returns the same unit.
    pub fn per(&self, period: &Measure) -> Result<Measure> {
        let unit = COMBINATORS.rate(&self.unit, &period.unit, period.magnitude)?;
        Ok(unit.of(self.magnitude))
    }

    /// Same magnitude, expressed as a ratio of this unit to `unit`
    pub fn per_unit(&self, unit: &Unit) -> Measure {
        self.unit.per(unit).of(self.magnitude)
    }

    /// Sum in this measure's unit
    pub fn add(&self, other: &Measure) -> Result<Measure> {
        let other_magnitude = self.compatible_magnitude(other, "add")?;
        Ok(self.unit.of(self.magnitude + other_magnitude))
    }

    /// Difference in this measure's unit
    pub fn subtract(&self, other: &Measure) -> Result<Measure> {
        let other_magnitude = self.compatible_magnitude(other, "subtract")?;
        Ok(self.unit.of(self.magnitude - other_magnitude))
    }

    fn compatible_magnitude(&self, other: &Measure, operation: &'static str) -> Result<f64> {
        self.unit.ensure_compatible(&other.unit, operation)?;
        other.in_unit(&self.unit)
    }

    pub fn negate(&self) -> Measure {
        self.unit.of(-self.magnitude)
    }

    /// Order by base unit magnitude; `None` across dimensions
    pub fn compare(&self, other: &Measure) -> Option<Ordering> {
        if !self.unit.is_compatible(&other.unit) {
            return None;
        }
        self.base_unit_magnitude().partial_cmp(&other.base_unit_magnitude())
    }

    pub fn gt(&self, other: &Measure) -> bool {
        matches!(self.compare(other), Some(Ordering::Greater))
    }

    pub fn gte(&self, other: &Measure) -> bool {
        matches!(self.compare(other), Some(Ordering::Greater | Ordering::Equal))
    }

    pub fn lt(&self, other: &Measure) -> bool {
        matches!(self.compare(other), Some(Ordering::Less))
    }

    pub fn lte(&self, other: &Measure) -> bool {
        matches!(self.compare(other), Some(Ordering::Less | Ordering::Equal))
    }

    /// Within `tolerance`, relative to `other`: `is_near(&x, 0.05)` is
    /// true for anything within 5% of `x`
    pub fn is_near(&self, other: &Measure, tolerance: f64) -> bool {
        if !self.unit.is_compatible(&other.unit) {
            return false;
        }
        let other_base = other.base_unit_magnitude();
        (self.base_unit_magnitude() - other_base).abs() <= (other_base * tolerance).abs()
    }

    /// Same dimension and base unit magnitudes within [`EQUIVALENCE_THRESHOLD`]
    pub fn is_equivalent(&self, other: &Measure) -> bool {
        self.unit.is_compatible(&other.unit)
            && (self.base_unit_magnitude() - other.base_unit_magnitude()).abs() <= EQUIVALENCE_THRESHOLD
    }

    /// Scientific magnitude and symbol, e.g. `3.430e+02 V`
    pub fn to_short_string(&self) -> String {
        format!("{} {}", format_scientific(self.magnitude), self.unit.symbol())
    }

    /// Plain magnitude and unit name, e.g. `343.0 Volt` or `1.0E20 Volt`
    pub fn to_long_string(&self) -> String {
        format!("{} {}", format_plain(self.magnitude), self.unit.name())
    }
}

/// Decimal notation in `[1e-3, 1e7)`, otherwise `1.25E-7` style
fn format_plain(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() || magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{:?}", value);
    }
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => format!("{}E{}", mantissa, exponent),
        Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
        None => formatted,
    }
}

/// `{:.3e}` with a signed, two-digit exponent
pub(crate) fn format_scientific(value: f64) -> String {
    let formatted = format!("{:.3e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            Err(_) => formatted,
        },
        None => formatted,
    }
}

impl PartialEq for Measure {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && self.magnitude == other.magnitude
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_short_string())
    }
}

impl Neg for Measure {
    type Output = Measure;

    fn neg(self) -> Measure {
        self.negate()
    }
}

impl Mul<f64> for Measure {
    type Output = Measure;

    fn mul(self, scalar: f64) -> Measure {
        self.times(scalar)
    }
}

impl Div<f64> for Measure {
    type Output = Measure;

    fn div(self, divisor: f64) -> Measure {
        self.divide(divisor)
    }
}

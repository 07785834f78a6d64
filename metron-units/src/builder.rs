//! Declarative construction of new units from an existing one
//!
//! ```ignore
//! let feet = UnitBuilder::derive(&inches)
//!     .aggregate(12.0)
//!     .named("Foot")
//!     .symbol("ft")
//!     .make()?;
//! ```
//!
//! Conversions given to the builder map between the new unit and `base`.
//! `make()` composes them with `base`'s own conversions, so the result
//! converts straight to the base unit of the dimension.

use metron_core::{ConversionFn, Result, UnitsError};
use crate::unit::{Composition, Unit};

/// Builder for units derived from an existing unit
#[derive(Debug, Clone)]
#[must_use]
pub struct UnitBuilder {
    base: Unit,
    to_base: Option<ConversionFn>,
    from_base: Option<ConversionFn>,
    name: Option<String>,
    symbol: Option<String>,
    error: Option<UnitsError>,
}

impl UnitBuilder {
    pub fn derive(base: &Unit) -> Self {
        UnitBuilder {
            base: base.clone(),
            to_base: None,
            from_base: None,
            name: None,
            symbol: None,
            error: None,
        }
    }

    /// New unit is `base` shifted by `offset`: `base = new + offset`
    pub fn offset(self, offset: f64) -> Self {
        self.conversions(ConversionFn::add(offset), ConversionFn::add(-offset))
    }

    /// Start a two-point linear remapping. The input range is in the base
    /// unit; finish with [`MappingBuilder::to_output_range`].
    pub fn mapping_input_range(self, min_input: f64, max_input: f64) -> MappingBuilder {
        MappingBuilder { builder: self, min_input, max_input }
    }

    /// `amount` of the new unit equal one of the base unit
    pub fn split_into(mut self, amount: f64) -> Self {
        if !self.accept_amount("split_into", amount) {
            return self;
        }
        self.conversions(ConversionFn::divide(amount), ConversionFn::multiply(amount))
    }

    /// One of the new unit equals `amount` of the base unit
    pub fn aggregate(mut self, amount: f64) -> Self {
        if !self.accept_amount("aggregate", amount) {
            return self;
        }
        self.conversions(ConversionFn::multiply(amount), ConversionFn::divide(amount))
    }

    /// Conversion from the new unit into the base unit
    pub fn to_base(mut self, f: ConversionFn) -> Self {
        self.to_base = Some(f);
        self
    }

    /// Conversion from the base unit into the new unit
    pub fn from_base(mut self, f: ConversionFn) -> Self {
        self.from_base = Some(f);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    fn conversions(self, to_base: ConversionFn, from_base: ConversionFn) -> Self {
        self.to_base(to_base).from_base(from_base)
    }

    // A rejected argument is held until make(), so chains stay fluent.
    fn accept_amount(&mut self, operation: &str, amount: f64) -> bool {
        if amount != 0.0 && amount.is_finite() {
            return true;
        }
        if self.error.is_none() {
            self.error = Some(UnitsError::invalid_argument(format!(
                "{} amount must be finite and non-zero, given {}",
                operation, amount
            )));
        }
        false
    }

    /// Build the unit.
    ///
    /// Fails with the first argument error recorded while configuring, then
    /// with `MissingConfiguration` for the first unset field.
    pub fn make(self) -> Result<Unit> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let to_base = self.to_base.ok_or(UnitsError::MissingConfiguration("toBase function"))?;
        let from_base = self.from_base.ok_or(UnitsError::MissingConfiguration("fromBase function"))?;
        let name = self.name.ok_or(UnitsError::MissingConfiguration("name"))?;
        let symbol = self.symbol.ok_or(UnitsError::MissingConfiguration("symbol"))?;

        let base = self.base;
        let unit = Unit::with_composition(
            base.dimension().clone(),
            to_base.pipe_to(base.converter_to_base()),
            base.converter_from_base().pipe_to(&from_base),
            name,
            symbol,
            Composition::Simple,
        );
        tracing::trace!(symbol = unit.symbol(), base = base.symbol(), "derived unit");
        Ok(unit)
    }
}

/// Second half of a range mapping started by [`UnitBuilder::mapping_input_range`]
#[derive(Debug, Clone)]
#[must_use]
pub struct MappingBuilder {
    builder: UnitBuilder,
    min_input: f64,
    max_input: f64,
}

impl MappingBuilder {
    /// Map `[min_input, max_input]` in the base unit onto
    /// `[min_output, max_output]` in the new unit, linearly.
    pub fn to_output_range(self, min_output: f64, max_output: f64) -> UnitBuilder {
        let (min_input, max_input) = (self.min_input, self.max_input);
        self.builder.conversions(
            ConversionFn::new(move |x| map_range(x, min_output, max_output, min_input, max_input)),
            ConversionFn::new(move |x| map_range(x, min_input, max_input, min_output, max_output)),
        )
    }
}

fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

#[cfg(test)]
mod tests {
    use super::*;
    use metron_core::Dimension;

    fn meter() -> Unit {
        Unit::with_scale(Dimension::Distance, 1.0, "Meter", "m").unwrap()
    }

    fn kelvin() -> Unit {
        Unit::with_scale(Dimension::Temperature, 1.0, "Kelvin", "K").unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_aggregate() {
        let m = meter();
        let km = UnitBuilder::derive(&m).aggregate(1000.0).named("Kilometer").symbol("km").make().unwrap();
        assert_eq!(km.name(), "Kilometer");
        assert_eq!(km.symbol(), "km");
        assert_eq!(km.dimension(), &Dimension::Distance);
        assert!(close(km.to_base(2.0), 2000.0));
        assert!(close(m.convert(1.0, &km).unwrap(), 1000.0));
    }

    #[test]
    fn test_split_into() {
        let m = meter();
        let cm = UnitBuilder::derive(&m).split_into(100.0).named("Centimeter").symbol("cm").make().unwrap();
        assert!(close(m.convert(100.0, &cm).unwrap(), 1.0));
    }

    #[test]
    fn test_aggregate_is_split_into_reciprocal() {
        let m = meter();
        let a = UnitBuilder::derive(&m).aggregate(4.0).named("A").symbol("a").make().unwrap();
        let b = UnitBuilder::derive(&m).split_into(0.25).named("B").symbol("b").make().unwrap();
        assert!(a.equivalent(&b));
    }

    #[test]
    fn test_composes_with_base_conversions() {
        let mm = UnitBuilder::derive(&meter()).split_into(1000.0).named("Millimeter").symbol("mm").make().unwrap();
        let inch = UnitBuilder::derive(&mm).aggregate(25.4).named("Inch").symbol("in").make().unwrap();
        assert!(close(inch.to_base(1.0), 0.0254));
        assert!(close(inch.from_base(0.0254), 1.0));
    }

    #[test]
    fn test_offset() {
        let c = UnitBuilder::derive(&kelvin()).offset(273.15).named("Celsius").symbol("°C").make().unwrap();
        assert!(close(c.to_base(0.0), 273.15));
        assert!(close(c.from_base(0.0), -273.15));
    }

    #[test]
    fn test_range_mapping() {
        let c = UnitBuilder::derive(&kelvin()).offset(273.15).named("Celsius").symbol("°C").make().unwrap();
        let f = UnitBuilder::derive(&c)
            .mapping_input_range(0.0, 100.0)
            .to_output_range(32.0, 212.0)
            .named("Fahrenheit")
            .symbol("°F")
            .make()
            .unwrap();

        assert!(close(c.convert(32.0, &f).unwrap(), 0.0));
        assert!(close(c.convert(212.0, &f).unwrap(), 100.0));
        assert!(close(f.convert(-40.0, &c).unwrap(), -40.0));
        assert!(close(f.to_base(32.0), 273.15));
    }

    #[test]
    fn test_custom_conversions() {
        let half = UnitBuilder::derive(&meter())
            .to_base(ConversionFn::new(|x| x / 2.0))
            .from_base(ConversionFn::new(|x| x * 2.0))
            .named("Half")
            .symbol("h")
            .make()
            .unwrap();
        assert!(close(half.to_base(3.0), 1.5));
    }

    #[test]
    fn test_missing_configuration_order() {
        let m = meter();
        let err = UnitBuilder::derive(&m).named("X").symbol("x").make().unwrap_err();
        assert_eq!(err, UnitsError::MissingConfiguration("toBase function"));

        let err = UnitBuilder::derive(&m).to_base(ConversionFn::identity()).make().unwrap_err();
        assert_eq!(err, UnitsError::MissingConfiguration("fromBase function"));

        let err = UnitBuilder::derive(&m).aggregate(2.0).symbol("x").make().unwrap_err();
        assert_eq!(err, UnitsError::MissingConfiguration("name"));

        let err = UnitBuilder::derive(&m).aggregate(2.0).named("X").make().unwrap_err();
        assert_eq!(err, UnitsError::MissingConfiguration("symbol"));
    }

    #[test]
    fn test_zero_amount_is_invalid() {
        let m = meter();
        let err = UnitBuilder::derive(&m).split_into(0.0).named("X").symbol("x").make().unwrap_err();
        assert!(matches!(err, UnitsError::InvalidArgument(_)));

        let err = UnitBuilder::derive(&m).aggregate(0.0).make().unwrap_err();
        assert!(matches!(err, UnitsError::InvalidArgument(_)));
    }

    #[test]
    fn test_non_finite_amount_is_invalid() {
        let m = meter();
        for amount in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = UnitBuilder::derive(&m).split_into(amount).named("X").symbol("x").make().unwrap_err();
            assert!(matches!(err, UnitsError::InvalidArgument(_)), "split_into {}", amount);

            let err = UnitBuilder::derive(&m).aggregate(amount).named("X").symbol("x").make().unwrap_err();
            assert!(matches!(err, UnitsError::InvalidArgument(_)), "aggregate {}", amount);
        }
    }

    #[test]
    fn test_inherits_compound_dimension() {
        let s = Unit::with_scale(Dimension::Time, 1.0, "Second", "s").unwrap();
        let mps = meter().per(&s);
        let kph = UnitBuilder::derive(&mps).split_into(3.6).named("Kilometer per Hour").symbol("km/h").make().unwrap();
        assert_eq!(kph.dimension(), &Dimension::Distance.velocity());
        assert!(matches!(kph.composition(), Composition::Simple));
        assert!(close(kph.to_base(36.0), 10.0));
    }
}

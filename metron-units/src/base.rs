//! Base units, one per dimension

use std::sync::LazyLock;
use metron_core::{ConversionFn, Dimension};
use crate::combinator::COMBINATORS;
use crate::unit::Unit;

struct BaseUnits {
    meter: Unit,
    second: Unit,
    kilogram: Unit,
    revolution: Unit,
    value: Unit,
    volt: Unit,
    amp: Unit,
    joule: Unit,
    watt: Unit,
    kelvin: Unit,
}

static BASE_UNITS: LazyLock<BaseUnits> = LazyLock::new(|| BaseUnits {
    meter: identity(Dimension::Distance, "Meter", "m"),
    second: identity(Dimension::Time, "Second", "s"),
    kilogram: identity(Dimension::Mass, "Kilogram", "Kg"),
    revolution: identity(Dimension::Angle, "Revolution", "R"),
    value: identity(Dimension::Unitless, "Value", "<?>"),
    volt: identity(Dimension::ElectricPotential, "Volt", "V"),
    amp: identity(Dimension::ElectricCurrent, "Amp", "A"),
    joule: identity(Dimension::Energy, "Joule", "J"),
    watt: identity(Dimension::Power, "Watt", "W"),
    kelvin: identity(Dimension::Temperature, "Kelvin", "K"),
});

fn identity(dimension: Dimension, name: &str, symbol: &str) -> Unit {
    Unit::new(dimension, ConversionFn::identity(), ConversionFn::identity(), name, symbol)
}

/// The base unit of a dimension.
///
/// Simple dimensions map to a fixed unit with identity conversions. Compound
/// dimensions yield the combinator of their constituents' base units, taken
/// from the global combinator cache, so repeated calls return the same unit.
pub fn base_unit(dimension: &Dimension) -> Unit {
    let base = &*BASE_UNITS;
    match dimension {
        Dimension::Distance => base.meter.clone(),
        Dimension::Time => base.second.clone(),
        Dimension::Mass => base.kilogram.clone(),
        Dimension::Angle => base.revolution.clone(),
        Dimension::Unitless => base.value.clone(),
        Dimension::ElectricPotential => base.volt.clone(),
        Dimension::ElectricCurrent => base.amp.clone(),
        Dimension::Energy => base.joule.clone(),
        Dimension::Power => base.watt.clone(),
        Dimension::Temperature => base.kelvin.clone(),
        Dimension::Velocity(inner) => COMBINATORS.per(&base_unit(inner), &base.second),
        Dimension::Per(numerator, denominator) => {
            COMBINATORS.ratio(&base_unit(numerator), &base_unit(denominator))
        }
        Dimension::Mult(a, b) => COMBINATORS.product(&base_unit(a), &base_unit(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_base_units() {
        for dimension in Dimension::SIMPLE.iter() {
            let unit = base_unit(dimension);
            assert_eq!(unit.dimension(), dimension);
            assert_eq!(unit.to_base(42.5), 42.5);
            assert_eq!(unit.from_base(42.5), 42.5);
            assert_eq!(base_unit(dimension), unit);
        }
    }

    #[test]
    fn test_symbols() {
        assert_eq!(base_unit(&Dimension::Mass).symbol(), "Kg");
        assert_eq!(base_unit(&Dimension::Unitless).symbol(), "<?>");
        assert_eq!(base_unit(&Dimension::Angle).name(), "Revolution");
    }

    #[test]
    fn test_compound_base_units() {
        let speed = base_unit(&Dimension::Distance.velocity());
        assert_eq!(speed.symbol(), "m/s");
        assert_eq!(speed.dimension(), &Dimension::Distance.velocity());
        assert_eq!(base_unit(&Dimension::Distance.velocity()), speed);

        let accel = base_unit(&Dimension::Distance.velocity().velocity());
        assert_eq!(accel.symbol(), "m/s/s");
        assert_eq!(accel.to_base(3.0), 3.0);

        let ratio = base_unit(&Dimension::Mass.per(&Dimension::Angle));
        assert_eq!(ratio.symbol(), "Kg/R");

        let product = base_unit(&Dimension::ElectricPotential.times(&Dimension::ElectricCurrent));
        assert_eq!(product.symbol(), "V·A");
        assert_eq!(product.to_base(1.0), 1.0);
    }
}

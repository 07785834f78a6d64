//! Unit definitions - common units organized by dimension
//!
//! Everything here is built from the base units with the builder and the
//! combinators; nothing is special-cased.

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::sync::LazyLock;
use metron_core::{Dimension, Result, UnitsError};
use crate::base::base_unit;
use crate::builder::UnitBuilder;
use crate::{Measure, Unit};

/// Global unit catalog
pub static UNITS: LazyLock<UnitCatalog> = LazyLock::new(|| {
    UnitCatalog::new().expect("built-in unit definitions are valid")
});

/// Catalog of predefined units
pub struct UnitCatalog {
    // Distance
    pub meters: Unit,
    pub millimeters: Unit,
    pub centimeters: Unit,
    pub inches: Unit,
    pub feet: Unit,

    // Time
    pub seconds: Unit,
    pub milliseconds: Unit,
    pub minutes: Unit,

    // Velocity
    pub meters_per_second: Unit,
    pub feet_per_second: Unit,
    pub inches_per_second: Unit,

    // Acceleration
    pub meters_per_second_per_second: Unit,
    pub gs: Unit,

    // Mass
    pub kilograms: Unit,
    pub grams: Unit,
    pub pounds: Unit,
    pub ounces: Unit,

    // Angle
    pub revolutions: Unit,
    pub radians: Unit,
    pub degrees: Unit,

    // Unitless
    pub value: Unit,
    pub percent: Unit,

    // Electrical
    pub volts: Unit,
    pub millivolts: Unit,
    pub amps: Unit,
    pub milliamps: Unit,

    // Energy
    pub joules: Unit,
    pub millijoules: Unit,
    pub kilojoules: Unit,

    // Power
    pub watts: Unit,
    pub milliwatts: Unit,
    pub horsepower: Unit,

    // Temperature
    pub kelvin: Unit,
    pub celsius: Unit,
    pub fahrenheit: Unit,

    by_symbol: HashMap<String, Unit>,
    by_name: HashMap<String, Unit>,
}

impl UnitCatalog {
    pub fn new() -> Result<Self> {
        let meters = base_unit(&Dimension::Distance);
        let millimeters = milli(&meters)?;
        let centimeters = derive(&meters).split_into(100.0).named("Centimeter").symbol("cm").make()?;
        let inches = derive(&millimeters).aggregate(25.4).named("Inch").symbol("in").make()?;
        let feet = derive(&inches).aggregate(12.0).named("Foot").symbol("ft").make()?;

        let seconds = base_unit(&Dimension::Time);
        let milliseconds = milli(&seconds)?;
        let minutes = derive(&seconds).aggregate(60.0).named("Minute").symbol("min").make()?;

        let meters_per_second = meters.per(&seconds);
        let feet_per_second = feet.per(&seconds);
        let inches_per_second = inches.per(&seconds);

        let meters_per_second_per_second = meters_per_second.per(&seconds);
        let gs = derive(&meters_per_second_per_second).aggregate(9.807).named("G").symbol("G").make()?;

        let kilograms = base_unit(&Dimension::Mass);
        let grams = milli_named(&kilograms, "Gram", "g")?;
        let pounds = derive(&grams).aggregate(453.592).named("Pound").symbol("lb.").make()?;
        let ounces = derive(&pounds).split_into(16.0).named("Ounce").symbol("oz.").make()?;

        let revolutions = base_unit(&Dimension::Angle);
        let radians = derive(&revolutions).split_into(TAU).named("Radian").symbol("rad").make()?;
        let degrees = derive(&revolutions).split_into(360.0).named("Degree").symbol("°").make()?;

        let value = base_unit(&Dimension::Unitless);
        let percent = derive(&value).split_into(100.0).named("Percent").symbol("%").make()?;

        let volts = base_unit(&Dimension::ElectricPotential);
        let millivolts = milli(&volts)?;
        let amps = base_unit(&Dimension::ElectricCurrent);
        let milliamps = milli(&amps)?;

        let joules = base_unit(&Dimension::Energy);
        let millijoules = milli(&joules)?;
        let kilojoules = kilo(&joules)?;

        let watts = base_unit(&Dimension::Power);
        let milliwatts = milli(&watts)?;
        let horsepower = derive(&watts).aggregate(745.7).named("Horsepower").symbol("HP").make()?;

        let kelvin = base_unit(&Dimension::Temperature);
        let celsius = derive(&kelvin).offset(273.15).named("Celsius").symbol("°C").make()?;
        let fahrenheit = derive(&celsius)
            .mapping_input_range(0.0, 100.0)
            .to_output_range(32.0, 212.0)
            .named("Fahrenheit")
            .symbol("°F")
            .make()?;

        let mut catalog = UnitCatalog {
            meters, millimeters, centimeters, inches, feet,
            seconds, milliseconds, minutes,
            meters_per_second, feet_per_second, inches_per_second,
            meters_per_second_per_second, gs,
            kilograms, grams, pounds, ounces,
            revolutions, radians, degrees,
            value, percent,
            volts, millivolts, amps, milliamps,
            joules, millijoules, kilojoules,
            watts, milliwatts, horsepower,
            kelvin, celsius, fahrenheit,
            by_symbol: HashMap::new(),
            by_name: HashMap::new(),
        };
        catalog.index();
        Ok(catalog)
    }

    fn index(&mut self) {
        let units: Vec<Unit> = self.all().into_iter().cloned().collect();
        for unit in units {
            self.by_symbol.insert(unit.symbol().to_string(), unit.clone());
            self.by_name.insert(unit.name().to_lowercase(), unit);
        }
    }

    /// Every predefined unit
    pub fn all(&self) -> Vec<&Unit> {
        vec![
            &self.meters, &self.millimeters, &self.centimeters, &self.inches, &self.feet,
            &self.seconds, &self.milliseconds, &self.minutes,
            &self.meters_per_second, &self.feet_per_second, &self.inches_per_second,
            &self.meters_per_second_per_second, &self.gs,
            &self.kilograms, &self.grams, &self.pounds, &self.ounces,
            &self.revolutions, &self.radians, &self.degrees,
            &self.value, &self.percent,
            &self.volts, &self.millivolts, &self.amps, &self.milliamps,
            &self.joules, &self.millijoules, &self.kilojoules,
            &self.watts, &self.milliwatts, &self.horsepower,
            &self.kelvin, &self.celsius, &self.fahrenheit,
        ]
    }

    /// Get a unit by symbol, or by name ignoring case
    pub fn get(&self, key: &str) -> Option<&Unit> {
        self.by_symbol
            .get(key)
            .or_else(|| self.by_name.get(&key.to_lowercase()))
    }

    /// Get all units of a dimension
    pub fn by_dimension(&self, dimension: &Dimension) -> Vec<&Unit> {
        self.all().into_iter().filter(|u| u.dimension() == dimension).collect()
    }

    /// Electrical power `P = V * I`, in watts
    pub fn power(&self, voltage: &Measure, current: &Measure) -> Result<Measure> {
        let volts = voltage.in_unit(&self.volts).map_err(|_| {
            UnitsError::dimension_mismatch("power", &Dimension::ElectricPotential, voltage.dimension())
        })?;
        let amps = current.in_unit(&self.amps).map_err(|_| {
            UnitsError::dimension_mismatch("power", &Dimension::ElectricCurrent, current.dimension())
        })?;
        Ok(self.watts.of(volts * amps))
    }
}

/// Start deriving a unit from `base`
pub fn derive(base: &Unit) -> UnitBuilder {
    UnitBuilder::derive(base)
}

/// One thousandth of `unit`, named "Milli" + the lowercased name
pub fn milli(unit: &Unit) -> Result<Unit> {
    milli_named(
        unit,
        format!("Milli{}", unit.name().to_lowercase()),
        format!("m{}", unit.symbol()),
    )
}

pub fn milli_named(unit: &Unit, name: impl Into<String>, symbol: impl Into<String>) -> Result<Unit> {
    derive(unit).split_into(1000.0).named(name).symbol(symbol).make()
}

/// One thousand of `unit`, named "Kilo" + the lowercased name
pub fn kilo(unit: &Unit) -> Result<Unit> {
    kilo_named(
        unit,
        format!("Kilo{}", unit.name().to_lowercase()),
        format!("K{}", unit.symbol()),
    )
}

pub fn kilo_named(unit: &Unit, name: impl Into<String>, symbol: impl Into<String>) -> Result<Unit> {
    derive(unit).aggregate(1000.0).named(name).symbol(symbol).make()
}

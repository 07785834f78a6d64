//! Metron Units - Typed measures with unit algebra
//!
//! Provides units, measures and the combinators that derive new units from
//! existing ones. Every cross-unit operation goes through each unit's
//! to-base and from-base conversions.
//!
//! Categories:
//! - Distance (m, mm, cm, in, ft)
//! - Time (s, ms, min)
//! - Velocity (m/s, ft/s, in/s)
//! - Acceleration (m/s/s, G)
//! - Mass (Kg, g, lb., oz.)
//! - Angle (R, rad, °)
//! - Unitless (<?>, %)
//! - Electrical (V, mV, A, mA)
//! - Energy (J, mJ, KJ)
//! - Power (W, mW, HP)
//! - Temperature (K, °C, °F)

mod unit;
mod base;
mod combinator;
mod builder;
mod measure;
mod mutable;
mod units;

pub use metron_core::{Dimension, ConversionFn, UnitsError, Result};
pub use unit::{Unit, UnitId, Composition, EQUIVALENCE_THRESHOLD, EQUIVALENCE_PROBES};
pub use base::base_unit;
pub use combinator::{CombinatorCache, COMBINATORS};
pub use builder::{UnitBuilder, MappingBuilder};
pub use measure::Measure;
pub use mutable::{MutableMeasure, FilteredMeasure};
pub use units::{UnitCatalog, UNITS, derive, milli, milli_named, kilo, kilo_named};

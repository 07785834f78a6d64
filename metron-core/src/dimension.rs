//! Dimension tags
//!
//! Every unit belongs to exactly one dimension. Simple dimensions name a
//! physical quantity kind directly; compound dimensions are produced by the
//! unit combinators and are built recursively from their constituents, so
//! combining the same two kinds twice always yields the same tag.

use std::fmt;
use serde::{Serialize, Deserialize};

/// The time tag, used as the implicit denominator of velocity dimensions
static TIME: Dimension = Dimension::Time;

/// Identifies the kind of physical quantity a unit measures.
///
/// Two units can be converted into one another only when their tags are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Distance,
    Time,
    Mass,
    Angle,
    /// Pure numbers, ratios and percentages
    Unitless,
    ElectricPotential,
    ElectricCurrent,
    Energy,
    Power,
    Temperature,
    /// Change of the inner dimension per unit time
    Velocity(Box<Dimension>),
    /// Ratio of numerator to denominator
    Per(Box<Dimension>, Box<Dimension>),
    /// Product of two dimensions
    Mult(Box<Dimension>, Box<Dimension>),
}

impl Dimension {
    /// All simple (non-compound) dimensions
    pub const SIMPLE: [Dimension; 10] = [
        Dimension::Distance,
        Dimension::Time,
        Dimension::Mass,
        Dimension::Angle,
        Dimension::Unitless,
        Dimension::ElectricPotential,
        Dimension::ElectricCurrent,
        Dimension::Energy,
        Dimension::Power,
        Dimension::Temperature,
    ];

    /// The dimension of this quantity per unit time
    pub fn velocity(&self) -> Dimension {
        Dimension::Velocity(Box::new(self.clone()))
    }

    /// Ratio of this dimension to `denominator`
    pub fn per(&self, denominator: &Dimension) -> Dimension {
        Dimension::Per(Box::new(self.clone()), Box::new(denominator.clone()))
    }

    /// Product of this dimension with `other`
    pub fn times(&self, other: &Dimension) -> Dimension {
        Dimension::Mult(Box::new(self.clone()), Box::new(other.clone()))
    }

    pub fn is_dimensionless(&self) -> bool {
        matches!(self, Dimension::Unitless)
    }

    pub fn is_time(&self) -> bool {
        matches!(self, Dimension::Time)
    }

    /// Split a ratio-like dimension into (numerator, denominator).
    ///
    /// Velocity dimensions count as ratios with a time denominator.
    pub fn ratio_parts(&self) -> Option<(&Dimension, &Dimension)> {
        match self {
            Dimension::Per(numerator, denominator) => Some((numerator, denominator)),
            Dimension::Velocity(inner) => Some((inner, &TIME)),
            _ => None,
        }
    }

    /// Check if `self` is `A / B` and `other` is `B / A`
    pub fn is_reciprocal_of(&self, other: &Dimension) -> bool {
        match (self.ratio_parts(), other.ratio_parts()) {
            (Some((n1, d1)), Some((n2, d2))) => n1 == d2 && d1 == n2,
            _ => false,
        }
    }

    /// Name of a simple dimension
    pub fn simple_name(&self) -> Option<&'static str> {
        match self {
            Dimension::Distance => Some("distance"),
            Dimension::Time => Some("time"),
            Dimension::Mass => Some("mass"),
            Dimension::Angle => Some("angle"),
            Dimension::Unitless => Some("unitless"),
            Dimension::ElectricPotential => Some("electric potential"),
            Dimension::ElectricCurrent => Some("electric current"),
            Dimension::Energy => Some("energy"),
            Dimension::Power => Some("power"),
            Dimension::Temperature => Some("temperature"),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Velocity(inner) => write!(f, "velocity of {}", inner),
            Dimension::Per(numerator, denominator) => write!(f, "({} per {})", numerator, denominator),
            Dimension::Mult(a, b) => write!(f, "({} times {})", a, b),
            simple => write!(f, "{}", simple.simple_name().unwrap_or("unknown")),
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Dimension::Unitless
    }
}

//! Unit combinators: ratio, product and velocity-family units
//!
//! Combining the same pair of unit instances always returns the same unit
//! instance. Each combinator kind keeps its own map keyed by the ordered pair
//! of constituent ids; rate units also key on the period magnitude. Entries
//! are created on first use and never evicted.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use metron_core::{Dimension, Result, UnitsError};
use crate::unit::{Composition, Unit, UnitId};

/// Process-wide cache used by `Unit::per` and `Unit::times`
pub static COMBINATORS: LazyLock<CombinatorCache> = LazyLock::new(CombinatorCache::new);

type PairKey = (UnitId, UnitId);
/// Numerator, period unit and the bits of the period magnitude
type RateKey = (UnitId, UnitId, u64);
type Interned<K> = RwLock<HashMap<K, Unit>>;

/// Interning cache for combinator units
#[derive(Default)]
pub struct CombinatorCache {
    ratios: Interned<PairKey>,
    products: Interned<PairKey>,
    velocities: Interned<PairKey>,
    rates: Interned<RateKey>,
}

impl CombinatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `numerator / denominator`, dispatching to the velocity combinator when
    /// the denominator is a unit of time
    pub fn per(&self, numerator: &Unit, denominator: &Unit) -> Unit {
        if denominator.dimension().is_time() {
            self.velocity_unchecked(numerator, denominator)
        } else {
            self.ratio(numerator, denominator)
        }
    }

    /// Ratio unit `N per D`
    pub fn ratio(&self, numerator: &Unit, denominator: &Unit) -> Unit {
        intern(&self.ratios, "ratio", (numerator.id(), denominator.id()), || {
            Unit::linear(
                numerator.dimension().per(denominator.dimension()),
                numerator.to_base(1.0) / denominator.to_base(1.0),
                format!("{} per {}", numerator.name(), denominator.name()),
                format!("{}/{}", numerator.symbol(), denominator.symbol()),
                Composition::Per {
                    numerator: numerator.clone(),
                    denominator: denominator.clone(),
                },
            )
        })
    }

    /// Product unit `A times B`
    pub fn product(&self, a: &Unit, b: &Unit) -> Unit {
        intern(&self.products, "product", (a.id(), b.id()), || {
            Unit::linear(
                a.dimension().times(b.dimension()),
                a.to_base(1.0) * b.to_base(1.0),
                format!("{}-{}", a.name(), b.name()),
                format!("{}·{}", a.symbol(), b.symbol()),
                Composition::Mult { a: a.clone(), b: b.clone() },
            )
        })
    }

    /// Velocity-family unit: `numerator` per unit of `period`.
    ///
    /// The period must be a unit of time.
    pub fn velocity(&self, numerator: &Unit, period: &Unit) -> Result<Unit> {
        if !period.dimension().is_time() {
            return Err(UnitsError::dimension_mismatch(
                "velocity",
                &Dimension::Time,
                period.dimension(),
            ));
        }
        Ok(self.velocity_unchecked(numerator, period))
    }

    /// Velocity-family unit over `period_magnitude` of `period`, e.g. Kg per 53 ms.
    ///
    /// The period must be a positive, finite amount of time.
    pub fn rate(&self, numerator: &Unit, period: &Unit, period_magnitude: f64) -> Result<Unit> {
        if !period.dimension().is_time() {
            return Err(UnitsError::dimension_mismatch("per", &Dimension::Time, period.dimension()));
        }
        let period_seconds = period.to_base(period_magnitude);
        if !period_seconds.is_finite() || period_seconds <= 0.0 {
            return Err(UnitsError::invalid_argument(format!(
                "rate period must be positive and finite, given {} {}",
                period_magnitude,
                period.symbol()
            )));
        }
        let key = (numerator.id(), period.id(), period_magnitude.to_bits());
        Ok(intern(&self.rates, "rate", key, || {
            velocity_unit(
                numerator,
                period,
                period_seconds,
                &format!("{} {}", period_magnitude, period.name()),
                &format!("{}{}", period_magnitude, period.symbol()),
            )
        }))
    }

    fn velocity_unchecked(&self, numerator: &Unit, period: &Unit) -> Unit {
        intern(&self.velocities, "velocity", (numerator.id(), period.id()), || {
            velocity_unit(numerator, period, period.to_base(1.0), period.name(), period.symbol())
        })
    }

    /// Number of interned combinator units
    pub fn len(&self) -> usize {
        read(&self.ratios).len()
            + read(&self.products).len()
            + read(&self.velocities).len()
            + read(&self.rates).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build a velocity-family unit whose period is `period_seconds` base time units
fn velocity_unit(
    numerator: &Unit,
    period: &Unit,
    period_seconds: f64,
    period_name: &str,
    period_symbol: &str,
) -> Unit {
    Unit::linear(
        numerator.dimension().velocity(),
        numerator.to_base(1.0) / period_seconds,
        format!("{} per {}", numerator.name(), period_name),
        format!("{}/{}", numerator.symbol(), period_symbol),
        Composition::Velocity {
            numerator: numerator.clone(),
            period: period.clone(),
        },
    )
}

fn intern<K, F>(map: &Interned<K>, kind: &'static str, key: K, build: F) -> Unit
where
    K: Hash + Eq,
    F: FnOnce() -> Unit,
{
    // Read lock first
    if let Some(unit) = read(map).get(&key) {
        tracing::trace!(kind, symbol = unit.symbol(), "combinator cache hit");
        return unit.clone();
    }

    // Another thread may have inserted between the two locks; the first entry wins
    write(map)
        .entry(key)
        .or_insert_with(|| {
            let unit = build();
            tracing::debug!(kind, symbol = unit.symbol(), dimension = %unit.dimension(), "interned combinator unit");
            unit
        })
        .clone()
}

// Entries are immutable once inserted, so a poisoned lock still holds a valid map.
fn read<K>(map: &Interned<K>) -> RwLockReadGuard<'_, HashMap<K, Unit>> {
    map.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<K>(map: &Interned<K>) -> RwLockWriteGuard<'_, HashMap<K, Unit>> {
    map.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn unit(dimension: Dimension, scale: f64, name: &str, symbol: &str) -> Unit {
        Unit::with_scale(dimension, scale, name, symbol).unwrap()
    }

    #[test]
    fn test_ratio_is_cached() {
        let cache = CombinatorCache::new();
        let kg = unit(Dimension::Mass, 1.0, "Kilogram", "Kg");
        let rev = unit(Dimension::Angle, 1.0, "Revolution", "R");

        let first = cache.ratio(&kg, &rev);
        let second = cache.ratio(&kg, &rev);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        // Order matters
        let reversed = cache.ratio(&rev, &kg);
        assert_ne!(first, reversed);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_equal_but_distinct_units_get_distinct_entries() {
        let cache = CombinatorCache::new();
        let m1 = unit(Dimension::Distance, 1.0, "Meter", "m");
        let m2 = unit(Dimension::Distance, 1.0, "Meter", "m");
        let rev = unit(Dimension::Angle, 1.0, "Revolution", "R");
        assert_ne!(cache.ratio(&m1, &rev), cache.ratio(&m2, &rev));
    }

    #[test]
    fn test_ratio_metadata() {
        let cache = CombinatorCache::new();
        let g = unit(Dimension::Mass, 0.001, "Gram", "g");
        let deg = unit(Dimension::Angle, 1.0 / 360.0, "Degree", "°");
        let ratio = cache.ratio(&g, &deg);

        assert_eq!(ratio.name(), "Gram per Degree");
        assert_eq!(ratio.symbol(), "g/°");
        assert_eq!(ratio.dimension(), &Dimension::Mass.per(&Dimension::Angle));
        assert!((ratio.to_base(1.0) - 0.36).abs() < 1e-12);
        assert!(matches!(ratio.composition(), Composition::Per { .. }));
    }

    #[test]
    fn test_product_metadata() {
        let cache = CombinatorCache::new();
        let v = unit(Dimension::ElectricPotential, 1.0, "Volt", "V");
        let ma = unit(Dimension::ElectricCurrent, 0.001, "Milliamp", "mA");
        let product = cache.product(&v, &ma);

        assert_eq!(product.name(), "Volt-Milliamp");
        assert_eq!(product.symbol(), "V·mA");
        assert!((product.to_base(1000.0) - 1.0).abs() < 1e-12);
        assert_eq!(cache.product(&v, &ma), product);
    }

    #[test]
    fn test_per_time_is_velocity() {
        let cache = CombinatorCache::new();
        let ft = unit(Dimension::Distance, 0.3048, "Foot", "ft");
        let ms = unit(Dimension::Time, 0.001, "Millisecond", "ms");
        let speed = cache.per(&ft, &ms);

        assert_eq!(speed.dimension(), &Dimension::Distance.velocity());
        assert!((speed.to_base(1.0) - 304.8).abs() < 1e-9);
        assert_eq!(cache.velocity(&ft, &ms).unwrap(), speed);
    }

    #[test]
    fn test_velocity_chains() {
        let cache = CombinatorCache::new();
        let m = unit(Dimension::Distance, 1.0, "Meter", "m");
        let s = unit(Dimension::Time, 1.0, "Second", "s");
        let accel = cache.per(&cache.per(&m, &s), &s);
        assert_eq!(accel.dimension(), &Dimension::Distance.velocity().velocity());
        assert_eq!(accel.symbol(), "m/s/s");
    }

    #[test]
    fn test_velocity_requires_time() {
        let cache = CombinatorCache::new();
        let m = unit(Dimension::Distance, 1.0, "Meter", "m");
        let err = cache.velocity(&m, &m).unwrap_err();
        assert!(matches!(err, UnitsError::DimensionMismatch { operation: "velocity", .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_rate_is_cached_per_period() {
        let cache = CombinatorCache::new();
        let kg = unit(Dimension::Mass, 1.0, "Kilogram", "Kg");
        let ms = unit(Dimension::Time, 0.001, "Millisecond", "ms");

        let first = cache.rate(&kg, &ms, 53.0).unwrap();
        let second = cache.rate(&kg, &ms, 53.0).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.symbol(), "Kg/53ms");
        assert!((first.to_base(1.0) - 1000.0 / 53.0).abs() < 1e-9);

        let other_period = cache.rate(&kg, &ms, 20.0).unwrap();
        assert_ne!(first, other_period);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_rate_rejects_bad_periods() {
        let cache = CombinatorCache::new();
        let kg = unit(Dimension::Mass, 1.0, "Kilogram", "Kg");
        let s = unit(Dimension::Time, 1.0, "Second", "s");

        for period in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = cache.rate(&kg, &s, period).unwrap_err();
            assert!(matches!(err, UnitsError::InvalidArgument(_)), "period {}", period);
        }
        let err = cache.rate(&kg, &kg, 1.0).unwrap_err();
        assert!(matches!(err, UnitsError::DimensionMismatch { operation: "per", .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_lookups_agree() {
        let cache = Arc::new(CombinatorCache::new());
        let kg = unit(Dimension::Mass, 1.0, "Kilogram", "Kg");
        let s = unit(Dimension::Time, 1.0, "Second", "s");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let (kg, s) = (kg.clone(), s.clone());
                std::thread::spawn(move || cache.per(&kg, &s))
            })
            .collect();
        let results: Vec<Unit> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(cache.len(), 1);
    }
}

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::model::area::{AreaGeometry, AreaId};

/// Lower bound of the default effectiveness draw.
pub const DEFAULT_MIN_EFFECTIVENESS: f64 = 0.2;
/// Upper (exclusive) bound of the default effectiveness draw.
pub const DEFAULT_MAX_EFFECTIVENESS: f64 = 0.9;

/// Produces one effectiveness value per configured area for a round.
pub trait EffectivenessSource {
    fn sample<R: Rng + ?Sized>(&mut self, geometry: &AreaGeometry, rng: &mut R)
    -> RoundEffectiveness;
}

/// Draws every area's effectiveness uniformly from `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformEffectiveness {
    low: f64,
    high: f64,
}

impl UniformEffectiveness {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !(low.is_finite() && high.is_finite()) || low < 0.0 || high > 1.0 || low >= high {
            return Err(SearchError::configuration(format!(
                "effectiveness range [{low}, {high}) must be a non-empty sub-range of [0, 1]"
            )));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }
}

impl Default for UniformEffectiveness {
    fn default() -> Self {
        Self {
            low: DEFAULT_MIN_EFFECTIVENESS,
            high: DEFAULT_MAX_EFFECTIVENESS,
        }
    }
}

impl EffectivenessSource for UniformEffectiveness {
    fn sample<R: Rng + ?Sized>(
        &mut self,
        geometry: &AreaGeometry,
        rng: &mut R,
    ) -> RoundEffectiveness {
        RoundEffectiveness {
            values: geometry
                .ids()
                .map(|_| rng.gen_range(self.low..self.high))
                .collect(),
        }
    }
}

/// Replays the same values every round; areas past the end get 0.
/// Values are clamped to `[0, 1]` and NaN becomes 0.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedEffectiveness {
    values: Vec<f64>,
}

impl FixedEffectiveness {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values
                .into()
                .into_iter()
                .map(|value| {
                    if value.is_nan() {
                        0.0
                    } else {
                        value.clamp(0.0, 1.0)
                    }
                })
                .collect(),
        }
    }
}

impl EffectivenessSource for FixedEffectiveness {
    fn sample<R: Rng + ?Sized>(
        &mut self,
        geometry: &AreaGeometry,
        _rng: &mut R,
    ) -> RoundEffectiveness {
        RoundEffectiveness {
            values: (0..geometry.len())
                .map(|index| self.values.get(index).copied().unwrap_or(0.0))
                .collect(),
        }
    }
}

/// Effectiveness of every area for a single round, indexed by area.
///
/// A value of exactly 0 marks an area that was not searched this round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundEffectiveness {
    values: Vec<f64>,
}

impl RoundEffectiveness {
    pub fn from_values(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
        }
    }

    pub fn get(&self, id: AreaId) -> f64 {
        id.index()
            .and_then(|index| self.values.get(index))
            .copied()
            .unwrap_or(0.0)
    }

    /// Zeroes every area not listed in `searched`.
    pub fn retain_searched(&mut self, searched: &[AreaId]) {
        for (index, value) in self.values.iter_mut().enumerate() {
            if !searched.contains(&AreaId::from_index(index)) {
                *value = 0.0;
            }
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn uniform_samples_every_area_within_bounds() {
        let geometry = AreaGeometry::floorplan();
        let mut source = UniformEffectiveness::default();
        let mut rng = SmallRng::seed_from_u64(17);
        for _ in 0..1_000 {
            let round = source.sample(&geometry, &mut rng);
            assert_eq!(round.len(), geometry.len());
            for value in round.values() {
                assert!((0.2..0.9).contains(value), "value {value} out of range");
            }
        }
    }

    #[test]
    fn uniform_rejects_inverted_or_out_of_unit_range() {
        assert!(UniformEffectiveness::new(0.9, 0.2).is_err());
        assert!(UniformEffectiveness::new(0.5, 0.5).is_err());
        assert!(UniformEffectiveness::new(-0.1, 0.5).is_err());
        assert!(UniformEffectiveness::new(0.1, 1.5).is_err());
        assert!(UniformEffectiveness::new(0.0, 1.0).is_ok());
    }

    #[test]
    fn fixed_pads_missing_areas_with_zero() {
        let geometry = AreaGeometry::floorplan();
        let mut source = FixedEffectiveness::new(vec![1.0, 0.4]);
        let mut rng = SmallRng::seed_from_u64(0);
        let round = source.sample(&geometry, &mut rng);
        assert_eq!(round.values(), &[1.0, 0.4, 0.0, 0.0]);

        let mut source = FixedEffectiveness::new(vec![f64::NAN, 1.7, -0.2, 0.5]);
        let round = source.sample(&geometry, &mut rng);
        assert_eq!(round.values(), &[0.0, 1.0, 0.0, 0.5]);
    }

    #[test]
    fn retain_searched_zeroes_unselected_areas() {
        let mut round = RoundEffectiveness::from_values(vec![0.3, 0.4, 0.5, 0.6]);
        round.retain_searched(&[AreaId::new(2), AreaId::new(4)]);
        assert_eq!(round.values(), &[0.0, 0.4, 0.0, 0.6]);
        assert_eq!(round.get(AreaId::new(4)), 0.6);
        assert_eq!(round.get(AreaId::new(9)), 0.0);
    }
}

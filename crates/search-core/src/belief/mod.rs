//! Posterior probability that the target lies in each area.
//!
//! A round that fails to find the target multiplies every area's belief by
//! `1 - E`, where `E` is the effectiveness the area was searched with (0 for
//! areas left alone), and renormalizes across all areas.

use serde::{Deserialize, Serialize};
use tracing::{Level, event};

use crate::error::{Result, SearchError};
use crate::model::area::AreaId;
use crate::search::effectiveness::RoundEffectiveness;

/// Tolerance used when validating that a prior sums to one.
pub const PRIOR_SUM_TOLERANCE: f64 = 1e-6;

/// Starting belief over the four floor plan areas.
pub const FLOORPLAN_PRIOR: [f64; 4] = [0.2, 0.3, 0.2, 0.3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeliefState {
    probabilities: Vec<f64>,
}

impl BeliefState {
    /// Validates and adopts a prior distribution.
    pub fn new(prior: impl Into<Vec<f64>>) -> Result<Self> {
        let probabilities = prior.into();
        if probabilities.is_empty() {
            return Err(SearchError::configuration("prior distribution is empty"));
        }
        if let Some((index, value)) = probabilities
            .iter()
            .enumerate()
            .find(|(_, value)| !(value.is_finite() && (0.0..=1.0).contains(*value)))
        {
            return Err(SearchError::configuration(format!(
                "prior for area {} is {value}, expected a value in [0, 1]",
                index + 1
            )));
        }
        let total: f64 = probabilities.iter().sum();
        if (total - 1.0).abs() > PRIOR_SUM_TOLERANCE {
            return Err(SearchError::configuration(format!(
                "prior probabilities sum to {total}, expected 1"
            )));
        }
        Ok(Self { probabilities })
    }

    pub fn floorplan() -> Self {
        Self {
            probabilities: FLOORPLAN_PRIOR.to_vec(),
        }
    }

    pub fn probability(&self, id: AreaId) -> Option<f64> {
        id.index()
            .and_then(|index| self.probabilities.get(index))
            .copied()
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Applies one unsuccessful round. On error the belief is left unchanged.
    pub fn revise(&mut self, effectiveness: &RoundEffectiveness) -> Result<()> {
        match revise_probabilities(&self.probabilities, effectiveness.values()) {
            Ok(updated) => {
                self.probabilities = updated;
                Ok(())
            }
            Err(err) => {
                event!(
                    target: "search_core::round",
                    Level::WARN,
                    error = %err,
                    prior = ?self.probabilities,
                    effectiveness = ?effectiveness.values(),
                );
                Err(err)
            }
        }
    }
}

/// Bayes update after a search that found nothing.
///
/// `effectiveness` is indexed like `prior`; missing trailing entries count as
/// unsearched. Every given value must be a finite number in `[0, 1]`, else
/// [`SearchError::InvalidEffectiveness`]. Fails with
/// [`SearchError::DegenerateBelief`] when the normalizing denominator is zero
/// or not finite.
pub fn revise_probabilities(prior: &[f64], effectiveness: &[f64]) -> Result<Vec<f64>> {
    if let Some((index, &value)) = effectiveness
        .iter()
        .enumerate()
        .find(|(_, value)| !(value.is_finite() && (0.0..=1.0).contains(*value)))
    {
        return Err(SearchError::InvalidEffectiveness {
            area: index + 1,
            value,
        });
    }

    let numerators: Vec<f64> = prior
        .iter()
        .enumerate()
        .map(|(index, p)| p * (1.0 - effectiveness.get(index).copied().unwrap_or(0.0)))
        .collect();
    let denominator: f64 = numerators.iter().sum();

    if !denominator.is_finite() || denominator <= 0.0 {
        return Err(SearchError::DegenerateBelief { denominator });
    }

    Ok(numerators.into_iter().map(|n| n / denominator).collect())
}

use core::fmt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{Level, event};

use crate::belief::BeliefState;
use crate::error::{Result, SearchError};
use crate::game::report::RoundReport;
use crate::model::area::{Area, AreaGeometry, AreaId};
use crate::model::location::TargetLocation;
use crate::search::effectiveness::{EffectivenessSource, UniformEffectiveness};
use crate::search::executor::SearchExecutor;
use crate::search::placement::TargetPlacement;

/// Validated inputs needed to start (and restart) a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    geometry: AreaGeometry,
    prior: BeliefState,
    placement: TargetPlacement,
}

impl SessionConfig {
    pub fn new(
        geometry: AreaGeometry,
        prior: impl Into<Vec<f64>>,
        placement: TargetPlacement,
    ) -> Result<Self> {
        let prior = BeliefState::new(prior)?;
        if prior.len() != geometry.len() {
            return Err(SearchError::configuration(format!(
                "{} prior probabilities configured for {} areas",
                prior.len(),
                geometry.len()
            )));
        }
        Ok(Self {
            geometry,
            prior,
            placement,
        })
    }

    /// Four-room floor plan with priors `[0.2, 0.3, 0.2, 0.3]` and uniform placement.
    pub fn floorplan() -> Self {
        Self {
            geometry: AreaGeometry::floorplan(),
            prior: BeliefState::floorplan(),
            placement: TargetPlacement::Uniform,
        }
    }

    pub fn geometry(&self) -> &AreaGeometry {
        &self.geometry
    }

    pub fn prior(&self) -> &BeliefState {
        &self.prior
    }

    pub fn placement(&self) -> TargetPlacement {
        self.placement
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    AwaitingSelection,
    TargetFound,
    Terminated,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionPhase::AwaitingSelection => "awaiting selection",
            SessionPhase::TargetFound => "target found",
            SessionPhase::Terminated => "terminated",
        };
        f.write_str(label)
    }
}

/// One game: a hidden target, the evolving belief, and the random source driving both.
#[derive(Debug, Clone)]
pub struct SearchSession<R = StdRng, S = UniformEffectiveness> {
    config: SessionConfig,
    target: TargetLocation,
    belief: BeliefState,
    phase: SessionPhase,
    round: u32,
    effectiveness: S,
    rng: R,
}

impl SearchSession {
    /// Default effectiveness draw with a seeded `StdRng`, so the whole game is replayable.
    pub fn with_seed(config: SessionConfig, seed: u64) -> Result<Self> {
        Self::new(
            config,
            UniformEffectiveness::default(),
            StdRng::seed_from_u64(seed),
        )
    }
}

impl<R: Rng, S: EffectivenessSource> SearchSession<R, S> {
    /// Starts a session, hiding the target with the configured placement.
    pub fn new(config: SessionConfig, effectiveness: S, mut rng: R) -> Result<Self> {
        let target = config
            .placement
            .place(&config.geometry, config.prior.probabilities(), &mut rng)?;
        event!(
            target: "search_core::session",
            Level::DEBUG,
            areas = config.geometry.len(),
            placement = ?config.placement,
            target_area = target.area.get(),
        );
        Ok(Self::assemble(config, target, effectiveness, rng))
    }

    /// Starts a session with a known target location.
    pub fn with_target(
        config: SessionConfig,
        target: TargetLocation,
        effectiveness: S,
        rng: R,
    ) -> Result<Self> {
        let area = config.geometry.get(target.area).ok_or_else(|| {
            SearchError::configuration(format!("target area {} is not configured", target.area))
        })?;
        if !area.extent().contains(target.cell) {
            return Err(SearchError::configuration(format!(
                "target cell {} lies outside area {}",
                target.cell, target.area
            )));
        }
        Ok(Self::assemble(config, target, effectiveness, rng))
    }

    fn assemble(config: SessionConfig, target: TargetLocation, effectiveness: S, rng: R) -> Self {
        Self {
            belief: config.prior.clone(),
            config,
            target,
            phase: SessionPhase::AwaitingSelection,
            round: 0,
            effectiveness,
            rng,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn geometry(&self) -> &AreaGeometry {
        &self.config.geometry
    }

    pub fn belief(&self) -> &BeliefState {
        &self.belief
    }

    pub fn target(&self) -> TargetLocation {
        self.target
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Number of rounds played so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Searches two distinct areas and, if both miss, revises the belief.
    ///
    /// Invalid selections are rejected without touching the session. A find
    /// ends the session; a degenerate belief terminates it.
    pub fn submit_area_pair(&mut self, first: AreaId, second: AreaId) -> Result<RoundReport> {
        if self.phase != SessionPhase::AwaitingSelection {
            return Err(SearchError::SessionClosed { phase: self.phase });
        }
        let (first_area, second_area) = self.selected_areas(first, second)?;

        self.round += 1;
        let mut effectiveness = self.effectiveness.sample(&self.config.geometry, &mut self.rng);
        let outcomes = [
            SearchExecutor::search(
                &first_area,
                effectiveness.get(first),
                &self.target,
                &mut self.rng,
            ),
            SearchExecutor::search(
                &second_area,
                effectiveness.get(second),
                &self.target,
                &mut self.rng,
            ),
        ];
        effectiveness.retain_searched(&[first, second]);

        if outcomes.iter().any(|outcome| outcome.is_found()) {
            self.phase = SessionPhase::TargetFound;
            event!(
                target: "search_core::session",
                Level::INFO,
                round = self.round,
                area = self.target.area.get(),
                x = self.target.cell.x,
                y = self.target.cell.y,
                "target found"
            );
            return Ok(RoundReport {
                round: self.round,
                outcomes,
                effectiveness,
                belief: None,
                found: Some(self.target),
            });
        }

        if let Err(err) = self.belief.revise(&effectiveness) {
            self.phase = SessionPhase::Terminated;
            return Err(err);
        }

        event!(
            target: "search_core::round",
            Level::INFO,
            round = self.round,
            first = first.get(),
            second = second.get(),
            effectiveness = ?effectiveness.values(),
            belief = ?self.belief.probabilities(),
        );

        Ok(RoundReport {
            round: self.round,
            outcomes,
            effectiveness,
            belief: Some(self.belief.clone()),
            found: None,
        })
    }

    /// Discards this game and starts a new one with a fresh target and the prior belief.
    pub fn restart(self) -> Result<Self> {
        event!(
            target: "search_core::session",
            Level::INFO,
            rounds_played = self.round,
            phase = %self.phase,
            "session restarted"
        );
        Self::new(self.config, self.effectiveness, self.rng)
    }

    pub fn terminate(&mut self) {
        self.phase = SessionPhase::Terminated;
    }

    fn selected_areas(&self, first: AreaId, second: AreaId) -> Result<(Area, Area)> {
        let invalid = |reason| SearchError::InvalidAreaSelection {
            first,
            second,
            reason,
        };
        if first == second {
            return Err(invalid("the same area cannot be searched twice in one round"));
        }
        let first_area = self
            .config
            .geometry
            .get(first)
            .copied()
            .ok_or_else(|| invalid("unknown area"))?;
        let second_area = self
            .config
            .geometry
            .get(second)
            .copied()
            .ok_or_else(|| invalid("unknown area"))?;
        Ok((first_area, second_area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::area::Cell;
    use crate::search::effectiveness::FixedEffectiveness;
    use rand::rngs::SmallRng;

    fn fixed_session(
        target: TargetLocation,
        values: Vec<f64>,
    ) -> SearchSession<SmallRng, FixedEffectiveness> {
        SearchSession::with_target(
            SessionConfig::floorplan(),
            target,
            FixedEffectiveness::new(values),
            SmallRng::seed_from_u64(77),
        )
        .expect("valid session")
    }

    #[test]
    fn seeded_sessions_replay_identically() {
        let mut a = SearchSession::with_seed(SessionConfig::floorplan(), 2024).unwrap();
        let mut b = SearchSession::with_seed(SessionConfig::floorplan(), 2024).unwrap();
        assert_eq!(a.target(), b.target());
        for (first, second) in [(1, 2), (3, 4), (1, 3)] {
            let ra = a.submit_area_pair(AreaId::new(first), AreaId::new(second));
            let rb = b.submit_area_pair(AreaId::new(first), AreaId::new(second));
            assert_eq!(ra, rb);
            if a.phase() != SessionPhase::AwaitingSelection {
                break;
            }
        }
    }

    #[test]
    fn rejects_duplicate_and_unknown_areas_without_state_change() {
        let mut session = fixed_session(
            TargetLocation::new(AreaId::new(2), Cell::new(5, 5)),
            vec![0.5; 4],
        );
        let before = session.belief().clone();

        let err = session
            .submit_area_pair(AreaId::new(3), AreaId::new(3))
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidAreaSelection { .. }));
        let err = session
            .submit_area_pair(AreaId::new(1), AreaId::new(7))
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidAreaSelection { .. }));

        assert_eq!(session.belief(), &before);
        assert_eq!(session.round(), 0);
        assert_eq!(session.phase(), SessionPhase::AwaitingSelection);
    }

    #[test]
    fn unsearched_effectiveness_is_zeroed_in_report() {
        let mut session = fixed_session(
            TargetLocation::new(AreaId::new(2), Cell::new(5, 5)),
            vec![0.3, 0.4, 0.5, 0.6],
        );
        let report = session
            .submit_area_pair(AreaId::new(1), AreaId::new(3))
            .unwrap();
        assert_eq!(report.effectiveness.values(), &[0.3, 0.0, 0.5, 0.0]);
        assert!(report.belief.is_some());
        assert!(report.found.is_none());
    }

    #[test]
    fn found_target_closes_session_and_skips_revision() {
        let target = TargetLocation::new(AreaId::new(1), Cell::new(0, 0));
        let mut session = fixed_session(target, vec![1.0, 0.5, 0.5, 0.5]);
        let report = session
            .submit_area_pair(AreaId::new(1), AreaId::new(2))
            .unwrap();
        assert!(report.outcomes[0].is_found());
        assert_eq!(report.found, Some(target));
        assert!(report.belief.is_none());
        assert_eq!(session.belief(), &BeliefState::floorplan());
        assert_eq!(session.phase(), SessionPhase::TargetFound);

        let err = session
            .submit_area_pair(AreaId::new(3), AreaId::new(4))
            .unwrap_err();
        assert_eq!(
            err,
            SearchError::SessionClosed {
                phase: SessionPhase::TargetFound
            }
        );
    }

    #[test]
    fn degenerate_round_terminates_session() {
        let config = SessionConfig::new(
            AreaGeometry::floorplan(),
            vec![0.5, 0.5, 0.0, 0.0],
            TargetPlacement::Uniform,
        )
        .unwrap();
        let mut session = SearchSession::with_target(
            config,
            TargetLocation::new(AreaId::new(3), Cell::new(1, 1)),
            FixedEffectiveness::new(vec![1.0, 1.0, 0.0, 0.0]),
            SmallRng::seed_from_u64(1),
        )
        .unwrap();
        let err = session
            .submit_area_pair(AreaId::new(1), AreaId::new(2))
            .unwrap_err();
        assert!(matches!(err, SearchError::DegenerateBelief { .. }));
        assert_eq!(session.phase(), SessionPhase::Terminated);
    }

    #[test]
    fn restart_resets_belief_and_round_counter() {
        let mut session = fixed_session(
            TargetLocation::new(AreaId::new(2), Cell::new(5, 5)),
            vec![0.5; 4],
        );
        session
            .submit_area_pair(AreaId::new(1), AreaId::new(3))
            .unwrap();
        assert_ne!(session.belief(), &BeliefState::floorplan());

        let restarted = session.restart().unwrap();
        assert_eq!(restarted.round(), 0);
        assert_eq!(restarted.belief(), &BeliefState::floorplan());
        assert_eq!(restarted.phase(), SessionPhase::AwaitingSelection);
        let area = restarted.geometry().get(restarted.target().area).unwrap();
        assert!(area.extent().contains(restarted.target().cell));
    }

    #[test]
    fn terminate_blocks_further_rounds() {
        let mut session = SearchSession::with_seed(SessionConfig::floorplan(), 5).unwrap();
        session.terminate();
        assert!(matches!(
            session.submit_area_pair(AreaId::new(1), AreaId::new(2)),
            Err(SearchError::SessionClosed { .. })
        ));
    }

    #[test]
    fn config_rejects_prior_count_mismatch() {
        let err = SessionConfig::new(
            AreaGeometry::floorplan(),
            vec![0.5, 0.5],
            TargetPlacement::Uniform,
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::Configuration { .. }));
    }

    #[test]
    fn target_outside_extent_is_rejected() {
        let result = SearchSession::with_target(
            SessionConfig::floorplan(),
            TargetLocation::new(AreaId::new(4), Cell::new(145, 0)),
            FixedEffectiveness::new(vec![0.5; 4]),
            SmallRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(SearchError::Configuration { .. })));
    }
}

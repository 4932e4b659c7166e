//! Batch play with a scripted, non-adaptive choice of area pairs.

use std::io::Write;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use search_core::{SearchError, SearchSession, SessionPhase};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{SearchConfig, SelectionStrategy, ValidationError};
use crate::menu::Menu;

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ValidationError),
    #[error("search failed in session {session}: {source}")]
    Search {
        session: usize,
        #[source]
        source: SearchError,
    },
    #[error("failed to write session rows: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode session row: {0}")]
    Json(#[from] serde_json::Error),
    #[error("statistics error: {0}")]
    Statistics(String),
}

/// One JSONL row per simulated session.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionRow {
    pub session: usize,
    pub seed: u64,
    pub target_area: u8,
    pub found: bool,
    pub rounds: u32,
    pub final_belief: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimulationSummary {
    /// Seed of the generator that derives per-session seeds; replays the run.
    pub master_seed: u64,
    pub sessions: usize,
    pub found: usize,
    pub strategy: SelectionStrategy,
    pub mean_rounds_to_find: Option<f64>,
    /// Normal-approximation interval for the mean rounds to find.
    pub rounds_confidence_interval: Option<(f64, f64)>,
    /// Searches that covered the area actually holding the target.
    pub target_area_searches: usize,
    pub detection_rate: Option<f64>,
    pub mean_target_area_effectiveness: Option<f64>,
}

/// Plays `simulation.sessions` games, optionally streaming one JSON row per game.
pub fn run_simulation(
    config: &SearchConfig,
    mut rows: Option<&mut dyn Write>,
) -> Result<SimulationSummary, SimulationError> {
    let session_config = config.session_config()?;
    let effectiveness = config.effectiveness_source()?;
    let menu = Menu::new(config.areas.len());
    let pairs = menu.pairs();
    if pairs.is_empty() {
        return Err(SimulationError::Config(ValidationError::InvalidField {
            field: "areas".to_string(),
            message: "simulation needs at least two areas".to_string(),
        }));
    }
    let strategy = config.simulation.strategy;

    let master_seed = config
        .seed
        .unwrap_or_else(|| StdRng::from_entropy().next_u64());
    let mut master = StdRng::seed_from_u64(master_seed);
    let mut rounds_to_find = Vec::new();
    let mut target_area_searches = 0usize;
    let mut detections = 0usize;
    let mut effectiveness_sum = 0.0;

    for index in 0..config.simulation.sessions {
        let seed = master.next_u64();
        let mut session = SearchSession::new(
            session_config.clone(),
            effectiveness,
            StdRng::seed_from_u64(seed),
        )
        .map_err(|source| SimulationError::Search {
            session: index,
            source,
        })?;
        let target = session.target();

        while session.phase() == SessionPhase::AwaitingSelection
            && session.round() < config.simulation.max_rounds
        {
            let (first, second) = match strategy {
                SelectionStrategy::RoundRobin => pairs[session.round() as usize % pairs.len()],
                SelectionStrategy::Random => pairs[master.gen_range(0..pairs.len())],
            };
            let report = session
                .submit_area_pair(first, second)
                .map_err(|source| SimulationError::Search {
                    session: index,
                    source,
                })?;
            for outcome in report.outcomes.iter().filter(|o| o.area() == target.area) {
                target_area_searches += 1;
                effectiveness_sum += outcome.effectiveness();
                if outcome.is_found() {
                    detections += 1;
                }
            }
        }

        let found = session.phase() == SessionPhase::TargetFound;
        if found {
            rounds_to_find.push(f64::from(session.round()));
        }

        if let Some(writer) = rows.as_deref_mut() {
            let row = SessionRow {
                session: index,
                seed,
                target_area: target.area.get(),
                found,
                rounds: session.round(),
                final_belief: session.belief().probabilities().to_vec(),
            };
            serde_json::to_writer(&mut *writer, &row)?;
            writer.write_all(b"\n")?;
        }
    }

    if let Some(writer) = rows.as_deref_mut() {
        writer.flush()?;
    }

    let mean_rounds_to_find = mean(&rounds_to_find);
    let rounds_confidence_interval = confidence_interval(&rounds_to_find)?;
    let summary = SimulationSummary {
        master_seed,
        sessions: config.simulation.sessions,
        found: rounds_to_find.len(),
        strategy,
        mean_rounds_to_find,
        rounds_confidence_interval,
        target_area_searches,
        detection_rate: ratio(detections as f64, target_area_searches),
        mean_target_area_effectiveness: ratio(effectiveness_sum, target_area_searches),
    };

    event!(
        target: "search_cli::simulate",
        Level::INFO,
        master_seed,
        sessions = summary.sessions,
        found = summary.found,
        strategy = ?summary.strategy,
        mean_rounds = ?summary.mean_rounds_to_find,
        detection_rate = ?summary.detection_rate,
    );

    Ok(summary)
}

fn ratio(numerator: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| numerator / count as f64)
}

fn mean(values: &[f64]) -> Option<f64> {
    ratio(values.iter().sum(), values.len())
}

fn confidence_interval(values: &[f64]) -> Result<Option<(f64, f64)>, SimulationError> {
    if values.len() < 2 {
        return Ok(None);
    }
    let Some(center) = mean(values) else {
        return Ok(None);
    };
    let n = values.len() as f64;
    let variance = values
        .iter()
        .map(|value| (value - center).powi(2))
        .sum::<f64>()
        / (n - 1.0);
    let normal =
        Normal::new(0.0, 1.0).map_err(|err| SimulationError::Statistics(err.to_string()))?;
    let z = normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0);
    let half_width = z * (variance / n).sqrt();
    Ok(Some((center - half_width, center + half_width)))
}

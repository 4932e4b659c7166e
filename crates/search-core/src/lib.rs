#![deny(warnings)]
//! Bayesian search engine: hide a target in one of several areas, search
//! pairs of areas with randomized effectiveness, and revise the per-area
//! target probabilities with Bayes' rule after every unsuccessful round.

pub mod belief;
pub mod error;
pub mod game;
pub mod model;
pub mod search;

pub use belief::{BeliefState, revise_probabilities};
pub use error::{Result, SearchError};
pub use game::report::RoundReport;
pub use game::session::{SearchSession, SessionConfig, SessionPhase};
pub use model::area::{Area, AreaExtent, AreaGeometry, AreaId, Cell};
pub use model::location::TargetLocation;
pub use search::effectiveness::{
    EffectivenessSource, FixedEffectiveness, RoundEffectiveness, UniformEffectiveness,
};
pub use search::executor::{SearchExecutor, SearchOutcome, SearchResult};
pub use search::placement::TargetPlacement;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "bayes-search"
    }

    pub const fn codename() -> &'static str {
        "Where Are My Glasses?"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

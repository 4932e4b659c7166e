//! Error types surfaced by the search engine.

use thiserror::Error;

use crate::game::session::SessionPhase;
use crate::model::area::AreaId;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SearchError {
    /// The submitted pair references an unknown area or names the same area twice.
    #[error("invalid area selection ({first}, {second}): {reason}")]
    InvalidAreaSelection {
        first: AreaId,
        second: AreaId,
        reason: &'static str,
    },

    /// Every unnormalized posterior term vanished, so the belief cannot be renormalized.
    #[error("belief revision is degenerate: normalizing denominator is {denominator}")]
    DegenerateBelief { denominator: f64 },

    /// An effectiveness fed to a revision was not a finite value in `[0, 1]`.
    #[error("effectiveness {value} for area {area} is outside [0, 1]")]
    InvalidEffectiveness { area: usize, value: f64 },

    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    #[error("session no longer accepts searches (phase: {phase})")]
    SessionClosed { phase: SessionPhase },
}

impl SearchError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        SearchError::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

//! Simulated scan of a single area.

use core::fmt;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{Level, event};

use crate::model::area::{Area, AreaId, Cell};
use crate::model::location::TargetLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchResult {
    Found,
    NotFound,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchResult::Found => f.write_str("Found"),
            SearchResult::NotFound => f.write_str("Not Found"),
        }
    }
}

/// Result of searching one area during one round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    area: AreaId,
    result: SearchResult,
    effectiveness: f64,
    scanned_count: usize,
    #[serde(skip)]
    scanned: Vec<Cell>,
}

impl SearchOutcome {
    pub fn area(&self) -> AreaId {
        self.area
    }

    pub fn result(&self) -> SearchResult {
        self.result
    }

    pub fn is_found(&self) -> bool {
        self.result == SearchResult::Found
    }

    pub fn effectiveness(&self) -> f64 {
        self.effectiveness
    }

    /// Cells covered by the scan, in scan order, without repetition.
    pub fn scanned_cells(&self) -> &[Cell] {
        &self.scanned
    }

    pub fn scanned_count(&self) -> usize {
        self.scanned_count
    }
}

#[derive(Debug, Default)]
pub struct SearchExecutor;

impl SearchExecutor {
    /// Scans `floor(cells * effectiveness)` distinct cells of `area`, chosen at random.
    ///
    /// The outcome is `Found` only when the target sits in this area and its
    /// cell is among the scanned ones, so a present target is detected with
    /// probability equal to the (floored) effectiveness.
    pub fn search<R: Rng + ?Sized>(
        area: &Area,
        effectiveness: f64,
        target: &TargetLocation,
        rng: &mut R,
    ) -> SearchOutcome {
        let effectiveness = if effectiveness.is_nan() {
            0.0
        } else {
            effectiveness.clamp(0.0, 1.0)
        };
        let total = area.cell_count();
        let amount = ((total as f64 * effectiveness).floor() as usize).min(total);

        let scanned = if amount == 0 {
            Vec::new()
        } else {
            let mut cells: Vec<Cell> = area.cells().collect();
            let (prefix, _) = cells.partial_shuffle(rng, amount);
            prefix.to_vec()
        };

        let found = target.area == area.id() && scanned.contains(&target.cell);
        let result = if found {
            SearchResult::Found
        } else {
            SearchResult::NotFound
        };

        event!(
            target: "search_core::round",
            Level::DEBUG,
            area = area.id().get(),
            effectiveness,
            scanned = amount,
            cells = total,
            found,
        );

        SearchOutcome {
            area: area.id(),
            result,
            effectiveness,
            scanned_count: scanned.len(),
            scanned,
        }
    }
}

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::model::area::{AreaId, Cell};

/// Hidden position of the target for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLocation {
    pub area: AreaId,
    pub cell: Cell,
}

impl TargetLocation {
    pub const fn new(area: AreaId, cell: Cell) -> Self {
        Self { area, cell }
    }
}

impl fmt::Display for TargetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "area {} at {}", self.area, self.cell)
    }
}

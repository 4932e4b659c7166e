use core::fmt;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// One-based identifier of a search area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(u8);

impl AreaId {
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position in the owning [`AreaGeometry`], if the id is not zero.
    pub const fn index(self) -> Option<usize> {
        match self.0 {
            0 => None,
            raw => Some(raw as usize - 1),
        }
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u8 + 1)
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local cell coordinate inside an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaExtent {
    pub width: u32,
    pub height: u32,
}

impl AreaExtent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn cell_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    pub const fn contains(self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    id: AreaId,
    extent: AreaExtent,
}

impl Area {
    pub fn id(&self) -> AreaId {
        self.id
    }

    pub fn extent(&self) -> AreaExtent {
        self.extent
    }

    pub fn cell_count(&self) -> usize {
        self.extent.cell_count()
    }

    /// Every cell of the area, x-major: `(0,0), (0,1), .., (W-1,H-1)`.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let height = self.extent.height;
        (0..self.extent.width).flat_map(move |x| (0..height).map(move |y| Cell::new(x, y)))
    }
}

/// Ordered, non-empty set of rectangular search areas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaGeometry {
    areas: Vec<Area>,
}

impl AreaGeometry {
    /// Extents of the four rooms on the default floor plan.
    pub const FLOORPLAN: [AreaExtent; 4] = [
        AreaExtent::new(200, 165),
        AreaExtent::new(270, 198),
        AreaExtent::new(165, 135),
        AreaExtent::new(145, 106),
    ];

    pub fn new(extents: impl IntoIterator<Item = AreaExtent>) -> Result<Self> {
        let extents: Vec<AreaExtent> = extents.into_iter().collect();
        if extents.is_empty() {
            return Err(SearchError::configuration("at least one search area is required"));
        }
        if extents.len() > u8::MAX as usize {
            return Err(SearchError::configuration(format!(
                "at most {} search areas are supported, got {}",
                u8::MAX,
                extents.len()
            )));
        }

        let areas: Vec<Area> = extents
            .into_iter()
            .enumerate()
            .map(|(index, extent)| Area {
                id: AreaId::from_index(index),
                extent,
            })
            .collect();
        if let Some(area) = areas.iter().find(|area| area.cell_count() == 0) {
            return Err(SearchError::configuration(format!(
                "area {} has an empty extent {}x{}",
                area.id, area.extent.width, area.extent.height
            )));
        }

        Ok(Self { areas })
    }

    pub fn floorplan() -> Self {
        Self {
            areas: Self::FLOORPLAN
                .iter()
                .enumerate()
                .map(|(index, extent)| Area {
                    id: AreaId::from_index(index),
                    extent: *extent,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn get(&self, id: AreaId) -> Option<&Area> {
        id.index().and_then(|index| self.areas.get(index))
    }

    pub fn contains(&self, id: AreaId) -> bool {
        self.get(id).is_some()
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn ids(&self) -> impl Iterator<Item = AreaId> + '_ {
        self.areas.iter().map(Area::id)
    }
}

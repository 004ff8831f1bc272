//! Per-tick view of the world grid

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{Location, Marker};
use crate::spatial::Region;

/// Contents of a single world cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub occupant: Option<Marker>,
    pub illumination: f64,
}

/// Mapping from location to cell contents
///
/// Sensors only read it. Illumination is rewritten by the driver from the
/// actuators' fields after the runtime pass.
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    cells: AHashMap<Location, Cell>,
}

impl WorldSnapshot {
    /// Empty, dark cells for every location in `region`
    pub fn new(region: &Region) -> Self {
        Self {
            cells: region.iter().map(|&loc| (loc, Cell::default())).collect(),
        }
    }

    pub fn get(&self, location: &Location) -> Option<&Cell> {
        self.cells.get(location)
    }

    /// Occupant at `location`; locations outside the world are vacant
    pub fn occupant(&self, location: &Location) -> Option<Marker> {
        self.cells.get(location).and_then(|cell| cell.occupant)
    }

    pub fn illumination(&self, location: &Location) -> f64 {
        self.cells.get(location).map_or(0.0, |cell| cell.illumination)
    }

    /// Set the occupant of a cell inside the world. Returns false if the
    /// location is outside the world.
    pub fn set_occupant(&mut self, location: Location, occupant: Option<Marker>) -> bool {
        match self.cells.get_mut(&location) {
            Some(cell) => {
                cell.occupant = occupant;
                true
            }
            None => false,
        }
    }

    /// Replace all illumination with the sum of the given light fields
    ///
    /// Field entries outside the world are ignored.
    pub fn apply_illumination<'a>(
        &mut self,
        fields: impl IntoIterator<Item = &'a AHashMap<Location, f64>>,
    ) {
        for cell in self.cells.values_mut() {
            cell.illumination = 0.0;
        }
        for field in fields {
            for (location, output) in field {
                if let Some(cell) = self.cells.get_mut(location) {
                    cell.illumination += output;
                }
            }
        }
    }

    /// All locations of the world
    pub fn region(&self) -> Region {
        self.cells.keys().copied().collect()
    }

    pub fn total_illumination(&self) -> f64 {
        let region = self.region();
        region.iter().map(|loc| self.illumination(loc)).sum()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

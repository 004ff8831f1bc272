//! Simulated humans occupying a 2x2 footprint

use serde::{Deserialize, Serialize};

use crate::core::types::Location;
use crate::spatial::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Human {
    pub location: Location,
}

impl Human {
    pub fn new(location: Location) -> Self {
        Self { location }
    }

    /// Square anchored at `location`, extending one cell in +x and +y
    pub fn footprint(&self) -> Region {
        Self::footprint_at(self.location)
    }

    pub fn footprint_at(location: Location) -> Region {
        Region::rect(location.x, location.x + 2, location.y, location.y + 2)
    }
}

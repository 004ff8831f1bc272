//! Directional camera: projects its viewing cone onto a 1-D angular raster
//!
//! A camera sees every location of its context region that lies inside the
//! cone spanned by its orientation and half its viewing angle. A capture
//! buckets the occupants of those locations by whole-degree bearing, so all
//! locations along the same ray collapse into a single pixel.

use std::collections::btree_map::{BTreeMap, Entry};

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{Location, Marker, Vec2};
use crate::spatial::{angle_between, directed_angle, distance, round_degrees, Region};
use crate::world::WorldSnapshot;

/// One pixel of a picture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureRecord {
    pub value: Option<Marker>,
    /// Rounded bearing relative to the camera orientation, in degrees
    pub angle: i32,
}

/// Angular projection of one snapshot, ordered by descending angle
///
/// Holds at most one record per angle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    records: Vec<PictureRecord>,
}

impl Picture {
    pub fn records(&self) -> &[PictureRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &PictureRecord> + '_ {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn value_at(&self, angle: i32) -> Option<Marker> {
        self.records
            .iter()
            .find(|record| record.angle == angle)
            .and_then(|record| record.value)
    }
}

#[derive(Debug, Clone)]
pub struct CameraSensor {
    location: Location,
    orientation: Vec2,
    viewing_angle_deg: f64,
    measurement_region: Region,
    /// Measured locations except the camera's own, with their rounded
    /// bearing. Farthest first.
    bearings: Vec<(Location, i32)>,
    picture: Picture,
}

impl CameraSensor {
    /// Build a camera restricted to `context`
    ///
    /// The measurement region and per-location bearings are fixed for the
    /// camera's lifetime and computed here once.
    pub fn new(
        location: Location,
        orientation: Vec2,
        viewing_angle_deg: f64,
        context: &Region,
    ) -> Result<Self> {
        let half_angle = (viewing_angle_deg / 2.0).ceil().abs();

        let mut measurement_region = Region::new();
        for &loc in context {
            let target = loc.offset_from(location);
            let angle = angle_between(&target.components(), &orientation.components())?;
            if angle.floor().abs() <= half_angle {
                measurement_region.insert(loc);
            }
        }

        let mut ranged = Vec::with_capacity(measurement_region.len());
        for &loc in measurement_region.iter().filter(|&&loc| loc != location) {
            let range = distance(&loc.components(), &location.components())?;
            let bearing = round_degrees(directed_angle(orientation, loc.offset_from(location)));
            ranged.push((range, loc, bearing));
        }
        ranged.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        let bearings = ranged.into_iter().map(|(_, loc, bearing)| (loc, bearing)).collect();

        Ok(Self {
            location,
            orientation,
            viewing_angle_deg,
            measurement_region,
            bearings,
            picture: Picture::default(),
        })
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn orientation(&self) -> Vec2 {
        self.orientation
    }

    pub fn viewing_angle_deg(&self) -> f64 {
        self.viewing_angle_deg
    }

    pub fn effective_measurement_region(&self) -> &Region {
        &self.measurement_region
    }

    /// Picture from the last `refresh`; empty before the first one
    pub fn picture(&self) -> &Picture {
        &self.picture
    }

    /// Measured locations (own location excluded) with their rounded
    /// bearing, farthest first
    pub fn bearings(&self) -> &[(Location, i32)] {
        &self.bearings
    }

    /// Measured locations whose rounded bearing equals `angle`
    pub fn locations_at_angle(&self, angle: i32) -> impl Iterator<Item = Location> + '_ {
        self.bearings
            .iter()
            .filter(move |(_, bearing)| *bearing == angle)
            .map(|(loc, _)| *loc)
    }

    /// Project the snapshot onto the angular raster
    ///
    /// Locations are visited farthest first. The first occupied location per
    /// angle wins; a vacant bucket is overwritten by a later occupant.
    pub fn capture(&self, snapshot: &WorldSnapshot) -> Picture {
        let mut pixels: BTreeMap<i32, Option<Marker>> = BTreeMap::new();

        for (loc, angle) in &self.bearings {
            let value = snapshot.occupant(loc);
            match pixels.entry(*angle) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(mut slot) => {
                    if slot.get().is_none() {
                        slot.insert(value);
                    }
                }
            }
        }

        Picture {
            records: pixels
                .into_iter()
                .rev()
                .map(|(angle, value)| PictureRecord { value, angle })
                .collect(),
        }
    }

    /// Recompute the stored picture from the latest snapshot
    pub fn refresh(&mut self, snapshot: &WorldSnapshot) {
        self.picture = self.capture(snapshot);
    }
}

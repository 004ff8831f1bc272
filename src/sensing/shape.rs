//! Shape virtual sensor: locates occupants by triangulating camera pairs
//!
//! A single camera only knows the bearing of an occupant, not its range.
//! Each camera's matching pixels are mapped back to the rays they came from,
//! and two cameras looking from different directions must both cover a
//! location before it counts as part of the shape.

use std::collections::BTreeSet;

use crate::core::error::Result;
use crate::sensing::camera::CameraSensor;
use crate::sensing::observation::{MarkerPredicate, Observation, SensedValue};
use crate::spatial::{angle_between, round_degrees, Region};

#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeSensor;

impl ShapeSensor {
    /// Two cameras can triangulate when they are neither parallel nor
    /// anti-parallel and their measurement regions overlap
    pub fn is_valid_pair(first: &CameraSensor, second: &CameraSensor) -> Result<bool> {
        let angle = round_degrees(angle_between(
            &first.orientation().components(),
            &second.orientation().components(),
        )?);
        if angle == 0 || angle == 180 {
            return Ok(false);
        }
        Ok(first
            .effective_measurement_region()
            .intersects(second.effective_measurement_region()))
    }

    /// Locations on every ray whose pixel satisfies `predicate`, plus the
    /// last matching value in picture order
    pub fn positive_region(
        camera: &CameraSensor,
        predicate: &MarkerPredicate,
    ) -> (SensedValue, Region) {
        let mut value = None;
        let mut angles = BTreeSet::new();

        for record in camera.picture().iter() {
            if predicate.matches(record.value) {
                value = record.value;
                angles.insert(record.angle);
            }
        }

        let region = camera
            .bearings()
            .iter()
            .filter(|(_, bearing)| angles.contains(bearing))
            .map(|(loc, _)| *loc)
            .collect();

        (value, region)
    }

    /// Triangulate over all valid camera pairs
    ///
    /// The value is the first valid pair's (in roster order), even when that
    /// pair agrees on no location. The region is the union of every pair's
    /// intersection. Returns `None` when that union is empty.
    pub fn observe(
        &self,
        cameras: &[CameraSensor],
        predicate: &MarkerPredicate,
    ) -> Result<Option<Observation>> {
        let mut value: Option<SensedValue> = None;
        let mut region = Region::new();

        for (i, first) in cameras.iter().enumerate() {
            for second in &cameras[i + 1..] {
                if !Self::is_valid_pair(first, second)? {
                    continue;
                }

                let (pair_value, first_region) = Self::positive_region(first, predicate);
                let (_, second_region) = Self::positive_region(second, predicate);
                value.get_or_insert(pair_value);
                region.extend(&first_region.intersection(&second_region));
            }
        }

        if region.is_empty() {
            return Ok(None);
        }
        Ok(value.map(|value| Observation { value, region }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Location, Marker, Vec2};
    use crate::world::WorldSnapshot;

    fn context() -> Region {
        Region::rect(0, 20, 0, 20)
    }

    fn camera(location: (i32, i32), orientation: (f64, f64)) -> CameraSensor {
        CameraSensor::new(
            Location::from(location),
            Vec2::new(orientation.0, orientation.1),
            90.0,
            &context(),
        )
        .unwrap()
    }

    fn snapshot_with_human(at: (i32, i32)) -> WorldSnapshot {
        let mut snapshot = WorldSnapshot::new(&context());
        snapshot.set_occupant(Location::from(at), Some(Marker::HUMAN));
        snapshot
    }

    #[test]
    fn test_parallel_cameras_are_invalid() {
        let a = camera((0, 0), (1.0, 1.0));
        let b = camera((0, 5), (2.0, 2.0));
        assert!(!ShapeSensor::is_valid_pair(&a, &b).unwrap());

        let c = camera((19, 19), (-1.0, -1.0));
        assert!(!ShapeSensor::is_valid_pair(&a, &c).unwrap());
    }

    #[test]
    fn test_crossing_cameras_are_valid() {
        let a = camera((0, 0), (1.0, 1.0));
        let b = camera((0, 19), (1.0, -1.0));
        assert!(ShapeSensor::is_valid_pair(&a, &b).unwrap());
    }

    #[test]
    fn test_disjoint_views_are_invalid() {
        let narrow = Region::rect(0, 3, 0, 3);
        let a = CameraSensor::new(Location::new(0, 0), Vec2::new(1.0, 1.0), 90.0, &narrow).unwrap();
        let far = Region::rect(15, 20, 15, 20);
        let b = CameraSensor::new(Location::new(19, 15), Vec2::new(-1.0, 1.0), 90.0, &far).unwrap();
        assert!(!ShapeSensor::is_valid_pair(&a, &b).unwrap());
    }

    #[test]
    fn test_triangulates_single_human() {
        let snapshot = snapshot_with_human((8, 8));
        let mut a = camera((0, 0), (1.0, 1.0));
        let mut b = camera((0, 19), (1.0, -1.0));
        a.refresh(&snapshot);
        b.refresh(&snapshot);

        let observation = ShapeSensor
            .observe(&[a, b], &MarkerPredicate::Is(Marker::HUMAN))
            .unwrap()
            .expect("two crossing cameras should locate the human");

        assert_eq!(observation.value, Some(Marker::HUMAN));
        assert!(observation.region.contains(&Location::new(8, 8)));
        // Far narrower than either ray on its own
        assert!(observation.region.len() < 5);
    }

    #[test]
    fn test_no_match_is_none() {
        let snapshot = WorldSnapshot::new(&context());
        let mut a = camera((0, 0), (1.0, 1.0));
        let mut b = camera((0, 19), (1.0, -1.0));
        a.refresh(&snapshot);
        b.refresh(&snapshot);

        let observation = ShapeSensor
            .observe(&[a, b], &MarkerPredicate::Is(Marker::HUMAN))
            .unwrap();
        assert!(observation.is_none());
    }

    #[test]
    fn test_single_camera_never_detects() {
        let snapshot = snapshot_with_human((8, 8));
        let mut a = camera((0, 0), (1.0, 1.0));
        a.refresh(&snapshot);

        let observation = ShapeSensor
            .observe(&[a], &MarkerPredicate::Is(Marker::HUMAN))
            .unwrap();
        assert!(observation.is_none());
    }

    #[test]
    fn test_positive_region_keeps_last_value() {
        let mut snapshot = snapshot_with_human((8, 8));
        snapshot.set_occupant(Location::new(12, 4), Some(Marker('R')));
        let mut a = camera((0, 0), (1.0, 1.0));
        a.refresh(&snapshot);

        let (value, region) = ShapeSensor::positive_region(&a, &MarkerPredicate::Occupied);
        // (12, 4) lies at a smaller (more clockwise) bearing, so it comes later
        assert_eq!(value, Some(Marker('R')));
        assert!(region.contains(&Location::new(8, 8)));
        assert!(region.contains(&Location::new(12, 4)));
    }

    #[test]
    fn test_value_from_first_valid_pair() {
        // The first camera looks away from the human, so the first pair
        // carries no value but the other pairs still locate it
        let snapshot = snapshot_with_human((2, 15));
        let mut cameras = vec![
            camera((0, 0), (1.0, 0.0)),
            camera((0, 19), (1.0, -1.0)),
            camera((19, 19), (-1.0, -1.0)),
        ];
        for cam in &mut cameras {
            cam.refresh(&snapshot);
        }
        assert!(ShapeSensor::is_valid_pair(&cameras[0], &cameras[1]).unwrap());

        let observation = ShapeSensor
            .observe(&cameras, &MarkerPredicate::Is(Marker::HUMAN))
            .unwrap()
            .expect("the remaining pair locates the human");
        assert_eq!(observation.value, None);
        assert!(observation.region.contains(&Location::new(2, 15)));
    }

    #[test]
    fn test_merges_every_pair() {
        let snapshot = snapshot_with_human((8, 8));
        let mut cameras = vec![
            camera((0, 0), (1.0, 1.0)),
            camera((0, 19), (1.0, -1.0)),
            camera((19, 0), (-1.0, 1.0)),
        ];
        for cam in &mut cameras {
            cam.refresh(&snapshot);
        }
        let predicate = MarkerPredicate::Is(Marker::HUMAN);

        let merged = ShapeSensor.observe(&cameras, &predicate).unwrap().unwrap();
        assert_eq!(merged.value, Some(Marker::HUMAN));
        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            let pair = [cameras[a].clone(), cameras[b].clone()];
            if let Some(observation) = ShapeSensor.observe(&pair, &predicate).unwrap() {
                assert!(observation.region.is_subset(&merged.region));
            }
        }
        assert!(merged.region.contains(&Location::new(8, 8)));
    }
}

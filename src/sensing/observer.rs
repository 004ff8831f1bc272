//! Observer - turns a phenomenon's state description into state instances
//!
//! Each declared property is resolved by name against a fixed registry of
//! virtual sensors. The regions of all properties are intersected and the
//! result is split into connected components, one state instance each.

use std::collections::BTreeMap;

use crate::core::error::{Result, RteError};
use crate::sensing::camera::CameraSensor;
use crate::sensing::observation::{MarkerPredicate, Observation, SensedValue};
use crate::sensing::shape::ShapeSensor;
use crate::spatial::Region;

pub const SHAPE: &str = "Shape";

/// Property name -> predicate the sensed value must satisfy
pub type StateDescription = BTreeMap<String, MarkerPredicate>;

/// Property name -> value observed for it
pub type ObservedState = BTreeMap<String, SensedValue>;

/// One disjoint region where a phenomenon's state currently holds
#[derive(Debug, Clone, PartialEq)]
pub struct StateInstance {
    /// `None` for the default phenomenon, which declares no predicates
    pub state: Option<ObservedState>,
    pub region: Region,
}

/// Closed set of virtual sensor strategies
#[derive(Debug, Clone, Copy)]
pub enum VirtualSensor {
    Shape(ShapeSensor),
}

impl VirtualSensor {
    pub fn observe(
        &self,
        cameras: &[CameraSensor],
        predicate: &MarkerPredicate,
    ) -> Result<Option<Observation>> {
        match self {
            VirtualSensor::Shape(sensor) => sensor.observe(cameras, predicate),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Observer {
    strategies: BTreeMap<String, VirtualSensor>,
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer {
    pub fn new() -> Self {
        let mut strategies = BTreeMap::new();
        strategies.insert(SHAPE.to_string(), VirtualSensor::Shape(ShapeSensor));
        Self { strategies }
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> + '_ {
        self.strategies.keys().map(String::as_str)
    }

    pub fn strategy(&self, property: &str) -> Result<&VirtualSensor> {
        self.strategies
            .get(property)
            .ok_or_else(|| RteError::UnsupportedProperty(property.to_string()))
    }

    /// Compute the state instances of one phenomenon for this tick
    ///
    /// An empty description yields the whole system region as a single
    /// stateless instance. A property without a registered strategy, or one
    /// whose sensor finds nothing, yields no instances at all.
    pub fn state_instances(
        &self,
        description: &StateDescription,
        cameras: &[CameraSensor],
        system_region: &Region,
    ) -> Result<Vec<StateInstance>> {
        if description.is_empty() {
            return Ok(vec![StateInstance {
                state: None,
                region: system_region.clone(),
            }]);
        }

        let mut observations = BTreeMap::new();
        for (property, predicate) in description {
            let strategy = match self.strategy(property) {
                Ok(strategy) => strategy,
                Err(err) => {
                    tracing::warn!("Skipping phenomenon: {}", err);
                    return Ok(Vec::new());
                }
            };
            match strategy.observe(cameras, predicate)? {
                Some(observation) => {
                    observations.insert(property.clone(), observation);
                }
                None => return Ok(Vec::new()),
            }
        }

        let mut regions = observations.values().map(|o| &o.region);
        let mut combined = regions.next().cloned().unwrap_or_default();
        for region in regions {
            combined = combined.intersection(region);
        }

        // Every component shares the same values
        let state: ObservedState = observations
            .iter()
            .map(|(property, observation)| (property.clone(), observation.value))
            .collect();

        let instances: Vec<StateInstance> = combined
            .split_into_components()
            .into_iter()
            .map(|region| StateInstance {
                state: Some(state.clone()),
                region,
            })
            .collect();

        tracing::debug!(
            "Observed {} state instance(s) over {} location(s)",
            instances.len(),
            combined.len()
        );

        Ok(instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Location, Marker, Vec2};
    use crate::world::WorldSnapshot;

    fn cameras_watching(occupied: &[(i32, i32)]) -> Vec<CameraSensor> {
        let context = Region::rect(0, 20, 0, 20);
        let mut snapshot = WorldSnapshot::new(&context);
        for &loc in occupied {
            snapshot.set_occupant(Location::from(loc), Some(Marker::HUMAN));
        }
        let mut cameras = vec![
            CameraSensor::new(Location::new(0, 0), Vec2::new(1.0, 1.0), 90.0, &context).unwrap(),
            CameraSensor::new(Location::new(0, 19), Vec2::new(1.0, -1.0), 90.0, &context).unwrap(),
        ];
        for camera in &mut cameras {
            camera.refresh(&snapshot);
        }
        cameras
    }

    fn human_description() -> StateDescription {
        [(SHAPE.to_string(), MarkerPredicate::Is(Marker::HUMAN))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_empty_description_yields_system_region() {
        let system = Region::rect(0, 5, 0, 5);
        let instances = Observer::new()
            .state_instances(&StateDescription::new(), &[], &system)
            .unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].state, None);
        assert_eq!(instances[0].region, system);
    }

    #[test]
    fn test_unsupported_property_yields_nothing() {
        let observer = Observer::new();
        assert!(matches!(
            observer.strategy("Temperature"),
            Err(RteError::UnsupportedProperty(_))
        ));

        let description: StateDescription =
            [("Temperature".to_string(), MarkerPredicate::Occupied)]
                .into_iter()
                .collect();
        let instances = observer
            .state_instances(&description, &cameras_watching(&[(8, 8)]), &Region::new())
            .unwrap();
        assert!(instances.is_empty());
    }

    #[test]
    fn test_no_sensors_yields_nothing() {
        let instances = Observer::new()
            .state_instances(&human_description(), &[], &Region::rect(0, 5, 0, 5))
            .unwrap();
        assert!(instances.is_empty());
    }

    #[test]
    fn test_human_becomes_one_instance() {
        let cameras = cameras_watching(&[(8, 8)]);
        let instances = Observer::new()
            .state_instances(&human_description(), &cameras, &Region::new())
            .unwrap();

        assert_eq!(instances.len(), 1);
        assert!(instances[0].region.contains(&Location::new(8, 8)));
        let state = instances[0].state.as_ref().unwrap();
        assert_eq!(state.get(SHAPE), Some(&Some(Marker::HUMAN)));
    }

    #[test]
    fn test_instances_are_disjoint_components() {
        let cameras = cameras_watching(&[(8, 8), (14, 12)]);
        let instances = Observer::new()
            .state_instances(&human_description(), &cameras, &Region::new())
            .unwrap();

        assert!(!instances.is_empty());
        for (i, a) in instances.iter().enumerate() {
            for b in &instances[i + 1..] {
                assert!(!a.region.intersects(&b.region));
            }
        }
        let all = instances
            .iter()
            .fold(Region::new(), |acc, inst| acc.union(&inst.region));
        assert!(all.contains(&Location::new(8, 8)));
        assert!(all.contains(&Location::new(14, 12)));
    }
}

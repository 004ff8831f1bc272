//! Controller - collects available changes per property and applies chosen ones
//!
//! The controller is the only code path that writes actuator inputs.

use std::collections::BTreeMap;

use crate::actuation::brightness::{AvailableChange, BrightnessActuator};
use crate::actuation::light::LightActuator;
use crate::core::config::RteConfig;
use crate::core::error::{Result, RteError};
use crate::core::types::ActuatorId;
use crate::spatial::Region;

pub const BRIGHTNESS: &str = "Brightness";

/// Property name -> every change available for it
pub type AvailableChanges = BTreeMap<String, Vec<AvailableChange>>;

/// Closed set of virtual actuator strategies
#[derive(Debug, Clone, Copy)]
pub enum VirtualActuator {
    Brightness(BrightnessActuator),
}

impl VirtualActuator {
    pub fn available_changes(
        &self,
        region: &Region,
        actuators: &[LightActuator],
    ) -> Vec<AvailableChange> {
        match self {
            VirtualActuator::Brightness(strategy) => strategy.available_changes(region, actuators),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Controller {
    strategies: BTreeMap<String, VirtualActuator>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(&RteConfig::default())
    }
}

impl Controller {
    pub fn new(config: &RteConfig) -> Self {
        let mut strategies = BTreeMap::new();
        strategies.insert(
            BRIGHTNESS.to_string(),
            VirtualActuator::Brightness(BrightnessActuator::new(config)),
        );
        Self { strategies }
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> + '_ {
        self.strategies.keys().map(String::as_str)
    }

    pub fn strategy(&self, property: &str) -> Result<&VirtualActuator> {
        self.strategies
            .get(property)
            .ok_or_else(|| RteError::UnsupportedProperty(property.to_string()))
    }

    /// Changes every registered property can make over `region`
    pub fn available_changes(
        &self,
        region: &Region,
        actuators: &[LightActuator],
    ) -> AvailableChanges {
        self.strategies
            .iter()
            .map(|(property, strategy)| {
                (property.clone(), strategy.available_changes(region, actuators))
            })
            .collect()
    }

    /// Write every setting of `change` to its actuator
    ///
    /// The assignment is checked against the roster before anything is
    /// written, so a bad assignment leaves all actuators untouched.
    pub fn apply(&self, change: &AvailableChange, actuators: &mut [LightActuator]) -> Result<()> {
        if let Some(setting) = change
            .assignment
            .iter()
            .find(|setting| setting.actuator.0 >= actuators.len())
        {
            return Err(RteError::UnknownActuator(setting.actuator.0));
        }

        for setting in &change.assignment {
            let light = &mut actuators[setting.actuator.0];
            if light.input_signal() != setting.input {
                tracing::debug!(
                    "Light at ({}, {}) -> {:?}",
                    light.location().x,
                    light.location().y,
                    setting.input
                );
            }
            light.set_input_signal(setting.input);
        }

        Ok(())
    }

    /// Set one actuator from a raw input level
    pub fn set_level(
        &self,
        actuator: ActuatorId,
        level: i64,
        actuators: &mut [LightActuator],
    ) -> Result<()> {
        let light = actuators
            .get_mut(actuator.0)
            .ok_or(RteError::UnknownActuator(actuator.0))?;
        light.set_input_level(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuation::brightness::ActuatorSetting;
    use crate::actuation::light::InputSignal;
    use crate::core::types::Location;

    fn lights() -> Vec<LightActuator> {
        let context = Region::rect(0, 30, 0, 30);
        vec![
            LightActuator::new(Location::new(8, 8), 7.0, 600.0, &context),
            LightActuator::new(Location::new(18, 8), 7.0, 600.0, &context),
        ]
    }

    #[test]
    fn test_available_changes_keyed_by_property() {
        let controller = Controller::default();
        let changes = controller.available_changes(&Region::single(Location::new(8, 8)), &lights());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[BRIGHTNESS].len(), 2);
    }

    #[test]
    fn test_unknown_property() {
        assert!(matches!(
            Controller::default().strategy("Temperature"),
            Err(RteError::UnsupportedProperty(_))
        ));
    }

    #[test]
    fn test_apply_sets_inputs() {
        let mut lights = lights();
        let change = AvailableChange {
            delta: 600.0,
            assignment: vec![ActuatorSetting {
                actuator: ActuatorId(1),
                input: InputSignal::On,
            }],
        };

        Controller::default().apply(&change, &mut lights).unwrap();
        assert!(!lights[0].is_on());
        assert!(lights[1].is_on());
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let mut lights = lights();
        let controller = Controller::default();
        let change = AvailableChange {
            delta: 0.0,
            assignment: vec![
                ActuatorSetting { actuator: ActuatorId(0), input: InputSignal::On },
                ActuatorSetting { actuator: ActuatorId(1), input: InputSignal::Off },
            ],
        };

        controller.apply(&change, &mut lights).unwrap();
        let first: Vec<_> = lights.iter().map(|l| l.input_signal()).collect();
        controller.apply(&change, &mut lights).unwrap();
        let second: Vec<_> = lights.iter().map(|l| l.input_signal()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_apply_unknown_actuator_writes_nothing() {
        let mut lights = lights();
        let change = AvailableChange {
            delta: 0.0,
            assignment: vec![
                ActuatorSetting { actuator: ActuatorId(0), input: InputSignal::On },
                ActuatorSetting { actuator: ActuatorId(5), input: InputSignal::On },
            ],
        };

        let err = Controller::default().apply(&change, &mut lights).unwrap_err();
        assert!(matches!(err, RteError::UnknownActuator(5)));
        assert!(!lights[0].is_on());
    }

    #[test]
    fn test_set_level_rejects_invalid_input() {
        let mut lights = lights();
        let controller = Controller::default();

        controller.set_level(ActuatorId(1), 1, &mut lights).unwrap();
        assert!(lights[1].is_on());

        let err = controller.set_level(ActuatorId(1), 2, &mut lights).unwrap_err();
        assert!(matches!(err, RteError::InvalidInputSignal(2)));
        assert!(lights[1].is_on());

        let err = controller.set_level(ActuatorId(9), 0, &mut lights).unwrap_err();
        assert!(matches!(err, RteError::UnknownActuator(9)));
    }
}

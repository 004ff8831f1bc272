//! Runtime environment - the priority-ordered decision pass
//!
//! Each pass walks the phenomenon descriptions in ascending priority:
//! observe state instances -> list available changes -> decide -> apply.
//! A description that runs later overwrites whatever an earlier one set on
//! the same actuators during the same pass.

use serde::{Deserialize, Serialize};

use crate::actuation::{Controller, LightActuator};
use crate::core::config::RteConfig;
use crate::core::error::{Result, RteError};
use crate::runtime::phenomenon::{ChangeMenu, Phenomenon};
use crate::sensing::{CameraSensor, Observer};
use crate::spatial::Region;

/// A change the pass wrote to the actuators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedChange {
    pub phenomenon: String,
    pub property: String,
    pub delta: f64,
    pub actuator_count: usize,
    /// Size of the state instance region the change was planned for
    pub region_size: usize,
}

/// Outcome of one pass, in application order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    pub instances: usize,
    pub applied: Vec<AppliedChange>,
}

pub struct RuntimeEnvironment {
    descriptions: Vec<Box<dyn Phenomenon>>,
    system_region: Region,
    observer: Observer,
    controller: Controller,
}

impl RuntimeEnvironment {
    /// Descriptions are sorted by ascending priority; equal priorities keep
    /// their given order
    pub fn new(
        mut descriptions: Vec<Box<dyn Phenomenon>>,
        system_region: Region,
        config: &RteConfig,
    ) -> Self {
        descriptions.sort_by_key(|description| description.priority());

        Self {
            descriptions,
            system_region,
            observer: Observer::new(),
            controller: Controller::new(config),
        }
    }

    pub fn ordered_descriptions(&self) -> impl Iterator<Item = &dyn Phenomenon> + '_ {
        self.descriptions.iter().map(|description| description.as_ref())
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    pub fn system_region(&self) -> &Region {
        &self.system_region
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Run every description once, lowest priority first
    pub fn run_pass(
        &self,
        cameras: &[CameraSensor],
        actuators: &mut [LightActuator],
    ) -> Result<PassReport> {
        let mut report = PassReport::default();
        for index in 0..self.descriptions.len() {
            self.call_behavior(index, cameras, actuators, &mut report)?;
        }
        Ok(report)
    }

    /// Run the description at `index` of the priority order
    pub fn call_behavior(
        &self,
        index: usize,
        cameras: &[CameraSensor],
        actuators: &mut [LightActuator],
        report: &mut PassReport,
    ) -> Result<()> {
        let Some(description) = self.descriptions.get(index) else {
            return Ok(());
        };

        let instances =
            self.observer
                .state_instances(description.state(), cameras, &self.system_region)?;
        report.instances += instances.len();

        for instance in &instances {
            let available = self.controller.available_changes(&instance.region, actuators);
            let menu: ChangeMenu = available
                .iter()
                .map(|(property, changes)| {
                    (
                        property.clone(),
                        changes.iter().map(|change| change.summary()).collect(),
                    )
                })
                .collect();

            let chosen = description.behavior(instance.state.as_ref(), &menu);

            for (property, summary) in &chosen {
                let Some(changes) = available.get(property) else {
                    tracing::warn!(
                        "{}: {}",
                        description.name(),
                        RteError::UnsupportedProperty(property.clone())
                    );
                    continue;
                };

                let Some(change) = changes.iter().find(|change| change.summary() == *summary) else {
                    tracing::warn!(
                        "{}: chosen {} change {:+.1} over {} actuator(s) is not available",
                        description.name(),
                        property,
                        summary.delta,
                        summary.actuator_count
                    );
                    continue;
                };

                tracing::debug!(
                    "{}: {} {:+.1} over {} actuator(s), region of {}",
                    description.name(),
                    property,
                    change.delta,
                    change.actuator_count(),
                    instance.region.len()
                );

                self.controller.apply(change, actuators)?;
                report.applied.push(AppliedChange {
                    phenomenon: description.name().to_string(),
                    property: property.clone(),
                    delta: change.delta,
                    actuator_count: change.actuator_count(),
                    region_size: instance.region.len(),
                });
            }
        }

        Ok(())
    }
}

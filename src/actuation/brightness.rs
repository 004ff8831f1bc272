//! Brightness virtual actuator: every way the lights can change a region
//!
//! Enumeration is exhaustive. For `n` lights reaching the target region it
//! visits every non-empty subset and, per subset of size `k`, all `2^k`
//! on/off assignments, i.e. `3^n - 1` changes in total. Factory layouts put
//! only a handful of lights over any one region, so no pruning is done;
//! large subset counts are spread over rayon instead. Callers only see
//! `available_changes`, so a pruned search can replace this without
//! changing the result.

use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::actuation::light::{InputSignal, LightActuator};
use crate::core::config::RteConfig;
use crate::core::types::ActuatorId;
use crate::spatial::Region;

/// Input for one physical actuator within a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorSetting {
    pub actuator: ActuatorId,
    pub input: InputSignal,
}

/// One fully specified way to realize a net output change over a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableChange {
    pub delta: f64,
    pub assignment: Vec<ActuatorSetting>,
}

impl AvailableChange {
    pub fn actuator_count(&self) -> usize {
        self.assignment.len()
    }

    /// What decision logic gets to see: no actuator identities
    pub fn summary(&self) -> ChangeSummary {
        ChangeSummary {
            delta: self.delta,
            actuator_count: self.actuator_count(),
        }
    }
}

/// Aggregate view of an available change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub delta: f64,
    pub actuator_count: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct BrightnessActuator {
    parallel_threshold: usize,
}

impl Default for BrightnessActuator {
    fn default() -> Self {
        Self::new(&RteConfig::default())
    }
}

impl BrightnessActuator {
    pub fn new(config: &RteConfig) -> Self {
        Self {
            parallel_threshold: config.parallel_threshold,
        }
    }

    /// Lights whose output region reaches `region`, in roster order
    pub fn select_actuators(region: &Region, actuators: &[LightActuator]) -> Vec<ActuatorId> {
        actuators
            .iter()
            .enumerate()
            .filter(|(_, light)| light.effective_output_region().intersects(region))
            .map(|(idx, _)| ActuatorId(idx))
            .collect()
    }

    /// All achievable changes over `region`
    ///
    /// Ordered by subset size, then lexicographically by roster position,
    /// then by assignment (first member varies slowest).
    pub fn available_changes(
        &self,
        region: &Region,
        actuators: &[LightActuator],
    ) -> Vec<AvailableChange> {
        let candidates = Self::select_actuators(region, actuators);
        let subsets: Vec<Vec<ActuatorId>> = (1..=candidates.len())
            .flat_map(|size| candidates.iter().copied().combinations(size))
            .collect();

        let per_subset: Vec<Vec<AvailableChange>> = if subsets.len() >= self.parallel_threshold {
            tracing::debug!("Enumerating {} actuator subsets in parallel", subsets.len());
            subsets
                .par_iter()
                .map(|subset| subset_changes(subset, actuators, region))
                .collect()
        } else {
            subsets
                .iter()
                .map(|subset| subset_changes(subset, actuators, region))
                .collect()
        };

        per_subset.into_iter().flatten().collect()
    }
}

/// Cross product of the members' candidate changes over the part of
/// `target` the subset reaches
fn subset_changes(
    subset: &[ActuatorId],
    actuators: &[LightActuator],
    target: &Region,
) -> Vec<AvailableChange> {
    let mut reach = Region::new();
    for id in subset {
        reach.extend(actuators[id.0].effective_output_region());
    }
    let output_region = reach.intersection(target);
    if output_region.is_empty() {
        return Vec::new();
    }

    let mut changes = vec![AvailableChange {
        delta: 0.0,
        assignment: Vec::with_capacity(subset.len()),
    }];

    for &id in subset {
        let options = actuators[id.0].candidate_changes(&output_region);
        changes = changes
            .iter()
            .flat_map(|partial| {
                options.iter().map(move |option| {
                    let mut assignment = partial.assignment.clone();
                    assignment.push(ActuatorSetting {
                        actuator: id,
                        input: option.input,
                    });
                    AvailableChange {
                        delta: partial.delta + option.delta,
                        assignment,
                    }
                })
            })
            .collect();
    }

    changes
}

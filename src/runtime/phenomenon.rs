//! Phenomenon descriptions: what state to look for and how to react to it
//!
//! Architecture: Trait + Data hybrid
//! - `Phenomenon` trait is the fixed capability interface the runtime drives
//! - `PhenomenonDescription` is the TOML-loadable implementation
//! - `DecisionPolicy` holds the reference decision functions

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::actuation::ChangeSummary;
use crate::sensing::{MarkerPredicate, ObservedState, StateDescription};

/// Property name -> summaries of the changes available for it
pub type ChangeMenu = BTreeMap<String, Vec<ChangeSummary>>;

/// Property name -> the one summary picked for it
pub type ChosenChanges = BTreeMap<String, ChangeSummary>;

/// Behavior unit driven by the runtime environment
pub trait Phenomenon: Send + Sync {
    fn name(&self) -> &str;

    /// Predicates per property; empty for the default phenomenon
    fn state(&self) -> &StateDescription;

    /// Lower priorities run first and can be overwritten by higher ones
    fn priority(&self) -> i32;

    /// Pick at most one change per property
    fn behavior(&self, state: Option<&ObservedState>, changes: &ChangeMenu) -> ChosenChanges;
}

/// Reference decision functions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionPolicy {
    /// Numerically smallest delta (the darkest option)
    SmallestDelta,
    /// Among deltas at or above `threshold`, the one touching the fewest actuators
    FewestActuatorsAbove { threshold: f64 },
}

impl DecisionPolicy {
    /// Ties go to the earliest summary
    pub fn choose(&self, changes: &[ChangeSummary]) -> Option<ChangeSummary> {
        match self {
            DecisionPolicy::SmallestDelta => changes
                .iter()
                .min_by_key(|change| OrderedFloat(change.delta))
                .copied(),
            DecisionPolicy::FewestActuatorsAbove { threshold } => changes
                .iter()
                .filter(|change| change.delta >= *threshold)
                .min_by_key(|change| change.actuator_count)
                .copied(),
        }
    }
}

/// Data-driven phenomenon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenomenonDescription {
    pub name: String,
    pub priority: i32,
    #[serde(default)]
    pub state: StateDescription,
    /// Property -> policy choosing among its changes
    #[serde(default)]
    pub decisions: BTreeMap<String, DecisionPolicy>,
}

impl PhenomenonDescription {
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
            state: StateDescription::new(),
            decisions: BTreeMap::new(),
        }
    }

    pub fn with_predicate(mut self, property: impl Into<String>, predicate: MarkerPredicate) -> Self {
        self.state.insert(property.into(), predicate);
        self
    }

    pub fn with_decision(mut self, property: impl Into<String>, policy: DecisionPolicy) -> Self {
        self.decisions.insert(property.into(), policy);
        self
    }
}

impl Phenomenon for PhenomenonDescription {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> &StateDescription {
        &self.state
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn behavior(&self, _state: Option<&ObservedState>, changes: &ChangeMenu) -> ChosenChanges {
        self.decisions
            .iter()
            .filter_map(|(property, policy)| {
                let available = changes.get(property)?;
                let chosen = policy.choose(available)?;
                Some((property.clone(), chosen))
            })
            .collect()
    }
}

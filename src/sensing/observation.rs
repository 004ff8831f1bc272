//! Predicates over sensed values and the observations virtual sensors emit

use serde::{Deserialize, Serialize};

use crate::core::types::Marker;
use crate::spatial::Region;

/// Value a camera pixel can hold: an occupant marker or nothing
pub type SensedValue = Option<Marker>;

/// Condition a sensed value must satisfy for a phenomenon's state to hold
///
/// In TOML: `{ is = "H" }`, `{ is_not = "H" }`, `"vacant"` or `"occupied"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPredicate {
    Is(Marker),
    /// Also satisfied by vacant cells
    IsNot(Marker),
    Vacant,
    Occupied,
}

impl MarkerPredicate {
    pub fn matches(&self, value: SensedValue) -> bool {
        match self {
            MarkerPredicate::Is(marker) => value == Some(*marker),
            MarkerPredicate::IsNot(marker) => value != Some(*marker),
            MarkerPredicate::Vacant => value.is_none(),
            MarkerPredicate::Occupied => value.is_some(),
        }
    }
}

/// Output of a virtual sensor: where a predicate holds, and the value seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub value: SensedValue,
    pub region: Region,
}

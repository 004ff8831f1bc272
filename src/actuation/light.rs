//! Radial light actuator

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::RteConfig;
use crate::core::error::{Result, RteError};
use crate::core::types::Location;
use crate::spatial::Region;

/// Binary light switch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum InputSignal {
    #[default]
    Off,
    On,
}

impl InputSignal {
    pub fn level(self) -> i64 {
        match self {
            InputSignal::Off => 0,
            InputSignal::On => 1,
        }
    }
}

impl TryFrom<i64> for InputSignal {
    type Error = RteError;

    fn try_from(level: i64) -> Result<Self> {
        match level {
            0 => Ok(InputSignal::Off),
            1 => Ok(InputSignal::On),
            other => Err(RteError::InvalidInputSignal(other)),
        }
    }
}

impl From<InputSignal> for i64 {
    fn from(signal: InputSignal) -> Self {
        signal.level()
    }
}

/// Output change one light can make over a region, and the input that makes it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateChange {
    pub delta: f64,
    pub input: InputSignal,
}

#[derive(Debug, Clone)]
pub struct LightActuator {
    location: Location,
    radius: f64,
    max_output: f64,
    falloff_exponent: f64,
    output_region: Region,
    input: InputSignal,
}

impl LightActuator {
    /// Light restricted to `context`, initially off
    pub fn new(location: Location, radius: f64, max_output: f64, context: &Region) -> Self {
        let output_region = context
            .iter()
            .copied()
            .filter(|loc| loc.distance_to(location) <= radius)
            .collect();

        Self {
            location,
            radius,
            max_output,
            falloff_exponent: RteConfig::default().falloff_exponent,
            output_region,
            input: InputSignal::Off,
        }
    }

    pub fn with_falloff_exponent(mut self, exponent: f64) -> Self {
        self.falloff_exponent = exponent;
        self
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn max_output(&self) -> f64 {
        self.max_output
    }

    pub fn input_signal(&self) -> InputSignal {
        self.input
    }

    pub fn is_on(&self) -> bool {
        self.input == InputSignal::On
    }

    pub(crate) fn set_input_signal(&mut self, input: InputSignal) {
        self.input = input;
    }

    /// Set the input from a raw level; anything but 0 or 1 is rejected
    /// and leaves the current signal untouched
    pub(crate) fn set_input_level(&mut self, level: i64) -> Result<()> {
        self.input = InputSignal::try_from(level)?;
        Ok(())
    }

    /// Context locations within `radius` of the light
    pub fn effective_output_region(&self) -> &Region {
        &self.output_region
    }

    /// Output at `location` when switched on
    ///
    /// Falls off as `max_output / distance^exponent`, with the full output
    /// at the light's own location.
    pub fn output_at(&self, location: Location) -> f64 {
        if location == self.location {
            return self.max_output;
        }
        self.max_output / location.distance_to(self.location).powf(self.falloff_exponent)
    }

    /// Output over the effective region given the current input
    pub fn current_field(&self) -> AHashMap<Location, f64> {
        self.output_region
            .iter()
            .map(|&loc| {
                let output = match self.input {
                    InputSignal::Off => 0.0,
                    InputSignal::On => self.output_at(loc),
                };
                (loc, output)
            })
            .collect()
    }

    /// The two switches this light offers over `region`
    ///
    /// The delta is plus or minus the average output over the part of
    /// `region` the light reaches, whatever the current input is. The
    /// option that changes the current input is listed first. Empty when
    /// the light does not reach `region`.
    pub fn candidate_changes(&self, region: &Region) -> Vec<CandidateChange> {
        let influence = self.output_region.intersection(region);
        if influence.is_empty() {
            return Vec::new();
        }

        let total: f64 = influence.iter().map(|&loc| self.output_at(loc)).sum();
        let average = total / influence.len() as f64;

        let brighten = CandidateChange {
            delta: average,
            input: InputSignal::On,
        };
        let darken = CandidateChange {
            delta: -average,
            input: InputSignal::Off,
        };

        match self.input {
            InputSignal::Off => vec![brighten, darken],
            InputSignal::On => vec![darken, brighten],
        }
    }
}

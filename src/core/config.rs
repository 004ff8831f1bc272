//! Runtime configuration with documented constants

use serde::{Deserialize, Serialize};

/// Tuning knobs for the perception-decision-actuation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RteConfig {
    /// Exponent of the light falloff `max_output / distance^exponent`
    ///
    /// At 0.8 the falloff is much gentler than inverse-square, so a light
    /// with radius 7 still contributes roughly a fifth of its maximum at
    /// the edge of its output region.
    pub falloff_exponent: f64,

    /// Minimum number of actuator subsets before brightness enumeration
    /// is fanned out over the rayon thread pool
    ///
    /// Enumeration is exponential in the number of lights covering a
    /// region. With 3-4 lights per region (the usual factory layout) there
    /// are at most 15 subsets and threading only adds overhead.
    pub parallel_threshold: usize,
}

impl Default for RteConfig {
    fn default() -> Self {
        Self {
            falloff_exponent: 0.8,
            parallel_threshold: 64,
        }
    }
}

impl RteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if !(self.falloff_exponent > 0.0) {
            return Err(format!(
                "falloff_exponent ({}) must be positive",
                self.falloff_exponent
            ));
        }

        if self.parallel_threshold == 0 {
            return Err("parallel_threshold must be at least 1".into());
        }

        Ok(())
    }
}

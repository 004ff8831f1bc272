//! Scenario files: world layout, devices and phenomena in TOML
//!
//! Each camera and light is bound to the context region containing its
//! location when the scenario is built. A device outside every context
//! gets an empty context and never perceives or affects anything.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::actuation::LightActuator;
use crate::core::config::RteConfig;
use crate::core::error::{Result, RteError};
use crate::core::types::{Location, Vec2};
use crate::runtime::{Phenomenon, PhenomenonDescription, RuntimeEnvironment};
use crate::sensing::CameraSensor;
use crate::spatial::Region;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: i32,
    pub height: i32,
}

/// Half-open rectangle `[min_x, max_x) x [min_y, max_y)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RectConfig {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl RectConfig {
    pub fn region(&self) -> Region {
        Region::rect(self.min_x, self.max_x, self.min_y, self.max_y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub location: [i32; 2],
    pub orientation: [f64; 2],
    #[serde(default = "default_viewing_angle")]
    pub viewing_angle_deg: f64,
}

fn default_viewing_angle() -> f64 {
    90.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightConfig {
    pub location: [i32; 2],
    pub radius: f64,
    pub max_output: f64,
}

/// Lights at every `start + k * step` grid point that lies in a context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightGridConfig {
    pub start: [i32; 2],
    pub step: i32,
    pub radius: f64,
    pub max_output: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub ticks: u64,
    pub seed: u64,
    /// Humans spawned in every context at the start of each tick
    pub spawn_per_context: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 100,
            seed: 12345,
            spawn_per_context: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub world: WorldConfig,
    #[serde(default)]
    pub rte: RteConfig,
    #[serde(default)]
    pub contexts: Vec<RectConfig>,
    #[serde(default)]
    pub cameras: Vec<CameraConfig>,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
    #[serde(default)]
    pub light_grid: Option<LightGridConfig>,
    #[serde(default)]
    pub phenomena: Vec<PhenomenonDescription>,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Everything a driver needs, wired together
pub struct Scenario {
    pub system_region: Region,
    pub contexts: Vec<Region>,
    pub cameras: Vec<CameraSensor>,
    pub lights: Vec<LightActuator>,
    pub rte: RuntimeEnvironment,
    pub simulation: SimulationConfig,
}

/// Load a scenario from a TOML file
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    let content = fs::read_to_string(path)?;
    ScenarioConfig::from_toml_str(&content)
}

impl ScenarioConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ScenarioConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(RteError::InvalidConfig(msg));

        if self.world.width <= 0 || self.world.height <= 0 {
            return invalid(format!(
                "world must be non-empty, got {}x{}",
                self.world.width, self.world.height
            ));
        }
        self.rte.validate().map_err(RteError::InvalidConfig)?;

        for rect in &self.contexts {
            if rect.min_x >= rect.max_x || rect.min_y >= rect.max_y {
                return invalid(format!("empty context rectangle {:?}", rect));
            }
        }
        for camera in &self.cameras {
            if !(camera.viewing_angle_deg > 0.0 && camera.viewing_angle_deg <= 360.0) {
                return invalid(format!(
                    "camera at {:?}: viewing angle {} outside (0, 360]",
                    camera.location, camera.viewing_angle_deg
                ));
            }
        }
        for light in &self.lights {
            if light.radius < 0.0 || light.max_output < 0.0 {
                return invalid(format!("light at {:?}: negative radius or output", light.location));
            }
        }
        if let Some(grid) = &self.light_grid {
            if grid.step <= 0 {
                return invalid(format!("light grid step must be positive, got {}", grid.step));
            }
        }

        Ok(())
    }

    pub fn system_region(&self) -> Region {
        Region::rect(0, self.world.width, 0, self.world.height)
    }

    /// Construct sensors, actuators and the runtime environment
    pub fn build(&self) -> Result<Scenario> {
        self.validate()?;

        let system_region = self.system_region();
        let contexts: Vec<Region> = self
            .contexts
            .iter()
            .map(|rect| rect.region().intersection(&system_region))
            .collect();
        let context_of = |location: Location| {
            contexts
                .iter()
                .find(|context| context.contains(&location))
                .cloned()
                .unwrap_or_default()
        };

        let mut cameras = Vec::with_capacity(self.cameras.len());
        for camera in &self.cameras {
            let location = Location::from(camera.location);
            cameras.push(CameraSensor::new(
                location,
                Vec2::from(camera.orientation),
                camera.viewing_angle_deg,
                &context_of(location),
            )?);
        }

        let make_light = |location: Location, radius: f64, max_output: f64, context: &Region| {
            LightActuator::new(location, radius, max_output, context)
                .with_falloff_exponent(self.rte.falloff_exponent)
        };

        let mut lights: Vec<LightActuator> = self
            .lights
            .iter()
            .map(|light| {
                let location = Location::from(light.location);
                make_light(location, light.radius, light.max_output, &context_of(location))
            })
            .collect();

        if let Some(grid) = &self.light_grid {
            let step = grid.step as usize;
            for x in (grid.start[0]..self.world.width).step_by(step) {
                for y in (grid.start[1]..self.world.height).step_by(step) {
                    let location = Location::new(x, y);
                    for context in contexts.iter().filter(|c| c.contains(&location)) {
                        lights.push(make_light(location, grid.radius, grid.max_output, context));
                    }
                }
            }
        }

        let descriptions: Vec<Box<dyn Phenomenon>> = self
            .phenomena
            .iter()
            .cloned()
            .map(|description| Box::new(description) as Box<dyn Phenomenon>)
            .collect();
        let rte = RuntimeEnvironment::new(descriptions, system_region.clone(), &self.rte);

        tracing::info!(
            "Scenario: {}x{} world, {} context(s), {} camera(s), {} light(s), {} phenomena",
            self.world.width,
            self.world.height,
            contexts.len(),
            cameras.len(),
            lights.len(),
            rte.len()
        );

        Ok(Scenario {
            system_region,
            contexts,
            cameras,
            lights,
            rte,
            simulation: self.simulation.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
        [world]
        width = 20
        height = 20

        [[contexts]]
        min_x = 0
        max_x = 20
        min_y = 0
        max_y = 20

        [[cameras]]
        location = [0, 0]
        orientation = [1.0, 1.0]

        [[cameras]]
        location = [0, 19]
        orientation = [1.0, -1.0]
        viewing_angle_deg = 80.0

        [[lights]]
        location = [8, 8]
        radius = 7.0
        max_output = 600.0

        [[phenomena]]
        name = "FactoryLighting"
        priority = 1
        state = { Shape = { is = "H" } }
        decisions = { Brightness = { kind = "fewest_actuators_above", threshold = 200.0 } }

        [[phenomena]]
        name = "NotHuman"
        priority = 0
        state = { Shape = { is_not = "H" } }
        decisions = { Brightness = { kind = "smallest_delta" } }

        [simulation]
        ticks = 5
    "#;

    #[test]
    fn test_parse_and_build() {
        let config = ScenarioConfig::from_toml_str(SMALL).unwrap();
        assert_eq!(config.simulation.ticks, 5);
        assert_eq!(config.simulation.seed, 12345);
        assert_eq!(config.cameras[0].viewing_angle_deg, 90.0);

        let scenario = config.build().unwrap();
        assert_eq!(scenario.cameras.len(), 2);
        assert_eq!(scenario.lights.len(), 1);
        assert_eq!(scenario.system_region.len(), 400);
        let order: Vec<&str> = scenario.rte.ordered_descriptions().map(|d| d.name()).collect();
        assert_eq!(order, vec!["NotHuman", "FactoryLighting"]);
    }

    #[test]
    fn test_light_grid_only_inside_contexts() {
        let toml_str = r#"
            [world]
            width = 30
            height = 30

            [[contexts]]
            min_x = 5
            max_x = 25
            min_y = 5
            max_y = 15

            [light_grid]
            start = [8, 8]
            step = 10
            radius = 7.0
            max_output = 600.0
        "#;
        let scenario = ScenarioConfig::from_toml_str(toml_str).unwrap().build().unwrap();
        let locations: Vec<Location> = scenario.lights.iter().map(|l| l.location()).collect();
        assert_eq!(locations, vec![Location::new(8, 8), Location::new(18, 8)]);
    }

    #[test]
    fn test_device_outside_contexts_sees_nothing() {
        let toml_str = r#"
            [world]
            width = 10
            height = 10

            [[contexts]]
            min_x = 0
            max_x = 4
            min_y = 0
            max_y = 4

            [[cameras]]
            location = [8, 8]
            orientation = [-1.0, -1.0]
        "#;
        let scenario = ScenarioConfig::from_toml_str(toml_str).unwrap().build().unwrap();
        assert!(scenario.cameras[0].effective_measurement_region().is_empty());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let bad_world = "[world]\nwidth = 0\nheight = 5";
        assert!(matches!(
            ScenarioConfig::from_toml_str(bad_world),
            Err(RteError::InvalidConfig(_))
        ));

        let bad_camera = r#"
            [world]
            width = 5
            height = 5
            [[cameras]]
            location = [0, 0]
            orientation = [1.0, 0.0]
            viewing_angle_deg = 0.0
        "#;
        assert!(matches!(
            ScenarioConfig::from_toml_str(bad_camera),
            Err(RteError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            ScenarioConfig::from_toml_str("[world\nwidth = 3"),
            Err(RteError::Toml(_))
        ));
    }

    #[test]
    fn test_load_bundled_scenario() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/scenarios/factory.toml");
        let config = load_scenario(&path).expect("bundled scenario should load");
        let scenario = config.build().unwrap();
        assert_eq!(scenario.contexts.len(), 2);
        assert_eq!(scenario.cameras.len(), 8);
        assert!(!scenario.lights.is_empty());
    }
}

//! Factory floor driver around the runtime environment

pub mod factory;
pub mod human;
pub mod scenario;

pub use factory::{FactorySimulation, TickReport};
pub use human::Human;
pub use scenario::{load_scenario, Scenario, ScenarioConfig, SimulationConfig};

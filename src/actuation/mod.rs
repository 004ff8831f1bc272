//! Actuation: physical lights and the virtual actuators that plan over them

pub mod brightness;
pub mod controller;
pub mod light;

pub use brightness::{ActuatorSetting, AvailableChange, BrightnessActuator, ChangeSummary};
pub use controller::{AvailableChanges, Controller, VirtualActuator, BRIGHTNESS};
pub use light::{CandidateChange, InputSignal, LightActuator};

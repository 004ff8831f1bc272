//! Perception: physical cameras and the virtual sensors built on them

pub mod camera;
pub mod observation;
pub mod observer;
pub mod shape;

pub use camera::{CameraSensor, Picture, PictureRecord};
pub use observation::{MarkerPredicate, Observation, SensedValue};
pub use observer::{ObservedState, Observer, StateDescription, StateInstance, VirtualSensor, SHAPE};
pub use shape::ShapeSensor;

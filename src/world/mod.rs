//! World state read by sensors and written back from actuator fields

pub mod snapshot;

pub use snapshot::{Cell, WorldSnapshot};

//! Discrete 2D geometry and region algebra

pub mod geometry;
pub mod region;

pub use geometry::{angle_between, directed_angle, distance, round_degrees};
pub use region::Region;

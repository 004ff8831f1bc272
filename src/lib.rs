//! Factory RTE - perceive a grid world through cameras, act on it through lights

pub mod actuation;
pub mod core;
pub mod runtime;
pub mod sensing;
pub mod simulation;
pub mod spatial;
pub mod world;

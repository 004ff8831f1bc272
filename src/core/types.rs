//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Simulation tick counter
pub type Tick = u64;

/// Discrete grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Vector pointing from `origin` to this location
    pub fn offset_from(&self, origin: Location) -> Vec2 {
        Vec2::new((self.x - origin.x) as f64, (self.y - origin.y) as f64)
    }

    pub fn components(&self) -> [f64; 2] {
        [self.x as f64, self.y as f64]
    }

    pub fn distance_to(&self, other: Location) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// The 8 surrounding locations (horizontal, vertical and diagonal)
    pub fn neighbors(&self) -> impl Iterator<Item = Location> + '_ {
        const OFFSETS: [(i32, i32); 8] = [
            (0, 1),
            (0, -1),
            (1, 0),
            (1, 1),
            (1, -1),
            (-1, 0),
            (-1, 1),
            (-1, -1),
        ];
        OFFSETS
            .iter()
            .map(move |&(dx, dy)| Location::new(self.x + dx, self.y + dy))
    }
}

impl From<(i32, i32)> for Location {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<[i32; 2]> for Location {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

/// 2D real vector, used for orientations and relative offsets
///
/// Not required to be unit length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn components(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// Occupant marker placed on a world cell (e.g. `H` for a human)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marker(pub char);

impl Marker {
    pub const HUMAN: Marker = Marker('H');
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a physical actuator within the roster handed to the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActuatorId(pub usize);

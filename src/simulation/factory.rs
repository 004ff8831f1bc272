//! Factory simulation - drives the runtime environment tick by tick
//!
//! Per tick:
//! 1. Spawn humans at random spots in every context
//! 2. Refresh every camera picture from the snapshot
//! 3. Run the runtime environment's priority-ordered pass
//! 4. Recompute illumination from the light fields
//! 5. Remove the humans spawned this tick

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::actuation::LightActuator;
use crate::core::error::Result;
use crate::core::types::{Location, Marker, Tick};
use crate::runtime::{PassReport, RuntimeEnvironment};
use crate::sensing::CameraSensor;
use crate::simulation::human::Human;
use crate::simulation::scenario::Scenario;
use crate::spatial::Region;
use crate::world::WorldSnapshot;

/// What happened during one tick
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub tick: Tick,
    /// Anchors of the humans present during the pass
    pub humans: Vec<Location>,
    pub pass: PassReport,
    pub lit_actuators: usize,
    pub total_illumination: f64,
    /// Text rendering taken before the tick's humans left
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

pub struct FactorySimulation {
    snapshot: WorldSnapshot,
    width: i32,
    height: i32,
    contexts: Vec<Region>,
    cameras: Vec<CameraSensor>,
    lights: Vec<LightActuator>,
    rte: RuntimeEnvironment,
    humans: Vec<Human>,
    rng: ChaCha8Rng,
    spawn_per_context: usize,
    render_frames: bool,
    current_tick: Tick,
}

impl FactorySimulation {
    pub fn new(scenario: Scenario) -> Self {
        let seed = scenario.simulation.seed;
        Self::with_seed(scenario, seed)
    }

    pub fn with_seed(scenario: Scenario, seed: u64) -> Self {
        let width = scenario.system_region.iter().map(|l| l.x + 1).max().unwrap_or(0);
        let height = scenario.system_region.iter().map(|l| l.y + 1).max().unwrap_or(0);

        Self {
            snapshot: WorldSnapshot::new(&scenario.system_region),
            width,
            height,
            contexts: scenario.contexts,
            cameras: scenario.cameras,
            lights: scenario.lights,
            rte: scenario.rte,
            humans: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            spawn_per_context: scenario.simulation.spawn_per_context,
            render_frames: false,
            current_tick: 0,
        }
    }

    pub fn set_render_frames(&mut self, render: bool) {
        self.render_frames = render;
    }

    pub fn set_spawn_per_context(&mut self, count: usize) {
        self.spawn_per_context = count;
    }

    pub fn snapshot(&self) -> &WorldSnapshot {
        &self.snapshot
    }

    pub fn lights(&self) -> &[LightActuator] {
        &self.lights
    }

    pub fn cameras(&self) -> &[CameraSensor] {
        &self.cameras
    }

    pub fn humans(&self) -> &[Human] {
        &self.humans
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// Place a human and mark its footprint as occupied
    pub fn spawn_human(&mut self, location: Location) -> usize {
        let human = Human::new(location);
        for loc in &human.footprint() {
            self.snapshot.set_occupant(*loc, Some(Marker::HUMAN));
        }
        self.humans.push(human);
        self.humans.len() - 1
    }

    /// Remove a human; cells another human still covers stay occupied
    pub fn remove_human(&mut self, index: usize) -> Option<Human> {
        if index >= self.humans.len() {
            return None;
        }
        let human = self.humans.remove(index);
        let still_covered = self
            .humans
            .iter()
            .fold(Region::new(), |acc, other| acc.union(&other.footprint()));
        for loc in human.footprint().difference(&still_covered) {
            self.snapshot.set_occupant(loc, None);
        }
        Some(human)
    }

    /// Move a human one step if its new footprint stays inside a context
    pub fn move_human(&mut self, index: usize, dx: i32, dy: i32) -> bool {
        let Some(human) = self.humans.get(index) else {
            return false;
        };
        let target = Location::new(human.location.x + dx, human.location.y + dy);
        let footprint = Human::footprint_at(target);
        if !self.contexts.iter().any(|context| footprint.is_subset(context)) {
            return false;
        }

        self.remove_human(index);
        let new_index = self.spawn_human(target);
        // Keep the moved human at its old position in the list
        let moved = self.humans.remove(new_index);
        self.humans.insert(index, moved);
        true
    }

    /// Random anchor whose footprint fits inside `context`
    fn random_anchor(&mut self, context_index: usize) -> Option<Location> {
        let context = &self.contexts[context_index];
        let anchors: Vec<Location> = context
            .iter()
            .copied()
            .filter(|&loc| Human::footprint_at(loc).is_subset(context))
            .collect();
        if anchors.is_empty() {
            return None;
        }
        Some(anchors[self.rng.gen_range(0..anchors.len())])
    }

    /// Advance one tick
    pub fn step(&mut self) -> Result<TickReport> {
        let first_spawned = self.humans.len();
        for context_index in 0..self.contexts.len() {
            for _ in 0..self.spawn_per_context {
                if let Some(anchor) = self.random_anchor(context_index) {
                    self.spawn_human(anchor);
                }
            }
        }
        let humans: Vec<Location> = self.humans.iter().map(|h| h.location).collect();

        for camera in &mut self.cameras {
            camera.refresh(&self.snapshot);
        }

        let pass = self.rte.run_pass(&self.cameras, &mut self.lights)?;

        let fields: Vec<_> = self.lights.iter().map(|light| light.current_field()).collect();
        self.snapshot.apply_illumination(&fields);

        let frame = self.render_frames.then(|| self.render());
        let lit_actuators = self.lights.iter().filter(|light| light.is_on()).count();
        let total_illumination = self.snapshot.total_illumination();

        while self.humans.len() > first_spawned {
            self.remove_human(self.humans.len() - 1);
        }

        tracing::debug!(
            "Tick {}: {} change(s) applied, {}/{} lights on",
            self.current_tick,
            pass.applied.len(),
            lit_actuators,
            self.lights.len()
        );

        let report = TickReport {
            tick: self.current_tick,
            humans,
            pass,
            lit_actuators,
            total_illumination,
            frame,
        };
        self.current_tick += 1;
        Ok(report)
    }

    /// Run `ticks` steps
    pub fn run(&mut self, ticks: u64) -> Result<Vec<TickReport>> {
        (0..ticks).map(|_| self.step()).collect()
    }

    /// Text view: `H` occupant, `#` lit, `.` dark, `X` outside every context
    ///
    /// One row per x coordinate.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(((self.height + 1) * self.width) as usize);
        for x in 0..self.width {
            for y in 0..self.height {
                let loc = Location::new(x, y);
                let ch = if !self.contexts.iter().any(|c| c.contains(&loc)) {
                    'X'
                } else if self.snapshot.occupant(&loc).is_some() {
                    'H'
                } else if self.snapshot.illumination(&loc) > 0.0 {
                    '#'
                } else {
                    '.'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

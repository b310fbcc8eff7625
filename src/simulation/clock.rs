//! Frame-driven simulation lifecycle

use super::world::SimWorld;

/// Drives the per-tick update cycle and owns the start/stop/reset
/// lifecycle. Rendering happens outside the clock, between steps.
#[derive(Debug, Default)]
pub struct SimulationClock {
    running: bool,
    ticks: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stops the clock and clears the tick counter.
    #[allow(dead_code)]
    pub fn reset(&mut self) {
        self.running = false;
        self.ticks = 0;
    }

    #[allow(dead_code)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances the world by one tick. No-op while stopped; returns whether
    /// a tick ran.
    pub fn step(&mut self, world: &mut SimWorld) -> bool {
        if !self.running {
            return false;
        }
        world.tick();
        self.ticks += 1;
        true
    }
}

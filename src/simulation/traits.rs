//! Core simulation trait
//!
//! Defines the lifecycle the frame driver calls into. Implementors own all
//! of their state; nothing is shared through globals.

use crate::camera::InputSnapshot;

/// A frame-stepped simulation
pub trait Simulation {
    /// Called once when the simulation is attached to a manager.
    fn initialize(&mut self) {}

    /// Advance the simulation by one time step
    ///
    /// # Arguments
    /// * `delta_time` - Time elapsed since last update in seconds
    /// * `input` - Input sampled for this step
    fn update(&mut self, delta_time: f32, input: &InputSnapshot);

    /// Get simulation name for logs
    fn name(&self) -> &str;

    /// Whether simulation is currently running
    fn is_running(&self) -> bool;

    /// Start/pause simulation
    fn set_running(&mut self, running: bool);

    /// Reset simulation to initial state
    fn reset(&mut self);

    /// Optional: Custom cleanup when simulation is removed
    fn cleanup(&mut self) {
        // Default: no cleanup needed
    }
}

// src/lib.rs
//! Atrium
//!
//! Simulation core for a first-person room scene: input-driven player
//! movement with collision clamping, grabbable spheres under gravity and a
//! floor-following walk mode. Rendering is left to the host engine, which
//! reads a [`simulation::world::FrameOutput`] every frame.

pub mod camera;
pub mod config;
pub mod error;
pub mod math;
pub mod performance;
pub mod prelude;
pub mod simulation;

// Re-export main types for convenience
pub use config::SimConfig;
pub use error::SimError;
pub use simulation::world::RoomSimulation;

/// Creates a room simulation with the default scene tuning
pub fn default() -> RoomSimulation {
    RoomSimulation::new(SimConfig::default())
}

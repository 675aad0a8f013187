//! # Atrium Prelude
//!
//! Commonly used types in one import.
//!
//! ```
//! use atrium::prelude::*;
//!
//! let mut room = RoomSimulation::new(SimConfig::default());
//! let mut input = InputController::new();
//! input.set_pointer_locked(true);
//!
//! let frame = room.frame(1.0 / 60.0, &input.snapshot());
//! assert_eq!(frame.bodies.len(), 1);
//! ```

// Re-export the frame driver and its configuration
pub use crate::config::{BodySettings, CollisionPolicy, PlayerSettings, SimConfig};
pub use crate::simulation::world::{BodySnapshot, FrameOutput, RoomSimulation};

// Re-export the two components
pub use crate::simulation::body::{BodyId, BodyState, DynamicBody, DynamicBodySimulator, PickHit};
pub use crate::simulation::player::{
    MotionEnvironment, MovementCommand, PlayerMotionController, PlayerState, SpeedMode,
};

// Re-export scene collaborators
pub use crate::simulation::animation::{CharacterRig, LimbKind};
pub use crate::simulation::floor::{FlatFloor, FloorProbe, NoFloor};
pub use crate::simulation::room::{RoomBounds, WallPanel};

// Re-export simulation framework
pub use crate::simulation::manager::SimulationManager;
pub use crate::simulation::traits::Simulation;

// Re-export input and camera
pub use crate::camera::{FirstPersonCamera, InputController, InputSnapshot};

pub use crate::error::{SimError, SimResult};
pub use crate::math::{Pose, Ray};
pub use crate::performance::{FrameClock, PerformanceMetrics};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3, Zero};

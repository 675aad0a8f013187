//! Scene tuning
//!
//! All constants the prototype scenes hard-coded live here as plain settings
//! structs with sensible defaults, plus a builder that validates them.
//!
//! ```
//! use atrium::config::{CollisionPolicy, SimConfig};
//!
//! let config = SimConfig::builder()
//!     .with_room_size(10.0, 10.0)
//!     .with_wall_restitution(-0.6)
//!     .with_collision_policy(CollisionPolicy::FloorFollow)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.room.half_extent_x, 5.0);
//! ```

use cgmath::Vector3;

use crate::error::{SimError, SimResult};
use crate::simulation::room::RoomBounds;

/// Which collision model the player controller uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Reject any move that would overlap a free body; optionally clamp to the room.
    SphereExclusion { clamp_to_room: bool },
    /// Ignore walls and keep the eye pinned above whatever the floor probe hits.
    FloorFollow,
}

impl Default for CollisionPolicy {
    fn default() -> Self {
        CollisionPolicy::SphereExclusion {
            clamp_to_room: true,
        }
    }
}

/// Player rig tuning
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSettings {
    /// Radius of the (simplified) player capsule on the floor plane
    pub radius: f32,
    /// Eye height above the floor, used by floor-follow
    pub eye_height: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Rig position at scene start
    pub spawn: Vector3<f32>,
    /// How far below the eye the floor probe may reach
    pub max_probe_distance: f32,
    /// Radians of look rotation per pixel of mouse motion
    pub look_sensitivity: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            radius: 0.35,
            eye_height: 1.7,
            walk_speed: 5.0,
            run_speed: 9.0,
            spawn: Vector3::new(0.0, 1.7, 2.0),
            max_probe_distance: 2.5,
            look_sensitivity: 0.002,
        }
    }
}

/// Grabbable sphere tuning
#[derive(Debug, Clone, PartialEq)]
pub struct BodySettings {
    pub radius: f32,
    /// Continuous decay rate `k` in `v *= exp(-k * dt)`, per second
    pub linear_damping: f32,
    /// Signed velocity multiplier applied on wall contact (e.g. -0.6)
    pub wall_restitution: f32,
    /// Camera-local offset of a held body
    pub grab_offset: Vector3<f32>,
    /// Speed given to a body on release
    pub throw_force: f32,
    pub spawn: Vector3<f32>,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            radius: 0.5,
            linear_damping: damping_rate_from_per_frame(0.98, 60.0),
            wall_restitution: -0.6,
            grab_offset: Vector3::new(0.0, -0.2, -0.8),
            throw_force: 14.0,
            spawn: Vector3::new(0.0, 0.5, 0.0),
        }
    }
}

/// Complete configuration for a room simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub room: RoomBounds,
    pub player: PlayerSettings,
    pub body: BodySettings,
    /// Vertical acceleration (negative is down)
    pub gravity: f32,
    /// Upper bound on the `dt` any component sees
    pub max_frame_dt: f32,
    pub collision_policy: CollisionPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            room: RoomBounds::square(10.0, 4.0),
            player: PlayerSettings::default(),
            body: BodySettings::default(),
            gravity: -9.8,
            max_frame_dt: 0.1,
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl SimConfig {
    pub fn builder() -> SimConfigBuilder {
        SimConfigBuilder::default()
    }

    /// Clamp a raw frame duration into `[0, max_frame_dt]`.
    ///
    /// NaN and negative durations become 0.
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_nan() || dt <= 0.0 {
            0.0
        } else {
            dt.min(self.max_frame_dt)
        }
    }
}

/// Convert a flat per-frame damping multiplier at a reference frame rate into
/// the equivalent continuous decay rate.
pub fn damping_rate_from_per_frame(per_frame: f32, reference_hz: f32) -> f32 {
    -per_frame.ln() * reference_hz
}

/// Fluent builder for [`SimConfig`]
#[derive(Debug, Clone, Default)]
pub struct SimConfigBuilder {
    config: SimConfig,
}

impl SimConfigBuilder {
    /// Full room size (wall to wall) on X and Z
    pub fn with_room_size(mut self, size_x: f32, size_z: f32) -> Self {
        self.config.room = RoomBounds::new(
            size_x / 2.0,
            size_z / 2.0,
            self.config.room.wall_height,
            self.config.room.floor_height,
        );
        self
    }

    pub fn with_room(mut self, room: RoomBounds) -> Self {
        self.config.room = room;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.config.gravity = gravity;
        self
    }

    pub fn with_max_frame_dt(mut self, max_dt: f32) -> Self {
        self.config.max_frame_dt = max_dt;
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.config.collision_policy = policy;
        self
    }

    pub fn with_player(mut self, player: PlayerSettings) -> Self {
        self.config.player = player;
        self
    }

    pub fn with_speeds(mut self, walk: f32, run: f32) -> Self {
        self.config.player.walk_speed = walk;
        self.config.player.run_speed = run;
        self
    }

    pub fn with_body(mut self, body: BodySettings) -> Self {
        self.config.body = body;
        self
    }

    pub fn with_wall_restitution(mut self, restitution: f32) -> Self {
        self.config.body.wall_restitution = restitution;
        self
    }

    pub fn with_linear_damping(mut self, rate: f32) -> Self {
        self.config.body.linear_damping = rate;
        self
    }

    pub fn with_grab_offset(mut self, offset: Vector3<f32>) -> Self {
        self.config.body.grab_offset = offset;
        self
    }

    /// Validate and produce the configuration
    pub fn build(self) -> SimResult<SimConfig> {
        let c = self.config;

        let positive = [
            ("room.half_extent_x", c.room.half_extent_x),
            ("room.half_extent_z", c.room.half_extent_z),
            ("room.wall_height", c.room.wall_height),
            ("player.radius", c.player.radius),
            ("player.eye_height", c.player.eye_height),
            ("body.radius", c.body.radius),
            ("max_frame_dt", c.max_frame_dt),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("player.walk_speed", c.player.walk_speed),
            ("player.run_speed", c.player.run_speed),
            ("player.max_probe_distance", c.player.max_probe_distance),
            ("body.linear_damping", c.body.linear_damping),
            ("body.throw_force", c.body.throw_force),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        let min_half = c.room.half_extent_x.min(c.room.half_extent_z);
        if c.body.radius >= min_half || c.player.radius >= min_half {
            return Err(SimError::InvalidConfig(format!(
                "room half extent {min_half} is too small for player radius {} / body radius {}",
                c.player.radius, c.body.radius
            )));
        }

        // The probe starts at the eye, so it must at least reach the feet.
        if c.player.max_probe_distance < c.player.eye_height {
            return Err(SimError::InvalidConfig(format!(
                "player.max_probe_distance {} is shorter than player.eye_height {}",
                c.player.max_probe_distance, c.player.eye_height
            )));
        }

        if c.body.wall_restitution.abs() > 1.0 {
            log::warn!(
                "wall restitution {} has magnitude > 1 and adds energy on every bounce",
                c.body.wall_restitution
            );
        }

        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::builder().build().unwrap();
        assert_eq!(config.room.half_extent_x, 5.0);
        assert_eq!(config.body.wall_restitution, -0.6);
    }

    #[test]
    fn test_damping_rate_matches_reference_frame() {
        let k = damping_rate_from_per_frame(0.98, 60.0);
        let per_frame = (-k / 60.0).exp();
        assert!((per_frame - 0.98).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_room_smaller_than_body() {
        let err = SimConfig::builder()
            .with_room_size(0.8, 10.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_non_positive_frame_cap() {
        assert!(SimConfig::builder().with_max_frame_dt(0.0).build().is_err());
    }

    #[test]
    fn test_rejects_probe_shorter_than_eye_height() {
        let player = PlayerSettings {
            eye_height: 1.7,
            max_probe_distance: 1.0,
            ..PlayerSettings::default()
        };
        let err = SimConfig::builder().with_player(player).build().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));

        let player = PlayerSettings {
            eye_height: 1.7,
            max_probe_distance: 1.7,
            ..PlayerSettings::default()
        };
        assert!(SimConfig::builder().with_player(player).build().is_ok());
    }

    #[test]
    fn test_energy_injecting_restitution_is_accepted() {
        // Some scenes deliberately use an exaggerated bounce.
        let config = SimConfig::builder()
            .with_wall_restitution(-5.0)
            .build()
            .unwrap();
        assert_eq!(config.body.wall_restitution, -5.0);
    }

    #[test]
    fn test_clamp_dt() {
        let config = SimConfig::default();
        assert_eq!(config.clamp_dt(5.0), 0.1);
        assert_eq!(config.clamp_dt(-1.0), 0.0);
        assert_eq!(config.clamp_dt(f32::NAN), 0.0);
        assert_eq!(config.clamp_dt(0.016), 0.016);
    }
}

//! First-person player movement
//!
//! The player rig is a point at eye height with a circular footprint. Each
//! frame the controller builds a candidate position from the held movement
//! intents and then applies one of two collision policies:
//!
//! - sphere exclusion: the whole move is rejected if the footprint would
//!   overlap a free body (no sliding), then optionally clamped to the room
//! - floor follow: walls are ignored and the eye is kept `eye_height` above
//!   whatever the floor probe reports, falling under gravity when it misses

use cgmath::{Vector3, Zero};

use super::body::DynamicBody;
use super::floor::FloorProbe;
use super::room::RoomBounds;
use crate::config::{CollisionPolicy, PlayerSettings};
use crate::error::SimResult;
use crate::math::{flatten_forward, horizontal_distance, strafe_axis, Pose};

/// Walking or running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedMode {
    #[default]
    Walk,
    Run,
}

/// Movement intents held during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementCommand {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub speed: SpeedMode,
}

impl MovementCommand {
    pub fn forward() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }

    /// True when any direction intent is set
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.strafe_left || self.strafe_right
    }
}

/// Mutable state of the player rig
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub pose: Pose,
    /// Set while carrying a body; movement is suppressed
    pub is_interacting: bool,
    pub speed_mode: SpeedMode,
    /// Accumulated fall speed in floor-follow mode
    pub vertical_velocity: f32,
    /// Whether the last floor-follow probe found ground
    pub grounded: bool,
}

impl PlayerState {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            pose: Pose::at(position),
            is_interacting: false,
            speed_mode: SpeedMode::Walk,
            vertical_velocity: 0.0,
            grounded: true,
        }
    }
}

/// Everything outside the player that movement collides with
pub struct MotionEnvironment<'a> {
    pub room: &'a RoomBounds,
    pub bodies: &'a [DynamicBody],
    pub floor: &'a dyn FloorProbe,
    pub gravity: f32,
}

/// Turns movement commands into rig positions
#[derive(Debug, Clone)]
pub struct PlayerMotionController {
    state: PlayerState,
    settings: PlayerSettings,
    policy: CollisionPolicy,
}

impl PlayerMotionController {
    pub fn new(settings: PlayerSettings, policy: CollisionPolicy) -> Self {
        Self {
            state: PlayerState::new(settings.spawn),
            settings,
            policy,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: CollisionPolicy) {
        self.policy = policy;
    }

    pub fn set_interacting(&mut self, interacting: bool) {
        self.state.is_interacting = interacting;
    }

    /// Speed for the given mode
    pub fn speed(&self, mode: SpeedMode) -> f32 {
        match mode {
            SpeedMode::Walk => self.settings.walk_speed,
            SpeedMode::Run => self.settings.run_speed,
        }
    }

    /// Horizontal displacement for `command` over `dt` while facing `facing`.
    pub fn displacement(
        &self,
        dt: f32,
        command: &MovementCommand,
        facing: Vector3<f32>,
    ) -> SimResult<Vector3<f32>> {
        let forward = flatten_forward(facing)?;
        let strafe = strafe_axis(forward)?;

        let mut direction = Vector3::zero();
        if command.forward {
            direction += forward;
        }
        if command.backward {
            direction -= forward;
        }
        if command.strafe_left {
            direction += strafe;
        }
        if command.strafe_right {
            direction -= strafe;
        }

        Ok(direction * self.speed(command.speed) * dt)
    }

    /// Advance the rig one frame.
    ///
    /// On `DegenerateDirection` nothing is moved and the caller is expected
    /// to skip movement for this frame.
    pub fn step(
        &mut self,
        dt: f32,
        command: &MovementCommand,
        facing: Vector3<f32>,
        env: &MotionEnvironment<'_>,
    ) -> SimResult<Pose> {
        self.state.speed_mode = command.speed;

        let moving = command.is_moving() && !self.state.is_interacting;
        let delta = if moving {
            self.displacement(dt, command, facing)?
        } else {
            Vector3::zero()
        };
        let candidate = self.state.pose.position + delta;

        match self.policy {
            CollisionPolicy::SphereExclusion { clamp_to_room } => {
                if moving && !self.blocked_by_body(candidate, env.bodies) {
                    self.state.pose.position = candidate;
                }
                if clamp_to_room {
                    self.state.pose.position = env
                        .room
                        .clamp_horizontal(self.state.pose.position, self.settings.radius);
                }
            }
            CollisionPolicy::FloorFollow => {
                self.state.pose.position = self.follow_floor(dt, candidate, env);
            }
        }

        Ok(self.state.pose)
    }

    /// Point the rig; position is unaffected.
    pub fn set_orientation(&mut self, orientation: cgmath::Quaternion<f32>) {
        self.state.pose.orientation = orientation;
    }

    pub fn reset(&mut self) {
        self.state = PlayerState::new(self.settings.spawn);
    }

    /// A candidate inside a free body's footprint is blocked unless it moves
    /// away from a body the player already overlaps.
    fn blocked_by_body(&self, candidate: Vector3<f32>, bodies: &[DynamicBody]) -> bool {
        let current = self.state.pose.position;
        bodies.iter().filter(|b| !b.is_held()).any(|b| {
            let reach = self.settings.radius + b.radius;
            let after = horizontal_distance(candidate, b.position);
            after < reach && after <= horizontal_distance(current, b.position)
        })
    }

    fn follow_floor(
        &mut self,
        dt: f32,
        mut candidate: Vector3<f32>,
        env: &MotionEnvironment<'_>,
    ) -> Vector3<f32> {
        let eye = self.settings.eye_height;
        let probe_reach = self.settings.max_probe_distance;

        match env.floor.floor_height(candidate, probe_reach) {
            Some(height) => {
                candidate.y = height + eye;
                self.state.vertical_velocity = 0.0;
                if !self.state.grounded {
                    log::debug!("landed on floor at height {height:.2}");
                }
                self.state.grounded = true;
            }
            None => {
                if self.state.grounded {
                    log::debug!("floor probe missed at {candidate:?}, falling");
                }
                self.state.grounded = false;
                self.state.vertical_velocity += env.gravity * dt;
                candidate.y += self.state.vertical_velocity * dt;

                // Never fall through the room floor while real geometry is absent.
                let fallback = env.room.floor_height + eye;
                if candidate.y < fallback {
                    candidate.y = fallback;
                    self.state.vertical_velocity = 0.0;
                    self.state.grounded = true;
                }
            }
        }

        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::floor::{FlatFloor, NoFloor};
    use cgmath::InnerSpace;

    fn settings_at(spawn: Vector3<f32>) -> PlayerSettings {
        PlayerSettings {
            spawn,
            walk_speed: 5.0,
            ..PlayerSettings::default()
        }
    }

    fn sphere_mode() -> CollisionPolicy {
        CollisionPolicy::SphereExclusion {
            clamp_to_room: true,
        }
    }

    #[test]
    fn test_forward_motion_along_facing() {
        let room = RoomBounds::square(10.0, 4.0);
        let env = MotionEnvironment {
            room: &room,
            bodies: &[],
            floor: &NoFloor,
            gravity: -9.8,
        };
        let mut player = PlayerMotionController::new(settings_at(Vector3::zero()), sphere_mode());

        let pose = player
            .step(0.1, &MovementCommand::forward(), Vector3::new(0.0, 0.0, -1.0), &env)
            .unwrap();
        assert!((pose.position - Vector3::new(0.0, 0.0, -0.5)).magnitude() < 1e-6);
    }

    #[test]
    fn test_sphere_exclusion_rejects_whole_move() {
        let room = RoomBounds::square(10.0, 4.0);
        let bodies = [DynamicBody::new(Vector3::new(0.0, 0.0, -0.3), 0.5)];
        let env = MotionEnvironment {
            room: &room,
            bodies: &bodies,
            floor: &NoFloor,
            gravity: -9.8,
        };
        let mut player = PlayerMotionController::new(settings_at(Vector3::zero()), sphere_mode());

        let pose = player
            .step(0.1, &MovementCommand::forward(), Vector3::new(0.0, 0.0, -1.0), &env)
            .unwrap();
        assert_eq!(pose.position, Vector3::zero());
    }

    #[test]
    fn test_body_resting_on_player_still_lets_it_step_away() {
        let room = RoomBounds::square(10.0, 4.0);
        let bodies = [DynamicBody::new(Vector3::new(0.0, 0.0, -0.3), 0.5)];
        let env = MotionEnvironment {
            room: &room,
            bodies: &bodies,
            floor: &NoFloor,
            gravity: -9.8,
        };
        let facing = Vector3::new(0.0, 0.0, -1.0);
        let mut player = PlayerMotionController::new(settings_at(Vector3::zero()), sphere_mode());
        let back = MovementCommand {
            backward: true,
            ..MovementCommand::default()
        };

        // Still overlapping after the step, but further away: accepted.
        let pose = player.step(0.1, &back, facing, &env).unwrap();
        assert!((pose.position.z - 0.5).abs() < 1e-5);

        // Walking back in is rejected.
        let pose = player
            .step(0.1, &MovementCommand::forward(), facing, &env)
            .unwrap();
        assert!((pose.position.z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_held_body_does_not_block() {
        let room = RoomBounds::square(10.0, 4.0);
        let mut body = DynamicBody::new(Vector3::new(0.0, 0.0, -0.3), 0.5);
        body.grab();
        let bodies = [body];
        let env = MotionEnvironment {
            room: &room,
            bodies: &bodies,
            floor: &NoFloor,
            gravity: -9.8,
        };
        let mut player = PlayerMotionController::new(settings_at(Vector3::zero()), sphere_mode());

        let pose = player
            .step(0.1, &MovementCommand::forward(), Vector3::new(0.0, 0.0, -1.0), &env)
            .unwrap();
        assert!((pose.position.z + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_interacting_suppresses_movement() {
        let room = RoomBounds::square(10.0, 4.0);
        let env = MotionEnvironment {
            room: &room,
            bodies: &[],
            floor: &NoFloor,
            gravity: -9.8,
        };
        let mut player = PlayerMotionController::new(settings_at(Vector3::zero()), sphere_mode());
        player.set_interacting(true);

        let pose = player
            .step(0.1, &MovementCommand::forward(), Vector3::new(0.0, 0.0, -1.0), &env)
            .unwrap();
        assert_eq!(pose.position, Vector3::zero());
    }

    #[test]
    fn test_strafe_left_and_right_are_opposite() {
        let player = PlayerMotionController::new(settings_at(Vector3::zero()), sphere_mode());
        let facing = Vector3::new(0.0, 0.0, -1.0);
        let left = MovementCommand {
            strafe_left: true,
            ..MovementCommand::default()
        };
        let right = MovementCommand {
            strafe_right: true,
            ..MovementCommand::default()
        };

        let l = player.displacement(1.0, &left, facing).unwrap();
        let r = player.displacement(1.0, &right, facing).unwrap();
        assert!((l + r).magnitude() < 1e-6);
        assert!(l.x < 0.0, "strafing left while facing -Z moves towards -X");
    }

    #[test]
    fn test_opposing_intents_cancel() {
        let player = PlayerMotionController::new(settings_at(Vector3::zero()), sphere_mode());
        let both = MovementCommand {
            forward: true,
            backward: true,
            ..MovementCommand::default()
        };
        let d = player
            .displacement(0.1, &both, Vector3::new(0.0, 0.0, -1.0))
            .unwrap();
        assert_eq!(d, Vector3::zero());
    }

    #[test]
    fn test_run_uses_run_speed() {
        let player = PlayerMotionController::new(settings_at(Vector3::zero()), sphere_mode());
        let run = MovementCommand {
            forward: true,
            speed: SpeedMode::Run,
            ..MovementCommand::default()
        };
        let d = player
            .displacement(1.0, &run, Vector3::new(0.0, 0.0, -1.0))
            .unwrap();
        assert!((d.magnitude() - player.settings().run_speed).abs() < 1e-5);
    }

    #[test]
    fn test_looking_straight_down_is_degenerate() {
        let room = RoomBounds::square(10.0, 4.0);
        let env = MotionEnvironment {
            room: &room,
            bodies: &[],
            floor: &NoFloor,
            gravity: -9.8,
        };
        let mut player = PlayerMotionController::new(settings_at(Vector3::zero()), sphere_mode());

        let result = player.step(0.1, &MovementCommand::forward(), Vector3::new(0.0, -1.0, 0.0), &env);
        assert!(result.is_err());
        assert_eq!(player.state().pose.position, Vector3::zero());
    }

    #[test]
    fn test_room_clamp_stops_at_wall() {
        let room = RoomBounds::square(10.0, 4.0);
        let env = MotionEnvironment {
            room: &room,
            bodies: &[],
            floor: &NoFloor,
            gravity: -9.8,
        };
        let mut player =
            PlayerMotionController::new(settings_at(Vector3::new(0.0, 1.7, -4.6)), sphere_mode());

        let pose = player
            .step(0.1, &MovementCommand::forward(), Vector3::new(0.0, 0.0, -1.0), &env)
            .unwrap();
        assert!((pose.position.z + 4.65).abs() < 1e-6);
    }

    #[test]
    fn test_floor_follow_snaps_to_eye_height() {
        let room = RoomBounds::square(10.0, 4.0);
        let floor = FlatFloor::new(0.25, 5.0, 5.0);
        let env = MotionEnvironment {
            room: &room,
            bodies: &[],
            floor: &floor,
            gravity: -9.8,
        };
        let mut player = PlayerMotionController::new(
            settings_at(Vector3::new(0.0, 1.0, 0.0)),
            CollisionPolicy::FloorFollow,
        );

        let pose = player
            .step(0.1, &MovementCommand::default(), Vector3::new(0.0, 0.0, -1.0), &env)
            .unwrap();
        assert!((pose.position.y - (0.25 + 1.7)).abs() < 1e-6);
        assert!(player.state().grounded);
    }

    #[test]
    fn test_floor_follow_falls_when_probe_misses() {
        let room = RoomBounds::square(10.0, 4.0);
        let floor = FlatFloor::new(0.0, 5.0, 5.0);
        let env = MotionEnvironment {
            room: &room,
            bodies: &[],
            floor: &floor,
            gravity: -9.8,
        };
        let mut player = PlayerMotionController::new(
            settings_at(Vector3::new(0.0, 20.0, 0.0)),
            CollisionPolicy::FloorFollow,
        );

        let first = player
            .step(0.1, &MovementCommand::default(), Vector3::new(0.0, 0.0, -1.0), &env)
            .unwrap();
        let v1 = player.state().vertical_velocity;
        let second = player
            .step(0.1, &MovementCommand::default(), Vector3::new(0.0, 0.0, -1.0), &env)
            .unwrap();
        let v2 = player.state().vertical_velocity;

        assert!(first.position.y < 20.0);
        assert!(second.position.y < first.position.y);
        assert!(v2 < v1, "fall speed accumulates");
        assert!(!player.state().grounded);
    }

    #[test]
    fn test_floor_follow_falls_until_floor_in_reach() {
        let room = RoomBounds::square(10.0, 4.0);
        let floor = FlatFloor::new(0.0, 5.0, 5.0);
        let env = MotionEnvironment {
            room: &room,
            bodies: &[],
            floor: &floor,
            gravity: -9.8,
        };
        let mut player = PlayerMotionController::new(
            settings_at(Vector3::new(0.0, 6.0, 0.0)),
            CollisionPolicy::FloorFollow,
        );

        for _ in 0..100 {
            player
                .step(0.05, &MovementCommand::default(), Vector3::new(0.0, 0.0, -1.0), &env)
                .unwrap();
        }
        assert!((player.state().pose.position.y - 1.7).abs() < 1e-5);
        assert_eq!(player.state().vertical_velocity, 0.0);
    }

    #[test]
    fn test_floor_follow_without_geometry_uses_fallback_floor() {
        let room = RoomBounds::square(10.0, 4.0);
        let env = MotionEnvironment {
            room: &room,
            bodies: &[],
            floor: &NoFloor,
            gravity: -9.8,
        };
        let mut player = PlayerMotionController::new(
            settings_at(Vector3::new(0.0, 3.0, 0.0)),
            CollisionPolicy::FloorFollow,
        );

        for _ in 0..200 {
            player
                .step(0.05, &MovementCommand::default(), Vector3::new(0.0, 0.0, -1.0), &env)
                .unwrap();
        }
        assert!((player.state().pose.position.y - 1.7).abs() < 1e-5);
    }

    #[test]
    fn test_floor_follow_ignores_walls() {
        let room = RoomBounds::square(10.0, 4.0);
        let floor = |_: Vector3<f32>, _: f32| Some(0.0_f32);
        let env = MotionEnvironment {
            room: &room,
            bodies: &[],
            floor: &floor,
            gravity: -9.8,
        };
        let mut player = PlayerMotionController::new(
            settings_at(Vector3::new(0.0, 1.7, -4.9)),
            CollisionPolicy::FloorFollow,
        );

        let pose = player
            .step(0.1, &MovementCommand::forward(), Vector3::new(0.0, 0.0, -1.0), &env)
            .unwrap();
        assert!((pose.position.z + 5.4).abs() < 1e-5);
    }
}

//! Per-frame driver for the room scene
//!
//! Ties the player controller, the body simulator, the look camera and the
//! optional avatar together in a fixed order:
//!
//! 1. clamp `dt`
//! 2. apply mouse look
//! 3. grab / release edges
//! 4. player movement
//! 5. body integration (held bodies follow the camera)
//! 6. avatar limb swing
//!
//! The result of each frame is a [`FrameOutput`] for the render side.

use cgmath::Vector3;

use super::animation::{CharacterRig, Limb};
use super::body::{BodyId, DynamicBody, DynamicBodySimulator};
use super::floor::{FlatFloor, FloorProbe};
use super::player::{MotionEnvironment, MovementCommand, PlayerMotionController, PlayerState};
use super::traits::Simulation;
use crate::camera::{FirstPersonCamera, InputSnapshot};
use crate::config::SimConfig;
use crate::math::{horizontal_distance, Pose, Ray};

/// Pose of one body as handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub position: Vector3<f32>,
    pub radius: f32,
    pub held: bool,
}

/// Everything the render side needs after a frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub frame: u64,
    /// The clamped step actually simulated
    pub dt: f32,
    pub camera: Pose,
    pub bodies: Vec<BodySnapshot>,
    pub limbs: Option<[Limb; 4]>,
}

/// First-person room with grabbable spheres
pub struct RoomSimulation {
    config: SimConfig,
    player: PlayerMotionController,
    camera: FirstPersonCamera,
    bodies: DynamicBodySimulator,
    spawn_points: Vec<Vector3<f32>>,
    floor: Box<dyn FloorProbe>,
    avatar: Option<CharacterRig>,
    running: bool,
    frame: u64,
    last_output: Option<FrameOutput>,
}

impl RoomSimulation {
    /// Room with a single sphere at the configured spawn point.
    pub fn new(config: SimConfig) -> Self {
        let mut bodies = DynamicBodySimulator::new(config.room, config.gravity);
        bodies.add_body(DynamicBody::from_settings(&config.body));

        Self {
            player: PlayerMotionController::new(config.player.clone(), config.collision_policy),
            camera: FirstPersonCamera::default(),
            spawn_points: vec![config.body.spawn],
            floor: Box::new(FlatFloor::from(&config.room)),
            bodies,
            avatar: None,
            running: true,
            frame: 0,
            last_output: None,
            config,
        }
    }

    /// Replace the floor query, e.g. with a probe into loaded scene geometry.
    pub fn with_floor(mut self, floor: Box<dyn FloorProbe>) -> Self {
        self.floor = floor;
        self
    }

    /// Animate an avatar while the player walks.
    pub fn with_avatar(mut self, rig: CharacterRig) -> Self {
        self.avatar = Some(rig);
        self
    }

    pub fn add_body(&mut self, body: DynamicBody) -> BodyId {
        self.spawn_points.push(body.position);
        self.bodies.add_body(body)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerState {
        self.player.state()
    }

    pub fn camera(&self) -> &FirstPersonCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FirstPersonCamera {
        &mut self.camera
    }

    pub fn bodies(&self) -> &DynamicBodySimulator {
        &self.bodies
    }

    pub fn avatar(&self) -> Option<&CharacterRig> {
        self.avatar.as_ref()
    }

    pub fn latest_frame(&self) -> Option<&FrameOutput> {
        self.last_output.as_ref()
    }

    /// Current camera pose (eye at the rig position)
    pub fn camera_pose(&self) -> Pose {
        self.camera.pose(self.player.state().pose.position)
    }

    /// Run one frame.
    pub fn frame(&mut self, raw_dt: f32, input: &InputSnapshot) -> FrameOutput {
        let dt = self.config.clamp_dt(raw_dt);
        if raw_dt > self.config.max_frame_dt {
            log::debug!("frame hitch: {:.3}s clamped to {:.3}s", raw_dt, dt);
        }

        if input.pointer_locked {
            self.camera
                .apply_look(input.look_delta, self.config.player.look_sensitivity);
        }
        self.player.set_orientation(self.camera.orientation());

        self.handle_grab_edges(input);

        let start = self.player.state().pose.position;
        let command = if input.pointer_locked {
            input.command
        } else {
            MovementCommand {
                speed: input.command.speed,
                ..MovementCommand::default()
            }
        };
        let env = MotionEnvironment {
            room: &self.config.room,
            bodies: self.bodies.bodies(),
            floor: self.floor.as_ref(),
            gravity: self.config.gravity,
        };
        if let Err(e) = self.player.step(dt, &command, self.camera.facing(), &env) {
            log::debug!("skipping player movement this frame: {}", e);
        }

        let camera = self.camera_pose();
        self.bodies.step(dt, &camera);

        let moved = horizontal_distance(start, camera.position) > 1e-6;
        if let Some(rig) = &mut self.avatar {
            rig.update(dt, moved);
        }

        self.frame += 1;
        let output = FrameOutput {
            frame: self.frame,
            dt,
            camera,
            bodies: self
                .bodies
                .bodies()
                .iter()
                .enumerate()
                .map(|(i, b)| BodySnapshot {
                    id: BodyId(i),
                    position: b.position,
                    radius: b.radius,
                    held: b.is_held(),
                })
                .collect(),
            limbs: self.avatar.as_ref().map(|rig| *rig.limbs()),
        };
        self.last_output = Some(output.clone());
        output
    }

    fn handle_grab_edges(&mut self, input: &InputSnapshot) {
        let camera = self.camera_pose();

        if input.grab_pressed && self.bodies.held().is_none() {
            if let Some(hit) = self.bodies.pick(&Ray::from_view(&camera)) {
                // The id comes from pick, so it is always valid.
                if self.bodies.grab(hit.body).is_ok() {
                    self.player.set_interacting(true);
                }
            }
        }

        if input.grab_released {
            if let Some(id) = self.bodies.held() {
                match self
                    .bodies
                    .release(id, camera.facing(), self.config.body.throw_force)
                {
                    Ok(_) => self.player.set_interacting(false),
                    Err(e) => log::warn!("could not release body {:?}: {}", id, e),
                }
            }
        }
    }
}

impl Simulation for RoomSimulation {
    fn initialize(&mut self) {
        log::info!(
            "room {:.1} x {:.1}, {} bodies, policy {:?}",
            self.config.room.half_extent_x * 2.0,
            self.config.room.half_extent_z * 2.0,
            self.bodies.bodies().len(),
            self.config.collision_policy
        );
    }

    fn update(&mut self, delta_time: f32, input: &InputSnapshot) {
        if self.running {
            self.frame(delta_time, input);
        }
    }

    fn name(&self) -> &str {
        "Room"
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    fn reset(&mut self) {
        self.player.reset();
        self.camera.reset_to_default();
        self.bodies.reset(&self.spawn_points);
        if let Some(rig) = &mut self.avatar {
            rig.reset();
        }
        self.frame = 0;
        self.last_output = None;
    }
}

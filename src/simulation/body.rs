//! Grabbable rigid spheres
//!
//! Each free body is integrated once per frame in a fixed order:
//!
//! 1. gravity into vertical velocity
//! 2. velocity into position
//! 3. exponential damping `v *= exp(-k * dt)`
//! 4. floor contact (clamp, kill vertical velocity)
//! 5. wall contact on X and Z independently (clamp, scale by restitution)
//!
//! Damping is continuous decay so the result does not depend on frame rate
//! the way a flat per-frame multiplier would. The default rate reproduces a
//! 0.98 per-frame multiplier at 60 Hz.
//!
//! Held bodies skip integration entirely; their position is derived from the
//! camera pose and a fixed camera-local offset.

use cgmath::{Vector3, Zero};

use super::room::RoomBounds;
use crate::config::BodySettings;
use crate::error::{SimError, SimResult};
use crate::math::{try_normalize, Pose, Ray};

/// Handle to a body owned by a [`DynamicBodySimulator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

/// Whether a body is simulated or carried by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    Free,
    Held,
}

/// A sphere with simple rigid-body state
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicBody {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub radius: f32,
    pub state: BodyState,
    /// Continuous decay rate, per second
    pub linear_damping: f32,
    /// Signed multiplier applied to a velocity component on wall contact
    pub wall_restitution: f32,
    /// Camera-local position while held
    pub grab_offset: Vector3<f32>,
}

impl DynamicBody {
    pub fn new(position: Vector3<f32>, radius: f32) -> Self {
        let defaults = BodySettings::default();
        Self {
            position,
            velocity: Vector3::zero(),
            radius,
            state: BodyState::Free,
            linear_damping: defaults.linear_damping,
            wall_restitution: defaults.wall_restitution,
            grab_offset: defaults.grab_offset,
        }
    }

    pub fn from_settings(settings: &BodySettings) -> Self {
        Self {
            position: settings.spawn,
            velocity: Vector3::zero(),
            radius: settings.radius,
            state: BodyState::Free,
            linear_damping: settings.linear_damping,
            wall_restitution: settings.wall_restitution,
            grab_offset: settings.grab_offset,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector3<f32>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_damping(mut self, rate: f32) -> Self {
        self.linear_damping = rate;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.wall_restitution = restitution;
        self
    }

    pub fn is_held(&self) -> bool {
        self.state == BodyState::Held
    }

    /// Start carrying the body. Calling this on a held body changes nothing.
    pub fn grab(&mut self) {
        self.state = BodyState::Held;
        self.velocity = Vector3::zero();
    }

    /// Let go and throw along `direction` at `force` units per second.
    ///
    /// Returns `Ok(false)` when the body was not held. A zero direction is
    /// rejected and the body stays held.
    pub fn release(&mut self, direction: Vector3<f32>, force: f32) -> SimResult<bool> {
        if !self.is_held() {
            return Ok(false);
        }
        let dir = try_normalize(direction)?;
        self.state = BodyState::Free;
        self.velocity = dir * force;
        Ok(true)
    }

    /// Advance one frame under `gravity` inside `room`.
    pub fn integrate(&mut self, dt: f32, gravity: f32, room: &RoomBounds) {
        if self.is_held() {
            return;
        }

        self.velocity.y += gravity * dt;
        self.position += self.velocity * dt;
        self.velocity *= (-self.linear_damping * dt).exp();

        let floor = room.floor_height + self.radius;
        if self.position.y < floor {
            self.position.y = floor;
            self.velocity.y = 0.0;
        }

        let limit_x = room.half_extent_x - self.radius;
        if self.position.x.abs() > limit_x {
            self.position.x = limit_x.copysign(self.position.x);
            self.velocity.x *= self.wall_restitution;
        }

        let limit_z = room.half_extent_z - self.radius;
        if self.position.z.abs() > limit_z {
            self.position.z = limit_z.copysign(self.position.z);
            self.velocity.z *= self.wall_restitution;
        }
    }

    /// Snap a held body in front of the camera, kept inside `room`.
    pub fn follow(&mut self, camera: &Pose, room: &RoomBounds) {
        if self.is_held() {
            let mut position =
                room.clamp_horizontal(camera.transform_point(self.grab_offset), self.radius);
            position.y = position.y.max(room.floor_height + self.radius);
            self.position = position;
        }
    }
}

/// Result of a successful pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub body: BodyId,
    /// Distance along the ray
    pub distance: f32,
    pub point: Vector3<f32>,
}

/// Owns the dynamic bodies of a room and steps them every frame
#[derive(Debug, Clone)]
pub struct DynamicBodySimulator {
    bodies: Vec<DynamicBody>,
    room: RoomBounds,
    gravity: f32,
}

impl DynamicBodySimulator {
    pub fn new(room: RoomBounds, gravity: f32) -> Self {
        Self {
            bodies: Vec::new(),
            room,
            gravity,
        }
    }

    pub fn add_body(&mut self, body: DynamicBody) -> BodyId {
        self.bodies.push(body);
        let id = BodyId(self.bodies.len() - 1);
        log::debug!("added body {:?} at {:?}", id, self.bodies[id.0].position);
        id
    }

    pub fn bodies(&self) -> &[DynamicBody] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> SimResult<&DynamicBody> {
        self.bodies.get(id.0).ok_or(SimError::UnknownBody(id))
    }

    pub fn body_mut(&mut self, id: BodyId) -> SimResult<&mut DynamicBody> {
        self.bodies.get_mut(id.0).ok_or(SimError::UnknownBody(id))
    }

    pub fn room(&self) -> &RoomBounds {
        &self.room
    }

    /// The body currently carried, if any
    pub fn held(&self) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.is_held()).map(BodyId)
    }

    /// Step every body by `dt`; held bodies follow `camera`.
    pub fn step(&mut self, dt: f32, camera: &Pose) -> &[DynamicBody] {
        for body in &mut self.bodies {
            match body.state {
                BodyState::Held => body.follow(camera, &self.room),
                BodyState::Free => body.integrate(dt, self.gravity, &self.room),
            }
        }
        &self.bodies
    }

    pub fn grab(&mut self, id: BodyId) -> SimResult<()> {
        let body = self.body_mut(id)?;
        if !body.is_held() {
            log::info!("grabbed body {:?}", id);
        }
        body.grab();
        Ok(())
    }

    /// Release `id` with a throw; `Ok(false)` if it was not held.
    pub fn release(&mut self, id: BodyId, direction: Vector3<f32>, force: f32) -> SimResult<bool> {
        let released = self.body_mut(id)?.release(direction, force)?;
        if released {
            log::info!("released body {:?} with speed {:.2}", id, force);
        }
        Ok(released)
    }

    /// Closest body hit by `ray`
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, body)| {
                ray.intersect_sphere(body.position, body.radius)
                    .map(|distance| PickHit {
                        body: BodyId(i),
                        distance,
                        point: ray.point_at(distance),
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Put every body back at `spawn` at rest.
    pub fn reset(&mut self, spawn: &[Vector3<f32>]) {
        for (body, position) in self.bodies.iter_mut().zip(spawn) {
            body.position = *position;
            body.velocity = Vector3::zero();
            body.state = BodyState::Free;
        }
    }
}

use cgmath::{Quaternion, Rad, Rotation, Rotation3, Vector3};

use crate::math::{local_forward, Pose};

/// Mouse-look camera mounted on the player rig.
///
/// Yaw turns about world +Y (positive turns left), pitch about the camera's
/// local X (positive looks up). The eye sits at the rig position.
#[derive(Debug, Clone, Copy)]
pub struct FirstPersonCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub bounds: FirstPersonCameraBounds,
}

impl FirstPersonCamera {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            yaw: 0.0,
            pitch: 0.0,
            bounds: FirstPersonCameraBounds::default(),
        };
        camera.set_yaw(yaw);
        camera.set_pitch(pitch);
        camera
    }

    pub fn reset_to_default(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        // Keep yaw bounded so long sessions do not lose precision.
        self.yaw = yaw.rem_euclid(std::f32::consts::TAU);
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Apply a raw mouse delta in pixels; moving the mouse right turns right.
    pub fn apply_look(&mut self, delta: (f32, f32), sensitivity: f32) {
        self.add_yaw(-delta.0 * sensitivity);
        self.add_pitch(-delta.1 * sensitivity);
    }

    pub fn orientation(&self) -> Quaternion<f32> {
        Quaternion::from_angle_y(Rad(self.yaw)) * Quaternion::from_angle_x(Rad(self.pitch))
    }

    pub fn facing(&self) -> Vector3<f32> {
        self.orientation().rotate_vector(local_forward())
    }

    /// Camera pose for an eye at `eye`
    pub fn pose(&self, eye: Vector3<f32>) -> Pose {
        Pose::new(eye, self.orientation())
    }
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FirstPersonCameraBounds {
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for FirstPersonCameraBounds {
    fn default() -> Self {
        // Stop short of straight up/down so the flattened forward never vanishes.
        let limit = std::f32::consts::FRAC_PI_2 - 0.01;
        Self {
            min_pitch: -limit,
            max_pitch: limit,
        }
    }
}

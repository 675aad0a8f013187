//! Small geometric helpers shared by the player and body code.

use cgmath::{InnerSpace, Quaternion, Rotation, Vector3, Zero};

use crate::error::{SimError, SimResult};

/// Lengths below this are treated as "no direction".
pub const DIRECTION_EPSILON: f32 = 1e-4;

/// World up axis. The scene is Y-up with the camera looking down -Z.
pub fn world_up() -> Vector3<f32> {
    Vector3::unit_y()
}

/// Camera-local forward axis.
pub fn local_forward() -> Vector3<f32> {
    -Vector3::unit_z()
}

/// Position plus orientation of something in the room
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub orientation: Quaternion<f32>,
}

impl Pose {
    pub fn new(position: Vector3<f32>, orientation: Quaternion<f32>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at `position` with the identity orientation (looking down -Z)
    pub fn at(position: Vector3<f32>) -> Self {
        Self::new(position, Quaternion::new(1.0, 0.0, 0.0, 0.0))
    }

    /// World-space direction the pose is looking along
    pub fn facing(&self) -> Vector3<f32> {
        self.orientation.rotate_vector(local_forward())
    }

    /// Transform a pose-local offset into world space
    pub fn transform_point(&self, local: Vector3<f32>) -> Vector3<f32> {
        self.position + self.orientation.rotate_vector(local)
    }
}

/// Normalise `v`, failing instead of producing NaN for near-zero vectors.
pub fn try_normalize(v: Vector3<f32>) -> SimResult<Vector3<f32>> {
    let len = v.magnitude();
    if len < DIRECTION_EPSILON || !len.is_finite() {
        return Err(SimError::DegenerateDirection {
            epsilon: DIRECTION_EPSILON,
        });
    }
    Ok(v / len)
}

/// Drop the vertical component of `facing` and renormalise.
pub fn flatten_forward(facing: Vector3<f32>) -> SimResult<Vector3<f32>> {
    try_normalize(Vector3::new(facing.x, 0.0, facing.z))
}

/// Strafe axis for a flattened forward vector: `up x forward`.
///
/// Independent of camera pitch because `forward` has already been flattened.
/// For forward = -Z this yields -X.
pub fn strafe_axis(forward: Vector3<f32>) -> SimResult<Vector3<f32>> {
    try_normalize(world_up().cross(forward))
}

/// Distance between two points ignoring the vertical axis
pub fn horizontal_distance(a: Vector3<f32>, b: Vector3<f32>) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// A ray for hit-testing bodies
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Build a ray; fails on a zero-length direction.
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> SimResult<Self> {
        Ok(Self {
            origin,
            direction: try_normalize(direction)?,
        })
    }

    /// Ray through the centre of the view of `pose`
    pub fn from_view(pose: &Pose) -> Self {
        // Rotating a unit vector by a unit quaternion keeps it unit length.
        Self {
            origin: pose.position,
            direction: pose.facing().normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Nearest non-negative distance at which the ray enters a sphere.
    ///
    /// A ray starting inside the sphere reports a hit at distance 0.
    pub fn intersect_sphere(&self, center: Vector3<f32>, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let c = oc.magnitude2() - radius * radius;
        if c <= 0.0 {
            return Some(0.0);
        }

        let b = oc.dot(self.direction);
        if b > 0.0 {
            // Outside and pointing away.
            return None;
        }

        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        Some(-b - disc.sqrt())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vector3::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Rotation3};

    #[test]
    fn test_flatten_forward_drops_pitch() {
        let f = flatten_forward(Vector3::new(0.0, -0.7, -0.7)).unwrap();
        assert!((f - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_flatten_forward_straight_down_is_degenerate() {
        let err = flatten_forward(Vector3::new(0.0, -1.0, 0.0)).unwrap_err();
        assert!(matches!(err, SimError::DegenerateDirection { .. }));
    }

    #[test]
    fn test_strafe_axis_is_stable_for_minus_z() {
        let forward = Vector3::new(0.0, 0.0, -1.0);
        for _ in 0..10 {
            let s = strafe_axis(forward).unwrap();
            assert!((s - Vector3::new(-1.0, 0.0, 0.0)).magnitude() < 1e-6);
        }
    }

    #[test]
    fn test_pose_facing_follows_yaw() {
        let pose = Pose::new(
            Vector3::zero(),
            Quaternion::from_angle_y(Deg(90.0)),
        );
        // Turning left (counter-clockwise seen from above) looks down -X.
        assert!((pose.facing() - Vector3::new(-1.0, 0.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_ray_sphere_hit_and_miss() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        let t = ray.intersect_sphere(Vector3::zero(), 0.5).unwrap();
        assert!((t - 4.5).abs() < 1e-5);

        let miss = Ray::new(Vector3::new(2.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(miss.intersect_sphere(Vector3::zero(), 0.5).is_none());

        let behind = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(behind.intersect_sphere(Vector3::zero(), 0.5).is_none());
    }

    #[test]
    fn test_ray_rejects_zero_direction() {
        assert!(Ray::new(Vector3::zero(), Vector3::zero()).is_err());
    }
}

//! Rectangular room the player and bodies are confined to

use cgmath::{Rad, Vector3};

/// Half-extents, wall height and floor height of an axis-aligned room
/// centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomBounds {
    pub half_extent_x: f32,
    pub half_extent_z: f32,
    pub wall_height: f32,
    pub floor_height: f32,
}

/// Placement of one wall panel for the render side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPanel {
    /// Centre of the panel (at half wall height)
    pub center: Vector3<f32>,
    /// Rotation about +Y so the panel faces into the room
    pub yaw: Rad<f32>,
    pub width: f32,
    pub height: f32,
}

impl RoomBounds {
    pub fn new(half_extent_x: f32, half_extent_z: f32, wall_height: f32, floor_height: f32) -> Self {
        Self {
            half_extent_x,
            half_extent_z,
            wall_height,
            floor_height,
        }
    }

    /// Square room `size` wide with the floor at y = 0
    pub fn square(size: f32, wall_height: f32) -> Self {
        Self::new(size / 2.0, size / 2.0, wall_height, 0.0)
    }

    /// Clamp the horizontal part of `position` so a circle of `radius` stays inside.
    pub fn clamp_horizontal(&self, position: Vector3<f32>, radius: f32) -> Vector3<f32> {
        let lx = (self.half_extent_x - radius).max(0.0);
        let lz = (self.half_extent_z - radius).max(0.0);
        Vector3::new(
            position.x.clamp(-lx, lx),
            position.y,
            position.z.clamp(-lz, lz),
        )
    }

    /// Whether (x, z) lies on the floor rectangle
    pub fn contains_horizontal(&self, x: f32, z: f32) -> bool {
        x.abs() <= self.half_extent_x && z.abs() <= self.half_extent_z
    }

    /// The four walls: far (-Z), near (+Z), left (-X), right (+X).
    pub fn wall_panels(&self) -> [WallPanel; 4] {
        use std::f32::consts::{FRAC_PI_2, PI};

        let y = self.floor_height + self.wall_height / 2.0;
        let (hx, hz) = (self.half_extent_x, self.half_extent_z);
        let panel = |center, yaw, width| WallPanel {
            center,
            yaw: Rad(yaw),
            width,
            height: self.wall_height,
        };

        [
            panel(Vector3::new(0.0, y, -hz), 0.0, hx * 2.0),
            panel(Vector3::new(0.0, y, hz), PI, hx * 2.0),
            panel(Vector3::new(-hx, y, 0.0), FRAC_PI_2, hz * 2.0),
            panel(Vector3::new(hx, y, 0.0), -FRAC_PI_2, hz * 2.0),
        ]
    }
}

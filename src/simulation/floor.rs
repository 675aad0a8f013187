//! Downward floor queries used by floor-follow movement
//!
//! The scene owns the real geometry; the controller only ever asks "what is
//! the floor height below this point". A miss means "airborne", not an error.

use cgmath::Vector3;

use super::room::RoomBounds;

/// Answers downward ray casts against walkable geometry
pub trait FloorProbe {
    /// Height of the first floor surface straight below `origin`, if one lies
    /// within `max_distance`.
    fn floor_height(&self, origin: Vector3<f32>, max_distance: f32) -> Option<f32>;
}

/// Flat rectangular floor at a fixed height
#[derive(Debug, Clone, Copy)]
pub struct FlatFloor {
    pub height: f32,
    pub half_extent_x: f32,
    pub half_extent_z: f32,
}

impl FlatFloor {
    pub fn new(height: f32, half_extent_x: f32, half_extent_z: f32) -> Self {
        Self {
            height,
            half_extent_x,
            half_extent_z,
        }
    }
}

impl From<&RoomBounds> for FlatFloor {
    fn from(room: &RoomBounds) -> Self {
        Self::new(room.floor_height, room.half_extent_x, room.half_extent_z)
    }
}

impl FloorProbe for FlatFloor {
    fn floor_height(&self, origin: Vector3<f32>, max_distance: f32) -> Option<f32> {
        if origin.x.abs() > self.half_extent_x || origin.z.abs() > self.half_extent_z {
            return None;
        }
        let drop = origin.y - self.height;
        (drop >= 0.0 && drop <= max_distance).then_some(self.height)
    }
}

/// No floor geometry at all, e.g. before the room model finished loading
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFloor;

impl FloorProbe for NoFloor {
    fn floor_height(&self, _origin: Vector3<f32>, _max_distance: f32) -> Option<f32> {
        None
    }
}

impl<F> FloorProbe for F
where
    F: Fn(Vector3<f32>, f32) -> Option<f32>,
{
    fn floor_height(&self, origin: Vector3<f32>, max_distance: f32) -> Option<f32> {
        self(origin, max_distance)
    }
}

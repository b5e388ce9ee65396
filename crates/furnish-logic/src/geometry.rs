//! Geometry primitives: room bounds, axis-aligned boxes, rotated footprints.
//!
//! Coordinates are meters. X runs along the room length, Y along its depth
//! and Z is height. Rotations are about the Z axis, in degrees.
//!
//! Box overlap uses open intervals: two boxes that share a face do not
//! intersect. Containment uses closed intervals.

use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};

/// One of the four vertical faces of a box or walls of a room.
///
/// `Front` faces the `y_min` wall, `Back` the `y_max` wall, `Left` the
/// `x_min` wall and `Right` the `x_max` wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
    Left,
    Right,
}

impl Side {
    /// All sides, in the order approach targets are tried.
    pub const ALL: [Side; 4] = [Side::Front, Side::Back, Side::Left, Side::Right];

    pub fn name(self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Outward unit normal in the floor plane.
    pub fn normal(self) -> (f32, f32) {
        match self {
            Side::Front => (0.0, -1.0),
            Side::Back => (0.0, 1.0),
            Side::Left => (-1.0, 0.0),
            Side::Right => (1.0, 0.0),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Axis-aligned box given by its min/max corner coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl Aabb {
    /// Box centered at (cx, cy, cz) with full extents (ex, ey, ez).
    pub fn from_center(cx: f32, cy: f32, cz: f32, ex: f32, ey: f32, ez: f32) -> Self {
        Self {
            x_min: cx - ex / 2.0,
            x_max: cx + ex / 2.0,
            y_min: cy - ey / 2.0,
            y_max: cy + ey / 2.0,
            z_min: cz - ez / 2.0,
            z_max: cz + ez / 2.0,
        }
    }

    /// Floor rectangle centered at (cx, cy) with extents (ex, ey), spanning
    /// exactly `z_min..=z_max` vertically.
    pub fn from_footprint(cx: f32, cy: f32, ex: f32, ey: f32, z_min: f32, z_max: f32) -> Self {
        Self {
            x_min: cx - ex / 2.0,
            x_max: cx + ex / 2.0,
            y_min: cy - ey / 2.0,
            y_max: cy + ey / 2.0,
            z_min,
            z_max,
        }
    }

    /// Strict overlap on all three axes. Touching faces do not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(self.x_max <= other.x_min
            || self.x_min >= other.x_max
            || self.y_max <= other.y_min
            || self.y_min >= other.y_max
            || self.z_max <= other.z_min
            || self.z_min >= other.z_max)
    }

    /// Whether `other` lies entirely inside this box (boundaries included).
    pub fn contains(&self, other: &Aabb) -> bool {
        other.x_min >= self.x_min
            && other.x_max <= self.x_max
            && other.y_min >= self.y_min
            && other.y_max <= self.y_max
            && other.z_min >= self.z_min
            && other.z_max <= self.z_max
    }

    /// Coordinate of the given vertical face.
    pub fn face(&self, side: Side) -> f32 {
        match side {
            Side::Front => self.y_min,
            Side::Back => self.y_max,
            Side::Left => self.x_min,
            Side::Right => self.x_max,
        }
    }

    pub fn center(&self) -> (f32, f32, f32) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
            (self.z_min + self.z_max) / 2.0,
        )
    }

    /// Floor-plane rectangle grown by `dx` on both X sides and `dy` on both
    /// Y sides, as (x_min, x_max, y_min, y_max).
    pub fn expanded_footprint(&self, dx: f32, dy: f32) -> (f32, f32, f32, f32) {
        (
            self.x_min - dx,
            self.x_max + dx,
            self.y_min - dy,
            self.y_max + dy,
        )
    }
}

/// Rectangular room volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl Room {
    /// Build a room, rejecting non-finite bounds and empty extents.
    pub fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32, z_min: f32, z_max: f32) -> Result<Self> {
        let room = Self {
            x_min,
            x_max,
            y_min,
            y_max,
            z_min,
            z_max,
        };
        room.validate()?;
        Ok(room)
    }

    /// Room with its floor corner at the origin.
    pub fn with_size(width: f32, depth: f32, height: f32) -> Result<Self> {
        Self::new(0.0, width, 0.0, depth, 0.0, height)
    }

    pub fn validate(&self) -> Result<()> {
        let bounds = [
            self.x_min, self.x_max, self.y_min, self.y_max, self.z_min, self.z_max,
        ];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(PlacementError::InvalidRoom(format!(
                "non-finite bounds {:?}",
                bounds
            )));
        }
        if self.width() <= 0.0 || self.depth() <= 0.0 || self.height() <= 0.0 {
            return Err(PlacementError::InvalidRoom(format!(
                "non-positive extents {}×{}×{}",
                self.width(),
                self.depth(),
                self.height()
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn depth(&self) -> f32 {
        self.y_max - self.y_min
    }

    pub fn height(&self) -> f32 {
        self.z_max - self.z_min
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            x_min: self.x_min,
            x_max: self.x_max,
            y_min: self.y_min,
            y_max: self.y_max,
            z_min: self.z_min,
            z_max: self.z_max,
        }
    }

    /// Coordinate of the wall on the given side.
    pub fn wall(&self, side: Side) -> f32 {
        self.aabb().face(side)
    }
}

/// Footprint extents (rx, ry) of an `sx`×`sy` rectangle rotated by
/// `angle_deg` about its center: the true AABB, not the unrotated size.
pub fn rotated_footprint(sx: f32, sy: f32, angle_deg: f32) -> (f32, f32) {
    let a = angle_deg.to_radians();
    let cos_a = a.cos().abs();
    let sin_a = a.sin().abs();
    (sx * cos_a + sy * sin_a, sx * sin_a + sy * cos_a)
}

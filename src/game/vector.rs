use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;

/// A position the simulation can place body segments, pickups and obstacles at.
///
/// Grid positions compare by exact cell equality, continuous positions by
/// Euclidean distance against a collision radius.
pub trait Point: Copy + PartialEq + fmt::Debug {
    /// The spawn point of a fresh session
    fn origin() -> Self;

    /// Euclidean distance between two points
    fn distance_to(&self, other: Self) -> f32;

    /// Whether `other` occupies the same space as `self` for body collisions
    fn overlaps(&self, other: Self, radius: f32) -> bool;

    /// Coordinates as floats, for bounds checks and rendering
    fn coords(&self) -> [f32; 3];

    /// A uniformly random point inside the arena
    fn random_in<R: Rng + ?Sized>(arena: &Arena, rng: &mut R) -> Self;
}

/// An integer grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridPos {
    pub const ZERO: GridPos = GridPos { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, rhs: GridPos) -> GridPos {
        self.moved_by(rhs.x, rhs.y, rhs.z)
    }
}

impl Point for GridPos {
    fn origin() -> Self {
        GridPos::ZERO
    }

    fn distance_to(&self, other: Self) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        let dz = (self.z - other.z) as f32;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    fn overlaps(&self, other: Self, _radius: f32) -> bool {
        *self == other
    }

    fn coords(&self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }

    fn random_in<R: Rng + ?Sized>(arena: &Arena, rng: &mut R) -> Self {
        // Cells on the wall itself are fatal, so spawn strictly inside
        let half = (arena.size / 2.0).ceil() as i32;
        let [ax, ay, az] = arena.spawn_axes();
        let mut cell = |active: bool| {
            if active && half > 1 {
                rng.gen_range(1 - half..half)
            } else {
                0
            }
        };
        GridPos::new(cell(ax), cell(ay), cell(az))
    }
}

/// A continuous position or velocity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction; the zero vector stays zero
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            *self * (1.0 / len)
        } else {
            Vec3::ZERO
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<GridPos> for Vec3 {
    fn from(p: GridPos) -> Self {
        Vec3::new(p.x as f32, p.y as f32, p.z as f32)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Vec3) {
        *self = *self - rhs;
    }
}

impl Point for Vec3 {
    fn origin() -> Self {
        Vec3::ZERO
    }

    fn distance_to(&self, other: Self) -> f32 {
        (*self - other).length()
    }

    fn overlaps(&self, other: Self, radius: f32) -> bool {
        self.distance_to(other) < radius
    }

    fn coords(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    fn random_in<R: Rng + ?Sized>(arena: &Arena, rng: &mut R) -> Self {
        let half = arena.half_extent();
        let [ax, ay, az] = arena.spawn_axes();
        let mut coord = |active: bool| {
            if active && half > 0.0 {
                rng.gen_range(-half..half)
            } else {
                0.0
            }
        };
        Vec3::new(coord(ax), coord(ay), coord(az))
    }
}

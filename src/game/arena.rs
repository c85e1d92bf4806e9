use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Smallest size that leaves a cell inside the walls
pub const MIN_SIZE: f32 = 3.0;
/// Largest size accepted from user input
pub const MAX_SIZE: f32 = 10_000.0;

/// Shape of the playing field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArenaShape {
    /// Flat square on the x/y plane, walls at `±S/2`
    Square,
    /// Cube with walls at `±S/2` on all three axes
    Cube,
    /// Open ground plane (x/z) with no walls; `size` only bounds where things spawn
    Plane,
}

/// Bounds of the playing field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub shape: ArenaShape,
    pub size: f32,
}

impl Arena {
    pub fn new(shape: ArenaShape, size: f32) -> Self {
        Self { shape, size }
    }

    /// Validate a size coming from outside the program
    pub fn check_size(size: f32) -> Result<f32> {
        ensure!(
            size.is_finite() && (MIN_SIZE..=MAX_SIZE).contains(&size),
            "arena size must be between {} and {}, got {}",
            MIN_SIZE,
            MAX_SIZE,
            size
        );
        Ok(size)
    }

    pub fn half_extent(&self) -> f32 {
        self.size / 2.0
    }

    /// Whether leaving the field is fatal
    pub fn is_walled(&self) -> bool {
        !matches!(self.shape, ArenaShape::Plane)
    }

    /// True when any coordinate reaches the wall at half the arena size
    pub fn is_outside(&self, coords: [f32; 3]) -> bool {
        if !self.is_walled() {
            return false;
        }
        let half = self.half_extent();
        coords.iter().any(|c| c.abs() >= half)
    }

    /// Axes along which spawned objects are spread
    pub fn spawn_axes(&self) -> [bool; 3] {
        match self.shape {
            ArenaShape::Square => [true, true, false],
            ArenaShape::Cube => [true, true, true],
            ArenaShape::Plane => [true, false, true],
        }
    }
}

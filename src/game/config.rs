use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::arena::{Arena, ArenaShape};
use super::collision::CollisionRadii;

/// How body positions are represented and advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementModel {
    /// Integer cells, one cell per tick
    Grid,
    /// Float positions driven by a damped velocity
    Continuous,
}

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub model: MovementModel,
    pub arena: Arena,
    /// Minimum time between two ticks, in milliseconds
    pub tick_interval_ms: u64,
    pub radii: CollisionRadii,

    // Free-roam movement
    /// Fraction of velocity lost per second
    pub damping_rate: f32,
    /// Acceleration while steering
    pub base_speed: f32,
    /// Acceleration while steering with a boost active
    pub boost_speed: f32,
    /// Minimum head travel before a tick records a new segment
    pub min_segment_spacing: f32,

    // Pickups and obstacles
    /// Whether a power-up is kept in the world
    pub power_ups: bool,
    /// Length of the speed boost, in seconds
    pub boost_duration: f32,
    /// Number of static obstacles placed at session start
    pub obstacle_count: usize,
    /// Obstacles never spawn closer than this to the origin
    pub obstacle_clearance: f32,

    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::cube()
    }
}

impl GameConfig {
    /// Flat 2D grid snake
    pub fn classic() -> Self {
        Self {
            model: MovementModel::Grid,
            arena: Arena::new(ArenaShape::Square, 20.0),
            tick_interval_ms: 100,
            radii: CollisionRadii::grid(),
            damping_rate: 0.0,
            base_speed: 0.0,
            boost_speed: 0.0,
            min_segment_spacing: 0.0,
            power_ups: false,
            boost_duration: 5.0,
            obstacle_count: 0,
            obstacle_clearance: 0.0,
            seed: None,
        }
    }

    /// Grid snake inside a cube
    pub fn cube() -> Self {
        Self {
            arena: Arena::new(ArenaShape::Cube, 20.0),
            tick_interval_ms: 200,
            ..Self::classic()
        }
    }

    /// Free-roaming snake on an open plane
    pub fn free_roam() -> Self {
        Self {
            model: MovementModel::Continuous,
            arena: Arena::new(ArenaShape::Plane, 200.0),
            tick_interval_ms: 100,
            radii: CollisionRadii {
                body: 1.0,
                neck: 3,
                obstacle: 3.0,
                food: 2.0,
                power_up: 2.0,
            },
            damping_rate: 10.0,
            base_speed: 400.0,
            boost_speed: 800.0,
            min_segment_spacing: 0.5,
            power_ups: true,
            boost_duration: 5.0,
            obstacle_count: 0,
            obstacle_clearance: 10.0,
            seed: None,
        }
    }

    /// Free-roaming snake with obstacles scattered around
    pub fn obstacles() -> Self {
        Self {
            obstacle_count: 25,
            ..Self::free_roam()
        }
    }

    /// Same preset with a different arena size
    pub fn with_size(mut self, size: f32) -> Self {
        self.arena.size = size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

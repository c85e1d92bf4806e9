//! Movement models
//!
//! The grid model steps one cell per tick along an axis direction. The
//! free-roam model integrates a damped velocity every frame; ticks only
//! record where the head has got to.

use std::fmt;

use super::action::Direction;
use super::arena::ArenaShape;
use super::config::GameConfig;
use super::vector::{GridPos, Point, Vec3};

/// How the head moves between ticks
pub trait Motion {
    type Point: Point;
    /// Steering input as handed over by the view
    type Input: Copy + fmt::Debug;

    /// Whether steering is held across frames rather than applied once per key press
    const HELD_STEERING: bool;

    fn from_config(config: &GameConfig) -> Self;

    /// Return to the start of a session with the head at `origin`
    fn reset(&mut self, origin: Self::Point);

    /// Apply steering input; returns false when the input was ignored
    fn request(&mut self, input: Self::Input) -> bool;

    /// Convert a unit axis vector coming from the input layer
    fn input_from(vector: GridPos) -> Self::Input;

    /// Per-frame update with `dt` in seconds
    fn advance(&mut self, dt: f32, boosted: bool);

    /// Where the head would be recorded if a tick ran now
    fn candidate(&self, head: Self::Point) -> Self::Point;

    /// Whether `candidate` is far enough from `head` to record a new segment
    fn moved_enough(&self, head: Self::Point, candidate: Self::Point) -> bool;
}

/// One cell per tick along an axis direction
#[derive(Debug, Clone)]
pub struct GridMotion {
    direction: Direction,
    planar: bool,
}

impl GridMotion {
    pub fn new(planar: bool) -> Self {
        Self {
            direction: Direction::Right,
            planar,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Motion for GridMotion {
    type Point = GridPos;
    type Input = GridPos;

    const HELD_STEERING: bool = false;

    fn from_config(config: &GameConfig) -> Self {
        Self::new(config.arena.shape != ArenaShape::Cube)
    }

    fn reset(&mut self, _origin: GridPos) {
        self.direction = Direction::Right;
    }

    fn request(&mut self, input: GridPos) -> bool {
        let Some(direction) = Direction::from_vector(input) else {
            return false;
        };
        if self.planar && !direction.is_planar() {
            return false;
        }
        // Prevent 180° turns into the neck
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    fn input_from(vector: GridPos) -> GridPos {
        vector
    }

    fn advance(&mut self, _dt: f32, _boosted: bool) {}

    fn candidate(&self, head: GridPos) -> GridPos {
        head + self.direction.delta()
    }

    fn moved_enough(&self, _head: GridPos, _candidate: GridPos) -> bool {
        true
    }
}

/// Velocity-integrated movement with exponential damping
#[derive(Debug, Clone)]
pub struct FreeMotion {
    position: Vec3,
    velocity: Vec3,
    input: Vec3,
    damping_rate: f32,
    base_speed: f32,
    boost_speed: f32,
    min_segment_spacing: f32,
}

impl FreeMotion {
    pub fn new(damping_rate: f32, base_speed: f32, boost_speed: f32, min_segment_spacing: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            input: Vec3::ZERO,
            damping_rate,
            base_speed,
            boost_speed,
            min_segment_spacing,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn input(&self) -> Vec3 {
        self.input
    }
}

impl Motion for FreeMotion {
    type Point = Vec3;
    type Input = Vec3;

    const HELD_STEERING: bool = true;

    fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.damping_rate,
            config.base_speed,
            config.boost_speed,
            config.min_segment_spacing,
        )
    }

    fn reset(&mut self, origin: Vec3) {
        self.position = origin;
        self.velocity = Vec3::ZERO;
        self.input = Vec3::ZERO;
    }

    fn request(&mut self, input: Vec3) -> bool {
        if !input.is_finite() {
            return false;
        }
        self.input = input;
        true
    }

    fn input_from(vector: GridPos) -> Vec3 {
        Vec3::from(vector)
    }

    fn advance(&mut self, dt: f32, boosted: bool) {
        self.velocity -= self.velocity * (self.damping_rate * dt);

        let direction = self.input.normalized();
        if direction != Vec3::ZERO {
            let speed = if boosted {
                self.boost_speed
            } else {
                self.base_speed
            };
            self.velocity += direction * (speed * dt);
        }

        self.position += self.velocity * dt;
    }

    fn candidate(&self, _head: Vec3) -> Vec3 {
        self.position
    }

    fn moved_enough(&self, head: Vec3, candidate: Vec3) -> bool {
        head.distance_to(candidate) >= self.min_segment_spacing
    }
}

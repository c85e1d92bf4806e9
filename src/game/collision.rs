//! Collision evaluation for a candidate head position
//!
//! The evaluator is a pure function: it classifies one tick and leaves every
//! mutation to the session.

use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::body::Body;
use super::pickup::{PickupKind, Pickups};
use super::vector::Point;

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionType {
    /// Snake left the arena
    Wall,
    /// Snake hit a static obstacle
    Obstacle,
    /// Snake hit itself
    SelfCollision,
}

/// Classification of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Continue,
    Consumed(PickupKind),
    Fatal(CollisionType),
}

impl Outcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Outcome::Fatal(_))
    }
}

/// Collision thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionRadii {
    /// Thickness of the body for self-collision (ignored on the grid)
    pub body: f32,
    /// Number of leading segments skipped by the self-collision check (at least the head)
    pub neck: usize,
    pub obstacle: f32,
    pub food: f32,
    pub power_up: f32,
}

impl CollisionRadii {
    /// Thresholds for unit grid cells
    pub fn grid() -> Self {
        Self {
            body: 0.0,
            neck: 1,
            obstacle: 1.0,
            food: 1.0,
            power_up: 1.0,
        }
    }
}

/// Everything in the world besides the snake
#[derive(Debug, Clone, Copy)]
pub struct Field<'a, P> {
    pub arena: &'a Arena,
    pub obstacles: &'a [P],
    pub pickups: &'a Pickups<P>,
}

/// Classify the tick that would move the head to `candidate`
///
/// Checks run in a fixed order and the first match wins: walls, obstacles,
/// the body, food, then the power-up.
pub fn evaluate<P: Point>(
    candidate: P,
    body: &Body<P>,
    field: &Field<'_, P>,
    radii: &CollisionRadii,
) -> Outcome {
    if field.arena.is_outside(candidate.coords()) {
        return Outcome::Fatal(CollisionType::Wall);
    }

    if field
        .obstacles
        .iter()
        .any(|obstacle| candidate.distance_to(*obstacle) < radii.obstacle)
    {
        return Outcome::Fatal(CollisionType::Obstacle);
    }

    if body.contains_from(candidate, radii.body, radii.neck.max(1)) {
        return Outcome::Fatal(CollisionType::SelfCollision);
    }

    if candidate.distance_to(field.pickups.food.position) < radii.food {
        return Outcome::Consumed(PickupKind::Food);
    }

    match field.pickups.power_up {
        Some(power_up) if candidate.distance_to(power_up.position) < radii.power_up => {
            Outcome::Consumed(PickupKind::PowerUp)
        }
        _ => Outcome::Continue,
    }
}

//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A [`Session`] owns the world and is advanced by per-frame calls; presentation
//! happens through the [`WorldView`] collaborator.

pub mod action;
pub mod arena;
pub mod body;
pub mod collision;
pub mod config;
pub mod motion;
pub mod pickup;
pub mod scheduler;
pub mod score;
pub mod session;
pub mod store;
pub mod vector;

// Re-export commonly used types
pub use action::{Axis, Direction};
pub use arena::{Arena, ArenaShape};
pub use body::Body;
pub use collision::{CollisionRadii, CollisionType, Field, Outcome, evaluate};
pub use config::{GameConfig, MovementModel};
pub use motion::{FreeMotion, GridMotion, Motion};
pub use pickup::{Pickup, PickupKind, Pickups};
pub use scheduler::StepScheduler;
pub use score::{Boost, ScoreBoard};
pub use session::{FreeRoamSession, GridSession, NullView, Phase, Session, WorldView};
pub use store::{HIGH_SCORE_KEY, HighScoreStore, JsonFileStore, MemoryStore};
pub use vector::{GridPos, Point, Vec3};

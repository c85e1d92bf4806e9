//! Seg Snake - segmented-body snake on a grid or in free roam
//!
//! This library provides:
//! - Headless simulation: movement models, collision evaluation, scoring (game module)
//! - Keyboard mapping and held-key steering (input module)
//! - TUI rendering (render module)
//! - Per-process play statistics (metrics module)
//! - Interactive terminal play (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;

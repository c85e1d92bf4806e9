use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::time::Duration;

use crate::game::{ArenaShape, Direction, GridPos};

/// Key layout, chosen by the kind of arena being played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    /// Arrows or WASD on the x/y plane
    Planar,
    /// Arrows on the x/y plane, Q/A in and out of the screen
    Spatial,
    /// Arrows or WASD across the ground plane; up is forward
    Steering,
}

impl Controls {
    pub fn for_arena(shape: ArenaShape) -> Self {
        match shape {
            ArenaShape::Square => Controls::Planar,
            ArenaShape::Cube => Controls::Spatial,
            ArenaShape::Plane => Controls::Steering,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    Start,
    Restart,
    Quit,
    None,
}

pub struct InputHandler {
    controls: Controls,
}

impl InputHandler {
    pub fn new(controls: Controls) -> Self {
        Self { controls }
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Char(' ') | KeyCode::Enter => return KeyAction::Start,
            KeyCode::Char('r') | KeyCode::Char('R') => return KeyAction::Restart,
            _ => {}
        }

        let direction = match self.controls {
            Controls::Planar => Self::planar(key.code),
            Controls::Spatial => Self::spatial(key.code),
            Controls::Steering => Self::steering(key.code),
        };
        if let Some(direction) = direction {
            return KeyAction::Move(direction);
        }

        match key.code {
            // Q steers in the cube
            KeyCode::Char('q') | KeyCode::Char('Q') if self.controls != Controls::Spatial => {
                KeyAction::Quit
            }
            _ => KeyAction::None,
        }
    }

    fn planar(code: KeyCode) -> Option<Direction> {
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
            _ => None,
        }
    }

    fn spatial(code: KeyCode) -> Option<Direction> {
        match code {
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Direction::Forward),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Back),
            _ => None,
        }
    }

    fn steering(code: KeyCode) -> Option<Direction> {
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Forward),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Back),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Steering keys currently held down
///
/// Most terminals only report presses (and auto-repeat), so a key counts as
/// held for `hold` after its last press unless a release arrives first.
#[derive(Debug, Clone)]
pub struct HeldKeys {
    hold: Duration,
    pressed: HashMap<Direction, Duration>,
}

impl HeldKeys {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            pressed: HashMap::new(),
        }
    }

    pub fn press(&mut self, direction: Direction, now: Duration) {
        self.pressed.insert(direction, now);
    }

    pub fn release(&mut self, direction: Direction) {
        self.pressed.remove(&direction);
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Sum of the held directions; opposite keys cancel out
    pub fn vector(&mut self, now: Duration) -> GridPos {
        let hold = self.hold;
        self.pressed
            .retain(|_, pressed_at| now.saturating_sub(*pressed_at) <= hold);
        self.pressed
            .keys()
            .fold(GridPos::ZERO, |acc, direction| acc + direction.delta())
    }
}

impl Default for HeldKeys {
    fn default() -> Self {
        Self::new(Duration::from_millis(150))
    }
}

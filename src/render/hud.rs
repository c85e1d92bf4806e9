use crate::game::{Body, CollisionType, Outcome, PickupKind, Pickups, Point, WorldView};

/// Ticks a status message stays on screen
const MESSAGE_TICKS: u32 = 12;

/// On-screen text kept up to date from tick results
#[derive(Debug, Clone, Default)]
pub struct Hud {
    pub score_text: String,
    pub message: Option<String>,
    pub final_score: Option<u32>,
    pub crash: Option<CollisionType>,
    pub ticks: u64,
    pub length: usize,
    message_ticks: u32,
}

impl Hud {
    pub fn new() -> Self {
        Self {
            score_text: "Score: 0".to_string(),
            ..Default::default()
        }
    }

    /// Clear everything for a new session
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn show(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.message_ticks = MESSAGE_TICKS;
    }

    pub fn describe_crash(kind: CollisionType) -> &'static str {
        match kind {
            CollisionType::Wall => "Hit the wall",
            CollisionType::Obstacle => "Hit an obstacle",
            CollisionType::SelfCollision => "Bit your own tail",
        }
    }
}

impl<P: Point> WorldView<P> for Hud {
    fn on_tick_result(&mut self, outcome: Outcome, body: &Body<P>, _pickups: &Pickups<P>, score: u32) {
        self.ticks += 1;
        self.length = body.len();
        self.score_text = format!("Score: {}", score);

        if self.message_ticks > 0 {
            self.message_ticks -= 1;
            if self.message_ticks == 0 {
                self.message = None;
            }
        }

        match outcome {
            Outcome::Continue => {}
            Outcome::Consumed(PickupKind::Food) => self.show("+1"),
            Outcome::Consumed(PickupKind::PowerUp) => self.show("Speed boost!"),
            Outcome::Fatal(kind) => {
                self.crash = Some(kind);
                self.show(Self::describe_crash(kind));
            }
        }
    }

    fn on_session_end(&mut self, final_score: u32) {
        self.final_score = Some(final_score);
    }
}

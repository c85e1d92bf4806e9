/// Score of the running session and the best score seen so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    pub score: u32,
    pub high_score: u32,
}

impl ScoreBoard {
    pub fn new(high_score: u32) -> Self {
        Self {
            score: 0,
            high_score,
        }
    }

    /// Start a new session, keeping the high score
    pub fn reset(&mut self) {
        self.score = 0;
    }

    pub fn record_food(&mut self) {
        self.score += 1;
    }

    /// Fold the final score into the high score; returns true if it improved
    pub fn finalize(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}

/// Timed speed boost granted by a power-up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Boost {
    pub active: bool,
    /// Seconds left
    pub remaining: f32,
}

impl Boost {
    pub fn activate(&mut self, duration: f32) {
        self.active = true;
        self.remaining = duration;
    }

    /// Count down by `dt` seconds, clearing the boost once it runs out
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.active = false;
            self.remaining = 0.0;
        }
    }

    pub fn clear(&mut self) {
        *self = Boost::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_score_is_monotonic() {
        let mut board = ScoreBoard::new(3);

        for _ in 0..5 {
            board.record_food();
        }
        assert!(board.finalize());
        assert_eq!(board.high_score, 5);

        board.reset();
        board.record_food();
        assert!(!board.finalize());
        assert_eq!(board.high_score, 5);
        assert_eq!(board.score, 1);
    }

    #[test]
    fn test_boost_countdown() {
        let mut boost = Boost::default();
        boost.activate(5.0);
        assert!(boost.active);
        assert_eq!(boost.remaining, 5.0);

        boost.update(2.5);
        assert!(boost.active);
        assert_eq!(boost.remaining, 2.5);

        boost.update(2.5);
        assert!(!boost.active);
        assert_eq!(boost.remaining, 0.0);
    }

    #[test]
    fn test_inactive_boost_ignores_updates() {
        let mut boost = Boost::default();
        boost.update(1.0);
        assert_eq!(boost, Boost::default());
    }
}

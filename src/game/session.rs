//! A single game session and its state machine
//!
//! A session goes `NotStarted -> Running -> GameOver`, and `restart` takes it
//! from `GameOver` back to `Running`. All world state lives here and is only
//! mutated during a tick or when a session (re)starts; views read it through
//! the accessors and the [`WorldView`] callbacks.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::action::Direction;
use super::body::Body;
use super::collision::{CollisionType, Field, Outcome, evaluate};
use super::config::GameConfig;
use super::motion::{FreeMotion, GridMotion, Motion};
use super::pickup::{Pickup, PickupKind, Pickups};
use super::scheduler::StepScheduler;
use super::score::{Boost, ScoreBoard};
use super::store::HighScoreStore;
use super::vector::{GridPos, Point, Vec3};

/// Attempts at placing one obstacle outside the spawn clearance
const OBSTACLE_ATTEMPTS: usize = 32;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    NotStarted,
    Running,
    GameOver,
}

/// Presentation collaborator notified of tick results
pub trait WorldView<P> {
    /// Called once per tick, after the world has been updated
    fn on_tick_result(&mut self, outcome: Outcome, body: &Body<P>, pickups: &Pickups<P>, score: u32);

    /// Called once when a fatal collision ends the session
    fn on_session_end(&mut self, final_score: u32);
}

/// A view that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl<P> WorldView<P> for NullView {
    fn on_tick_result(&mut self, _outcome: Outcome, _body: &Body<P>, _pickups: &Pickups<P>, _score: u32) {}

    fn on_session_end(&mut self, _final_score: u32) {}
}

pub type GridSession = Session<GridMotion>;
pub type FreeRoamSession = Session<FreeMotion>;

/// Game state for one player, driven by frame callbacks
pub struct Session<M: Motion> {
    config: GameConfig,
    motion: M,
    body: Body<M::Point>,
    pickups: Pickups<M::Point>,
    obstacles: Vec<M::Point>,
    board: ScoreBoard,
    boost: Boost,
    phase: Phase,
    scheduler: StepScheduler,
    steps: u32,
    last_outcome: Option<Outcome>,
    rng: StdRng,
    store: Box<dyn HighScoreStore>,
}

impl<M: Motion> Session<M> {
    /// Create a session in the `NotStarted` phase
    ///
    /// The high score is read from `store`; an unreadable store counts as no
    /// prior high score.
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Self {
        let high_score = match store.load() {
            Ok(value) => value.unwrap_or(0),
            Err(err) => {
                warn!(error = %err, "high score store unavailable, starting from zero");
                0
            }
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let origin = M::Point::origin();
        let mut session = Self {
            motion: M::from_config(&config),
            body: Body::new(origin),
            pickups: Pickups::new(origin),
            obstacles: Vec::new(),
            board: ScoreBoard::new(high_score),
            boost: Boost::default(),
            phase: Phase::NotStarted,
            scheduler: StepScheduler::new(config.tick_interval()),
            steps: 0,
            last_outcome: None,
            rng,
            store,
            config,
        };
        session.init(Duration::ZERO);
        session
    }

    /// `NotStarted -> Running`; ignored in any other phase
    pub fn start(&mut self, now: Duration) -> bool {
        if self.phase != Phase::NotStarted {
            debug!(phase = ?self.phase, "start ignored");
            return false;
        }
        self.init(now);
        self.phase = Phase::Running;
        info!(high_score = self.board.high_score, "session started");
        true
    }

    /// `GameOver -> Running` with a fresh world; ignored in any other phase
    pub fn restart(&mut self, now: Duration) -> bool {
        if self.phase != Phase::GameOver {
            debug!(phase = ?self.phase, "restart ignored");
            return false;
        }
        self.init(now);
        self.phase = Phase::Running;
        info!(high_score = self.board.high_score, "session restarted");
        true
    }

    /// Steering input from the view; returns false when it was ignored
    pub fn request_direction_change(&mut self, input: M::Input) -> bool {
        if self.phase == Phase::GameOver {
            return false;
        }
        let accepted = self.motion.request(input);
        if !accepted {
            debug!(?input, "direction change rejected");
        }
        accepted
    }

    /// Per-frame entry point
    ///
    /// `now` is the host's frame timestamp and `dt` the seconds since the
    /// previous frame. Continuous movement and the boost timer advance on
    /// every frame; a tick runs only when the scheduler says one is due.
    pub fn frame<V>(&mut self, now: Duration, dt: f32, view: &mut V) -> Option<Outcome>
    where
        V: WorldView<M::Point> + ?Sized,
    {
        if self.phase != Phase::Running {
            return None;
        }

        self.boost.update(dt);
        self.motion.advance(dt, self.boost.active);

        if self.scheduler.poll(now) {
            self.tick(view)
        } else {
            None
        }
    }

    /// Run one discrete step immediately; `None` unless running
    pub fn tick<V>(&mut self, view: &mut V) -> Option<Outcome>
    where
        V: WorldView<M::Point> + ?Sized,
    {
        if self.phase != Phase::Running {
            return None;
        }

        let head = self.body.head();
        let candidate = self.motion.candidate(head);
        let field = Field {
            arena: &self.config.arena,
            obstacles: &self.obstacles,
            pickups: &self.pickups,
        };
        let outcome = evaluate(candidate, &self.body, &field, &self.config.radii);

        match outcome {
            Outcome::Fatal(_) => {
                self.phase = Phase::GameOver;
            }
            Outcome::Consumed(PickupKind::Food) => {
                self.body.prepend(candidate);
                self.board.record_food();
                self.pickups.food = self.spawn_pickup(PickupKind::Food);
            }
            Outcome::Consumed(PickupKind::PowerUp) => {
                self.body.prepend(candidate);
                self.body.truncate_tail();
                self.boost.activate(self.config.boost_duration);
                self.pickups.power_up = Some(self.spawn_pickup(PickupKind::PowerUp));
            }
            Outcome::Continue => {
                if self.motion.moved_enough(head, candidate) {
                    self.body.prepend(candidate);
                    self.body.truncate_tail();
                }
            }
        }

        self.steps += 1;
        self.last_outcome = Some(outcome);
        debug!(
            ?outcome,
            length = self.body.len(),
            score = self.board.score,
            "tick"
        );

        view.on_tick_result(outcome, &self.body, &self.pickups, self.board.score);
        if let Outcome::Fatal(reason) = outcome {
            self.finish(reason, view);
        }

        Some(outcome)
    }

    fn finish<V>(&mut self, reason: CollisionType, view: &mut V)
    where
        V: WorldView<M::Point> + ?Sized,
    {
        let final_score = self.board.score;
        info!(score = final_score, ?reason, steps = self.steps, "game over");

        if self.board.finalize() {
            info!(high_score = self.board.high_score, "new high score");
            if let Err(err) = self.store.save(self.board.high_score) {
                warn!(error = %err, "failed to persist high score");
            }
        }

        view.on_session_end(final_score);
    }

    /// Reset body, pickups, obstacles, score and timers
    fn init(&mut self, now: Duration) {
        let origin = M::Point::origin();
        self.motion.reset(origin);
        self.body = Body::new(origin);
        self.obstacles = self.spawn_obstacles(origin);
        self.pickups = Pickups {
            food: self.spawn_pickup(PickupKind::Food),
            power_up: None,
        };
        if self.config.power_ups {
            self.pickups.power_up = Some(self.spawn_pickup(PickupKind::PowerUp));
        }
        self.board.reset();
        self.boost.clear();
        self.scheduler.reset(now);
        self.steps = 0;
        self.last_outcome = None;
    }

    fn spawn_pickup(&mut self, kind: PickupKind) -> Pickup<M::Point> {
        let body = &self.body;
        let obstacles = &self.obstacles;
        let radii = self.config.radii;
        let body_clearance = radii.body + radii.food;
        let obstacle_clearance = radii.obstacle + radii.food;
        Pickup::spawn(kind, &self.config.arena, &mut self.rng, |p| {
            body.iter().any(|segment| segment.overlaps(p, body_clearance))
                || obstacles.iter().any(|o| o.distance_to(p) < obstacle_clearance)
        })
    }

    fn spawn_obstacles(&mut self, origin: M::Point) -> Vec<M::Point> {
        let clearance = self.config.obstacle_clearance;
        let mut obstacles = Vec::with_capacity(self.config.obstacle_count);
        for _ in 0..self.config.obstacle_count {
            let mut position = M::Point::random_in(&self.config.arena, &mut self.rng);
            for _ in 1..OBSTACLE_ATTEMPTS {
                if position.distance_to(origin) >= clearance {
                    break;
                }
                position = M::Point::random_in(&self.config.arena, &mut self.rng);
            }
            if position.distance_to(origin) >= clearance {
                obstacles.push(position);
            }
        }
        obstacles
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn body(&self) -> &Body<M::Point> {
        &self.body
    }

    pub fn pickups(&self) -> &Pickups<M::Point> {
        &self.pickups
    }

    pub fn obstacles(&self) -> &[M::Point] {
        &self.obstacles
    }

    pub fn score(&self) -> u32 {
        self.board.score
    }

    pub fn high_score(&self) -> u32 {
        self.board.high_score
    }

    pub fn boost(&self) -> &Boost {
        &self.boost
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }
}

impl Session<GridMotion> {
    pub fn direction(&self) -> Direction {
        self.motion.direction()
    }

    /// Steer along an axis direction
    pub fn steer(&mut self, direction: Direction) -> bool {
        self.request_direction_change(direction.delta())
    }

    /// Where the head will move on the next tick
    pub fn next_head(&self) -> GridPos {
        self.motion.candidate(self.body.head())
    }
}

impl Session<FreeMotion> {
    pub fn position(&self) -> Vec3 {
        self.motion.position()
    }

    pub fn velocity(&self) -> Vec3 {
        self.motion.velocity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::store::MemoryStore;
    use anyhow::{Result, anyhow};

    #[derive(Default)]
    struct RecordingView {
        outcomes: Vec<Outcome>,
        lengths: Vec<usize>,
        ended: Vec<u32>,
    }

    impl<P: Point> WorldView<P> for RecordingView {
        fn on_tick_result(&mut self, outcome: Outcome, body: &Body<P>, _pickups: &Pickups<P>, _score: u32) {
            self.outcomes.push(outcome);
            self.lengths.push(body.len());
        }

        fn on_session_end(&mut self, final_score: u32) {
            self.ended.push(final_score);
        }
    }

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load(&self) -> Result<Option<u32>> {
            Err(anyhow!("storage disabled"))
        }

        fn save(&mut self, _high_score: u32) -> Result<()> {
            Err(anyhow!("storage disabled"))
        }
    }

    fn grid_session() -> GridSession {
        let mut session = Session::new(GameConfig::cube().with_seed(1), Box::new(MemoryStore::new()));
        assert!(session.start(Duration::ZERO));
        // Keep pickups out of the way unless a test places them
        session.pickups = Pickups::new(GridPos::new(-9, -9, -9));
        session
    }

    fn free_session() -> FreeRoamSession {
        let mut session = Session::new(GameConfig::free_roam().with_seed(1), Box::new(MemoryStore::new()));
        assert!(session.start(Duration::ZERO));
        session.pickups =
            Pickups::new(Vec3::new(90.0, 0.0, 90.0)).with_power_up(Vec3::new(-90.0, 0.0, -90.0));
        session
    }

    #[test]
    fn test_new_session_is_not_started() {
        let mut session: GridSession = Session::new(GameConfig::cube(), Box::new(MemoryStore::new()));
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.body().len(), 1);
        assert_eq!(session.tick(&mut NullView), None);
        assert_eq!(session.frame(Duration::from_secs(1), 1.0, &mut NullView), None);
    }

    #[test]
    fn test_continue_keeps_length() {
        let mut session = grid_session();
        session.body = Body::from_segments([GridPos::new(0, 0, 0), GridPos::new(-1, 0, 0)]).unwrap();

        let outcome = session.tick(&mut NullView);

        assert_eq!(outcome, Some(Outcome::Continue));
        assert_eq!(session.body().len(), 2);
        assert_eq!(session.body().head(), GridPos::new(1, 0, 0));
        assert_eq!(session.body().tail(), GridPos::new(0, 0, 0));
        assert_eq!(session.steps(), 1);
    }

    #[test]
    fn test_food_grows_body_and_scores() {
        let mut session = grid_session();
        session.pickups.food.position = GridPos::new(1, 0, 0);

        let outcome = session.tick(&mut NullView);

        assert_eq!(outcome, Some(Outcome::Consumed(PickupKind::Food)));
        let segments: Vec<_> = session.body().iter().copied().collect();
        assert_eq!(segments, vec![GridPos::new(1, 0, 0), GridPos::new(0, 0, 0)]);
        assert_eq!(session.score(), 1);
        assert_ne!(session.pickups().food.position, GridPos::new(1, 0, 0));
    }

    #[test]
    fn test_power_up_keeps_length_and_boosts() {
        let mut session = grid_session();
        session.body = Body::from_segments([GridPos::new(0, 0, 0), GridPos::new(-1, 0, 0)]).unwrap();
        session.pickups = session.pickups.clone().with_power_up(GridPos::new(1, 0, 0));

        let outcome = session.tick(&mut NullView);

        assert_eq!(outcome, Some(Outcome::Consumed(PickupKind::PowerUp)));
        assert_eq!(session.body().len(), 2);
        assert!(session.boost().active);
        assert_eq!(session.boost().remaining, 5.0);
        assert_eq!(session.score(), 0);
        assert!(session.pickups().power_up.is_some());
    }

    #[test]
    fn test_wall_is_fatal_and_leaves_body_untouched() {
        let mut session = grid_session();
        session.body = Body::from_segments([GridPos::new(9, 0, 0), GridPos::new(8, 0, 0)]).unwrap();
        let before = session.body().clone();
        let mut view = RecordingView::default();

        let outcome = session.tick(&mut view);

        assert_eq!(outcome, Some(Outcome::Fatal(CollisionType::Wall)));
        assert_eq!(session.body(), &before);
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(view.outcomes, vec![Outcome::Fatal(CollisionType::Wall)]);
        assert_eq!(view.ended, vec![0]);

        // No further ticks once the game is over
        assert_eq!(session.tick(&mut view), None);
        assert_eq!(view.outcomes.len(), 1);
    }

    #[test]
    fn test_self_collision() {
        let mut session = grid_session();
        // Head at (0,0,0) moving Right; a body segment occupies (1,0,0)
        session.body = Body::from_segments([
            GridPos::new(0, 0, 0),
            GridPos::new(0, 1, 0),
            GridPos::new(1, 1, 0),
            GridPos::new(1, 0, 0),
            GridPos::new(1, -1, 0),
        ])
        .unwrap();
        let before = session.body().clone();

        let outcome = session.tick(&mut NullView);

        assert_eq!(outcome, Some(Outcome::Fatal(CollisionType::SelfCollision)));
        assert_eq!(session.body(), &before);
    }

    #[test]
    fn test_reversal_is_rejected() {
        let mut session = grid_session();
        assert_eq!(session.direction(), Direction::Right);

        assert!(!session.request_direction_change(GridPos::new(-1, 0, 0)));
        assert_eq!(session.direction(), Direction::Right);

        assert!(session.request_direction_change(GridPos::new(0, 1, 0)));
        assert_eq!(session.direction(), Direction::Up);
        assert_eq!(session.next_head(), GridPos::new(0, 1, 0));
    }

    #[test]
    fn test_quick_turns_within_one_tick() {
        let mut session = grid_session();

        assert!(session.request_direction_change(GridPos::new(0, 1, 0)));
        assert!(!session.request_direction_change(GridPos::new(0, -1, 0)));
        assert_eq!(session.direction(), Direction::Up);

        assert!(session.request_direction_change(GridPos::new(-1, 0, 0)));
        assert_eq!(session.direction(), Direction::Left);
        assert_eq!(session.next_head(), GridPos::new(-1, 0, 0));
    }

    #[test]
    fn test_malformed_direction_is_ignored() {
        let mut session = grid_session();
        assert!(!session.request_direction_change(GridPos::new(0, 2, 0)));
        assert_eq!(session.direction(), Direction::Right);
    }

    #[test]
    fn test_steering_after_game_over_is_ignored() {
        let mut session = grid_session();
        session.phase = Phase::GameOver;
        assert!(!session.steer(Direction::Up));
    }

    #[test]
    fn test_scheduler_gates_ticks() {
        let mut session = grid_session();
        let mut view = RecordingView::default();

        assert_eq!(session.frame(Duration::from_millis(100), 0.1, &mut view), None);
        assert_eq!(session.frame(Duration::from_millis(200), 0.1, &mut view), None);
        assert_eq!(
            session.frame(Duration::from_millis(216), 0.016, &mut view),
            Some(Outcome::Continue)
        );
        // Far past several intervals: still one tick
        assert_eq!(
            session.frame(Duration::from_millis(2000), 1.784, &mut view),
            Some(Outcome::Continue)
        );
        assert_eq!(session.frame(Duration::from_millis(2016), 0.016, &mut view), None);
        assert_eq!(view.outcomes.len(), 2);
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut session = grid_session();
        assert!(!session.start(Duration::ZERO));
        assert!(!session.restart(Duration::ZERO));

        session.body = Body::new(GridPos::new(9, 0, 0));
        session.tick(&mut NullView);
        assert_eq!(session.phase(), Phase::GameOver);
        assert!(!session.start(Duration::ZERO));

        assert!(session.restart(Duration::from_secs(3)));
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.body().len(), 1);
        assert_eq!(session.body().head(), GridPos::ZERO);
        assert_eq!(session.score(), 0);
        assert_eq!(session.direction(), Direction::Right);
    }

    #[test]
    fn test_high_score_is_running_maximum() {
        let mut session = grid_session();
        let mut high_scores = Vec::new();

        for score in [3, 1, 5, 2] {
            for _ in 0..score {
                session.board.record_food();
            }
            session.body = Body::new(GridPos::new(9, 0, 0));
            session.tick(&mut NullView);
            high_scores.push(session.high_score());
            session.restart(Duration::ZERO);
        }

        assert_eq!(high_scores, vec![3, 3, 5, 5]);
        assert_eq!(session.store.load().unwrap(), Some(5));
    }

    #[test]
    fn test_high_score_loaded_from_store() {
        let session: GridSession = Session::new(GameConfig::cube(), Box::new(MemoryStore::with_value(42)));
        assert_eq!(session.high_score(), 42);
    }

    #[test]
    fn test_broken_store_is_not_fatal() {
        let mut session: GridSession = Session::new(GameConfig::cube().with_seed(2), Box::new(BrokenStore));
        assert_eq!(session.high_score(), 0);

        session.start(Duration::ZERO);
        session.board.record_food();
        session.body = Body::new(GridPos::new(9, 0, 0));
        session.tick(&mut NullView);

        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.high_score(), 1);
        assert!(session.restart(Duration::ZERO));
    }

    #[test]
    fn test_free_roam_velocity_from_rest() {
        let mut session = free_session();
        assert!(session.request_direction_change(Vec3::new(0.0, 0.0, -1.0)));

        session.frame(Duration::from_millis(50), 0.1, &mut NullView);

        assert_eq!(session.velocity(), Vec3::new(0.0, 0.0, -40.0));
        assert_eq!(session.position(), Vec3::new(0.0, 0.0, -4.0));
    }

    #[test]
    fn test_free_roam_records_segments_on_ticks() {
        let mut session = free_session();
        session.request_direction_change(Vec3::new(0.0, 0.0, -1.0));

        session.frame(Duration::from_millis(50), 0.05, &mut NullView);
        assert_eq!(session.body().len(), 1);
        assert_eq!(session.body().head(), Vec3::ZERO);

        let outcome = session.frame(Duration::from_millis(101), 0.05, &mut NullView);
        assert_eq!(outcome, Some(Outcome::Continue));
        assert_eq!(session.body().len(), 1);
        assert_eq!(session.body().head(), session.position());
    }

    #[test]
    fn test_free_roam_stationary_tick_keeps_body() {
        let mut session = free_session();
        session.body = Body::from_segments([Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0)]).unwrap();
        let before = session.body().clone();

        let outcome = session.tick(&mut NullView);

        assert_eq!(outcome, Some(Outcome::Continue));
        assert_eq!(session.body(), &before);
    }

    #[test]
    fn test_free_roam_boost_counts_down_per_frame() {
        let mut session = free_session();
        session.pickups.power_up = Some(Pickup::new(PickupKind::PowerUp, Vec3::ZERO));
        session.pickups.food.position = Vec3::new(90.0, 0.0, 90.0);

        let outcome = session.tick(&mut NullView);
        assert_eq!(outcome, Some(Outcome::Consumed(PickupKind::PowerUp)));
        assert_eq!(session.boost().remaining, 5.0);

        for i in 1..=60 {
            session.frame(Duration::from_millis(i), 0.1, &mut NullView);
        }
        assert!(!session.boost().active);
    }

    #[test]
    fn test_free_roam_pickups_spawn_clear_of_body() {
        let mut session: FreeRoamSession = Session::new(
            GameConfig::free_roam().with_size(20.0).with_seed(5),
            Box::new(MemoryStore::new()),
        );
        let quadrant = (-10..=0).flat_map(|x| (-10..=0).map(move |z| Vec3::new(x as f32, 0.0, z as f32)));
        session.body = Body::from_segments(quadrant).unwrap();

        let clearance = session.config.radii.body + session.config.radii.food;
        for _ in 0..50 {
            let food = session.spawn_pickup(PickupKind::Food);
            for segment in session.body().iter() {
                assert!(segment.distance_to(food.position) >= clearance);
            }
        }
    }

    #[test]
    fn test_obstacles_respect_clearance() {
        let session: FreeRoamSession =
            Session::new(GameConfig::obstacles().with_seed(8), Box::new(MemoryStore::new()));
        assert!(!session.obstacles().is_empty());
        for obstacle in session.obstacles() {
            assert!(obstacle.distance_to(Vec3::ZERO) >= 10.0);
            assert_eq!(obstacle.y, 0.0);
        }
    }

    #[test]
    fn test_obstacle_collision_ends_session() {
        let mut session = free_session();
        session.obstacles = vec![Vec3::new(0.0, 0.0, -5.0)];
        session.request_direction_change(Vec3::new(0.0, 0.0, -1.0));

        session.frame(Duration::from_millis(101), 0.1, &mut NullView);

        assert_eq!(session.last_outcome(), Some(Outcome::Fatal(CollisionType::Obstacle)));
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.body().head(), Vec3::ZERO);
    }
}

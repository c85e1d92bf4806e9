use anyhow::{Context, Result};
use crossterm::{
    event::{
        Event, EventStream, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info};

use crate::game::{Direction, GameConfig, HighScoreStore, Motion, Phase, Session};
use crate::input::{Controls, HeldKeys, InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Hud, Renderer};

/// One rendered frame at ~60 FPS; ticks are gated inside the session
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Interactive play in the terminal
pub struct HumanMode<M: Motion> {
    session: Session<M>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    held: HeldKeys,
    hud: Hud,
    clock: Instant,
    last_frame: Duration,
    key_release_events: bool,
    should_quit: bool,
}

impl<M: Motion> HumanMode<M> {
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Self {
        let controls = Controls::for_arena(config.arena.shape);

        Self {
            session: Session::new(config, store),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(controls),
            held: HeldKeys::default(),
            hud: Hud::new(),
            clock: Instant::now(),
            last_frame: Duration::ZERO,
            key_release_events: false,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        if M::HELD_STEERING && matches!(supports_keyboard_enhancement(), Ok(true)) {
            execute!(
                stderr,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .context("Failed to enable key release events")?;
            self.key_release_events = true;
        }
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_timer = interval(FRAME_INTERVAL);
        self.clock = Instant::now();
        self.last_frame = Duration::ZERO;

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Advance the simulation and render
                _ = frame_timer.tick() => {
                    self.update_frame();
                    let controls = self.input_handler.controls();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session, &self.metrics, &self.hud, controls);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!(games_played = self.metrics.games_played, "quitting");
                break;
            }
        }

        Ok(())
    }

    fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            let action = self.input_handler.handle_key_event(key);

            if key.kind == KeyEventKind::Release {
                if let KeyAction::Move(direction) = action {
                    self.held.release(direction);
                }
                return Ok(());
            }

            match action {
                KeyAction::Move(direction) => {
                    self.steer(direction);
                }
                KeyAction::Start => {
                    if self.session.start(self.now()) {
                        self.begin_session();
                    }
                }
                KeyAction::Restart => {
                    if self.session.restart(self.now()) {
                        self.begin_session();
                    }
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn steer(&mut self, direction: Direction) {
        if M::HELD_STEERING {
            self.held.press(direction, self.now());
        } else {
            let accepted = self
                .session
                .request_direction_change(M::input_from(direction.delta()));
            debug!(?direction, accepted, "steer");
        }
    }

    fn begin_session(&mut self) {
        self.metrics.on_game_start();
        self.hud.reset();
        self.held.clear();
    }

    fn update_frame(&mut self) {
        let now = self.now();
        let dt = now.saturating_sub(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if M::HELD_STEERING {
            let steering = self.held.vector(now);
            self.session.request_direction_change(M::input_from(steering));
        }

        if let Some(outcome) = self.session.frame(now, dt, &mut self.hud) {
            if outcome.is_fatal() {
                self.metrics.on_game_over(self.session.score());
            }
        }

        if self.session.phase() == Phase::Running {
            self.metrics.update();
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        if self.key_release_events {
            execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
                .context("Failed to restore keyboard mode")?;
        }
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{ArenaShape, Motion, Phase, PickupKind, Point, Session};
use crate::input::Controls;
use crate::metrics::GameMetrics;
use crate::render::Hud;

/// World units covered by one terminal cell in the follow camera
const FOLLOW_CELL_UNITS: f32 = 2.0;
/// Ground dots are drawn every this many cells
const GROUND_DOT_SPACING: i32 = 5;

/// Things that can occupy a cell on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Head,
    Body,
    Food,
    PowerUp,
    Obstacle,
}

impl Glyph {
    /// Drawn on top when two things share a cell at the same depth
    fn priority(&self) -> u8 {
        match self {
            Glyph::Head => 4,
            Glyph::Food => 3,
            Glyph::PowerUp => 2,
            Glyph::Body => 1,
            Glyph::Obstacle => 0,
        }
    }

    fn span(&self, off_layer: bool) -> Span<'static> {
        let (text, style) = match self {
            Glyph::Head => (
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Glyph::Body => ("□ ", Style::default().fg(Color::Green)),
            Glyph::Food => (
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Glyph::PowerUp => (
                "* ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Glyph::Obstacle => ("# ", Style::default().fg(Color::Gray)),
        };
        let style = if off_layer {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        };
        Span::styled(text, style)
    }
}

/// Maps world coordinates to (column, row, depth) on screen
type Projection = Box<dyn Fn([f32; 3]) -> (i32, i32, f32)>;

/// A projected glyph: depth decides which of two overlapping glyphs is visible
#[derive(Debug, Clone, Copy)]
struct Plot {
    glyph: Glyph,
    depth: f32,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<M: Motion>(
        &self,
        frame: &mut Frame,
        session: &Session<M>,
        metrics: &GameMetrics,
        hud: &Hud,
        controls: Controls,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(session, metrics, hud);
        frame.render_widget(stats, chunks[0]);

        // Center the game area horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match session.phase() {
            Phase::NotStarted => {
                frame.render_widget(self.render_title(session), game_area);
            }
            Phase::Running => {
                frame.render_widget(self.render_world(game_area, session), game_area);
            }
            Phase::GameOver => {
                frame.render_widget(self.render_game_over(session, metrics, hud), game_area);
            }
        }

        let controls = self.render_controls(controls);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_world<M: Motion>(&self, area: Rect, session: &Session<M>) -> Paragraph<'static> {
        let arena = session.config().arena;
        let [hx, hy, hz] = session.body().head().coords();

        // Bordered area, two terminal columns per cell
        let cols = (area.width.saturating_sub(2) / 2).max(1) as i32;
        let rows = area.height.saturating_sub(2).max(1) as i32;

        let (width, height, project): (i32, i32, Projection) = match arena.shape {
            ArenaShape::Square | ArenaShape::Cube => {
                // Valid cells lie strictly inside the walls
                let half = (arena.size / 2.0).ceil() as i64;
                let span = half.saturating_mul(2).saturating_sub(1).max(1);
                let width = span.min(i64::from(cols));
                let height = span.min(i64::from(rows));

                // Scroll with the head when the arena is larger than the view
                let to_col = move |x: f32| (x.round() as i64).saturating_add(half - 1);
                let to_row = move |y: f32| (half - 1).saturating_sub(y.round() as i64);
                let left = to_col(hx).saturating_sub(width / 2).clamp(0, span - width);
                let top = to_row(hy).saturating_sub(height / 2).clamp(0, span - height);

                let project: Projection = Box::new(move |[x, y, z]: [f32; 3]| {
                    let col = i32::try_from(to_col(x).saturating_sub(left)).unwrap_or(-1);
                    let row = i32::try_from(to_row(y).saturating_sub(top)).unwrap_or(-1);
                    (col, row, z)
                });
                (width as i32, height as i32, project)
            }
            ArenaShape::Plane => {
                // Follow camera looking down at the x/z ground plane
                let project: Projection = Box::new(move |[x, _y, z]: [f32; 3]| {
                    let col = ((x - hx) / FOLLOW_CELL_UNITS).round() as i32 + cols / 2;
                    let row = ((z - hz) / FOLLOW_CELL_UNITS).round() as i32 + rows / 2;
                    (col, row, 0.0)
                });
                (cols, rows, project)
            }
        };

        let mut plots: Vec<Vec<Option<Plot>>> = vec![vec![None; width as usize]; height as usize];
        let mut place = |coords: [f32; 3], glyph: Glyph| {
            let (col, row, depth) = project(coords);
            if col < 0 || row < 0 || col >= width || row >= height {
                return;
            }
            let cell = &mut plots[row as usize][col as usize];
            let replace = match cell {
                None => true,
                Some(existing) => {
                    depth > existing.depth
                        || (depth == existing.depth && glyph.priority() > existing.glyph.priority())
                }
            };
            if replace {
                *cell = Some(Plot { glyph, depth });
            }
        };

        for obstacle in session.obstacles() {
            place(obstacle.coords(), Glyph::Obstacle);
        }
        for segment in session.body().iter().skip(1) {
            place(segment.coords(), Glyph::Body);
        }
        for pickup in session.pickups().iter() {
            let glyph = match pickup.kind {
                PickupKind::Food => Glyph::Food,
                PickupKind::PowerUp => Glyph::PowerUp,
            };
            place(pickup.position.coords(), glyph);
        }
        place([hx, hy, hz], Glyph::Head);

        let follow = arena.shape == ArenaShape::Plane;
        let ground_origin = (
            (hx / FOLLOW_CELL_UNITS).round() as i32 - cols / 2,
            (hz / FOLLOW_CELL_UNITS).round() as i32 - rows / 2,
        );

        let lines: Vec<Line<'static>> = plots
            .into_iter()
            .enumerate()
            .map(|(row, cells)| {
                let spans: Vec<Span<'static>> = cells
                    .into_iter()
                    .enumerate()
                    .map(|(col, plot)| match plot {
                        Some(plot) => plot.glyph.span(plot.depth != hz && !follow),
                        None if follow => {
                            let gx = ground_origin.0 + col as i32;
                            let gz = ground_origin.1 + row as i32;
                            if gx.rem_euclid(GROUND_DOT_SPACING) == 0
                                && gz.rem_euclid(GROUND_DOT_SPACING) == 0
                            {
                                Span::styled("· ", Style::default().fg(Color::DarkGray))
                            } else {
                                Span::raw("  ")
                            }
                        }
                        None => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let title = match arena.shape {
            ArenaShape::Square => " Snake ".to_string(),
            ArenaShape::Cube => format!(" Snake 3D | layer z = {} ", hz),
            ArenaShape::Plane => format!(" Snake Free Roam | x {:.0} z {:.0} ", hx, hz),
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats<M: Motion>(
        &self,
        session: &Session<M>,
        metrics: &GameMetrics,
        hud: &Hud,
    ) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled(
                hud.score_text.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", label),
            Span::styled(session.high_score().to_string(), value),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(session.body().len().to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ];

        let boost = session.boost();
        if boost.active {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                format!("BOOST {:.1}s", boost.remaining),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        if let Some(message) = &hud.message {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(message.clone(), Style::default().fg(Color::Magenta)));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_title<M: Motion>(&self, session: &Session<M>) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(session.high_score().to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_game_over<M: Motion>(
        &self,
        session: &Session<M>,
        metrics: &GameMetrics,
        hud: &Hud,
    ) -> Paragraph<'static> {
        let final_score = hud.final_score.unwrap_or_else(|| session.score());
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
        ];

        if let Some(crash) = hud.crash {
            text.push(Line::from(vec![Span::styled(
                Hud::describe_crash(crash),
                Style::default().fg(Color::Gray),
            )]));
        }

        text.extend([
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    final_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(session.high_score().to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(vec![Span::styled(
                format!(
                    "Games played: {}    Best this run: {}    Time: {}",
                    metrics.games_played,
                    metrics.best_this_run,
                    metrics.format_time()
                ),
                Style::default().fg(Color::Gray),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Esc",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ]);

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, controls: Controls) -> Paragraph<'static> {
        let keys = Style::default().fg(Color::Cyan);
        let mut spans = match controls {
            Controls::Planar => vec![
                Span::styled("↑↓←→", keys),
                Span::raw(" or "),
                Span::styled("WASD", keys),
                Span::raw(" to move"),
            ],
            Controls::Spatial => vec![
                Span::styled("↑↓←→", keys),
                Span::raw(" to move, "),
                Span::styled("Q/A", keys),
                Span::raw(" in/out"),
            ],
            Controls::Steering => vec![
                Span::styled("↑↓←→", keys),
                Span::raw(" or "),
                Span::styled("WASD", keys),
                Span::raw(" (hold) to steer"),
            ],
        };
        spans.extend([
            Span::raw(" | "),
            Span::styled("Space", Style::default().fg(Color::Green)),
            Span::raw(" start | "),
            Span::styled("Esc", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{expression, GameSnapshot, Outcome};
use crate::fb::{text_width, CellStyle, FrameBuffer, Rgb};
use crate::types::{Phase, Player, Resolution, RoundPayload, Tile, TILE_COUNT};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Application state shown alongside the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusView {
    pub audio_enabled: bool,
}

impl Default for StatusView {
    fn default() -> Self {
        Self {
            audio_enabled: true,
        }
    }
}

pub(crate) mod palette {
    use crate::fb::{CellStyle, Rgb};

    pub const BG: Rgb = Rgb::new(0, 0, 0);
    pub const TILE_BG: Rgb = Rgb::new(30, 30, 40);
    pub const SELECTED_BG: Rgb = Rgb::new(70, 60, 20);

    pub const TEXT: CellStyle = CellStyle::new(Rgb::new(220, 220, 220), BG);
    pub const LABEL: CellStyle = CellStyle::new(Rgb::new(220, 220, 220), BG).bold();
    pub const HINT: CellStyle = CellStyle::new(Rgb::new(140, 140, 150), BG).dim();
    pub const TITLE: CellStyle = CellStyle::new(Rgb::new(240, 200, 80), BG).bold();
    pub const BORDER: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), BG);
    pub const GOOD: CellStyle = CellStyle::new(Rgb::new(100, 220, 120), BG).bold();
    pub const BAD: CellStyle = CellStyle::new(Rgb::new(220, 80, 80), BG).bold();
    pub const ACCENT: CellStyle = CellStyle::new(Rgb::new(80, 200, 220), BG).bold();
}

/// Width of one tile box in columns.
pub const TILE_W: u16 = 7;
/// Height of one tile box in rows.
pub const TILE_H: u16 = 4;
const TILE_GAP: u16 = 1;
const TILES_PER_ROW: usize = TILE_COUNT / 2;

/// Columns needed for one row of tiles.
pub fn tile_grid_width() -> u16 {
    TILES_PER_ROW as u16 * (TILE_W + TILE_GAP) - TILE_GAP
}

/// Draw the 10 tiles in two rows of five, starting at `(x, y)`.
///
/// `selection` holds tile indices in selection order; selected tiles show
/// their position in the equation.
pub fn draw_tiles(fb: &mut FrameBuffer, x: u16, y: u16, tiles: &[Tile], selection: &[usize]) {
    for (i, tile) in tiles.iter().enumerate().take(TILE_COUNT) {
        let col = (i % TILES_PER_ROW) as u16;
        let row = (i / TILES_PER_ROW) as u16;
        let tx = x + col * (TILE_W + TILE_GAP);
        let ty = y + row * (TILE_H + 1);
        let order = selection.iter().position(|&s| s == i);
        draw_tile(fb, tx, ty, tile, order);
    }
}

fn draw_tile(fb: &mut FrameBuffer, x: u16, y: u16, tile: &Tile, order: Option<usize>) {
    let bg = if order.is_some() {
        palette::SELECTED_BG
    } else {
        palette::TILE_BG
    };
    let border = palette::BORDER.on(bg);
    let face = CellStyle::new(Rgb::new(240, 240, 240), bg).bold();

    fb.fill_rect(x, y, TILE_W, TILE_H, ' ', face);
    fb.draw_box(x, y, TILE_W, TILE_H, border);
    fb.put_char(x + 1, y + 1, tile.label, palette::ACCENT.on(bg));
    if let Some(n) = order {
        let mark = char::from_digit((n + 1) as u32, 10).unwrap_or('*');
        fb.put_char(x + TILE_W - 2, y + 1, mark, palette::TITLE.on(bg));
    }
    let face_text = format!("{}{}", tile.operator.symbol(), tile.number);
    let fx = x + TILE_W.saturating_sub(text_width(&face_text)) / 2;
    fb.put_str(fx, y + 2, &face_text, face);
}

/// `m:ss`
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Selected labels with blanks for the remaining slots, e.g. `A I _`.
pub fn selection_slots(payload: &RoundPayload, selection: &[usize]) -> String {
    (0..3)
        .map(|slot| {
            selection
                .get(slot)
                .and_then(|&i| payload.tile(i))
                .map_or('_', |t| t.label)
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Status text and style for a shown outcome.
pub fn outcome_line(payload: &RoundPayload, outcome: &Outcome) -> (String, CellStyle) {
    let equation = outcome
        .key
        .and_then(|key| payload.triple(key))
        .map(|tiles| expression(&tiles));
    let value = outcome
        .evaluation
        .map(|e| e.display().to_string())
        .unwrap_or_default();

    match (outcome.resolution, equation) {
        (Resolution::Timeout, _) => ("Time's up!  −1".to_string(), palette::BAD),
        (Resolution::Correct, Some(eq)) => (format!("{eq} = {value}  Correct!  +1"), palette::GOOD),
        (Resolution::Duplicate, Some(eq)) => {
            (format!("{eq} = {value}  Already found  −1"), palette::BAD)
        }
        (_, Some(eq)) => (format!("{eq} = {value}  Wrong  −1"), palette::BAD),
        (_, None) => (outcome.resolution.as_str().to_string(), palette::BAD),
    }
}

/// A lightweight terminal renderer for the target-number game.
#[derive(Debug, Clone, Default)]
pub struct GameView;

impl GameView {
    pub fn new() -> Self {
        Self
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        status: &StatusView,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(palette::TEXT.cell(' '));

        match snap.phase {
            Phase::Menu => self.draw_menu(fb, status),
            Phase::Config => self.draw_config(fb, snap),
            Phase::Game | Phase::Guessing | Phase::ShowingResult => self.draw_round(fb, snap),
            Phase::RoundOver => self.draw_round_over(fb, snap),
            Phase::GameOver => self.draw_game_over(fb, snap),
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, status: &StatusView, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, status, viewport, &mut fb);
        fb
    }

    fn draw_menu(&self, fb: &mut FrameBuffer, status: &StatusView) {
        let mut y = fb.height().saturating_sub(9) / 2;
        fb.put_str_centered(y, "T A R G E T", palette::TITLE);
        y += 1;
        fb.put_str_centered(y, "three tiles, one number", palette::HINT);
        y += 3;
        fb.put_str_centered(y, "Enter  start     ", palette::TEXT);
        y += 1;
        fb.put_str_centered(y, "t      tutorial  ", palette::TEXT);
        y += 1;
        let audio = if status.audio_enabled {
            "m      audio: on "
        } else {
            "m      audio: off"
        };
        fb.put_str_centered(y, audio, palette::TEXT);
        y += 1;
        fb.put_str_centered(y, "q      quit      ", palette::TEXT);
    }

    fn draw_config(&self, fb: &mut FrameBuffer, snap: &GameSnapshot) {
        let mut y = fb.height().saturating_sub(8) / 2;
        fb.put_str_centered(y, "NEW GAME", palette::TITLE);
        y += 2;
        let players = format!("Players  ◀ {} ▶", snap.config.num_players);
        fb.put_str_centered(y, &players, palette::LABEL);
        y += 1;
        let rounds = format!("Rounds   ▲ {:>2} ▼", snap.config.num_rounds);
        fb.put_str_centered(y, &rounds, palette::LABEL);
        y += 3;
        fb.put_str_centered(y, "←/→ players  ↑/↓ rounds  Enter play  Esc menu", palette::HINT);
    }

    fn draw_round(&self, fb: &mut FrameBuffer, snap: &GameSnapshot) {
        let Some(payload) = snap.payload.as_ref() else {
            fb.put_str_centered(fb.height() / 2, "Dealing…", palette::HINT);
            return;
        };

        let grid_w = tile_grid_width();
        let x = fb.width().saturating_sub(grid_w) / 2;
        let mut y = 1;

        // Header: round, target, clock
        let round = format!("Round {}/{}", snap.config.current_round, snap.config.num_rounds);
        fb.put_str(x, y, &round, palette::LABEL);
        let target = format!("TARGET {}", payload.target);
        fb.put_str_centered(y, &target, palette::TITLE);
        let clock = format_clock(snap.round_remaining);
        let clock_style = if snap.round_clock_running {
            palette::LABEL
        } else {
            palette::HINT
        };
        fb.put_str(
            (x + grid_w).saturating_sub(text_width(&clock)),
            y,
            &clock,
            clock_style,
        );
        y += 2;

        draw_tiles(fb, x, y, &payload.tiles, &snap.selection);
        y += 2 * (TILE_H + 1) + 1;

        // Scores
        for player in &snap.players {
            let marker = if snap.guessing == Some(player.id) {
                '▶'
            } else {
                ' '
            };
            let line = format!("{} {} {:>3}", marker, player.name, player.score);
            let style = if snap.guessing == Some(player.id) {
                palette::ACCENT
            } else {
                palette::TEXT
            };
            fb.put_str(x, y, &line, style);
            y += 1;
        }
        let found = format!("Found {}/{}", snap.found.len(), snap.valid_count());
        fb.put_str(
            (x + grid_w).saturating_sub(text_width(&found)),
            y.saturating_sub(snap.players.len() as u16),
            &found,
            palette::LABEL,
        );
        y += 1;

        // Status line
        match snap.phase {
            Phase::Game if snap.transitioning => {
                fb.put_str_centered(y, "Next round…", palette::HINT);
            }
            Phase::Game => {
                let hint = format!("Press 1-{} to guess", snap.players.len());
                fb.put_str_centered(y, &hint, palette::HINT);
            }
            Phase::Guessing => {
                let name = snap
                    .guessing
                    .and_then(|id| snap.player(id))
                    .map_or("?", |p| p.name.as_str());
                let line = format!(
                    "{} guessing  {}   {}",
                    name,
                    selection_slots(payload, &snap.selection),
                    format_clock(snap.guess_remaining)
                );
                fb.put_str_centered(y, &line, palette::ACCENT);
                fb.put_str_centered(y + 1, "pick tiles with a-j", palette::HINT);
            }
            Phase::ShowingResult => {
                if let Some(outcome) = snap.outcome.as_ref() {
                    let (line, style) = outcome_line(payload, outcome);
                    fb.put_str_centered(y, &line, style);
                }
            }
            _ => {}
        }
    }

    fn draw_round_over(&self, fb: &mut FrameBuffer, snap: &GameSnapshot) {
        let mut y = 1;
        let title = format!("ROUND {} OVER", snap.config.current_round);
        fb.put_str_centered(y, &title, palette::TITLE);
        y += 2;

        if let Some(payload) = snap.payload.as_ref() {
            let found = format!(
                "Target {}: found {} of {}",
                payload.target,
                snap.found.len(),
                payload.valid_equations.len()
            );
            fb.put_str_centered(y, &found, palette::LABEL);
            y += 2;
            for valid in &payload.valid_equations {
                let finder = snap
                    .found
                    .iter()
                    .find(|f| f.key == valid.key)
                    .and_then(|f| snap.player(f.found_by));
                let equation = payload
                    .triple(valid.key)
                    .map(|t| expression(&t))
                    .unwrap_or_default();
                let line = match finder {
                    Some(p) => format!("{}  {}  {}", valid.key.labels(), equation, p.name),
                    None => format!("{}  {}  -", valid.key.labels(), equation),
                };
                let style = if finder.is_some() {
                    palette::GOOD
                } else {
                    palette::HINT
                };
                fb.put_str_centered(y, &line, style);
                y += 1;
            }
            y += 1;
        }

        y = self.draw_scores(fb, y, &snap.ranking());
        y += 1;
        fb.put_str_centered(y, "Enter next round  c new game  Esc menu", palette::HINT);
    }

    fn draw_game_over(&self, fb: &mut FrameBuffer, snap: &GameSnapshot) {
        let mut y = fb.height().saturating_sub(6 + snap.players.len() as u16) / 2;
        fb.put_str_centered(y, "GAME OVER", palette::TITLE);
        y += 2;
        let verdict = match snap.winner() {
            Some(p) => format!("{} wins!", p.name),
            None => "It's a tie!".to_string(),
        };
        fb.put_str_centered(y, &verdict, palette::GOOD);
        y += 2;
        y = self.draw_scores(fb, y, &snap.ranking());
        y += 1;
        fb.put_str_centered(y, "Enter play again  Esc menu", palette::HINT);
    }

    fn draw_scores(&self, fb: &mut FrameBuffer, mut y: u16, ranking: &[&Player]) -> u16 {
        for (place, player) in ranking.iter().enumerate() {
            let line = format!("{}. {:<10} {:>3}", place + 1, player.name, player.score);
            fb.put_str_centered(y, &line, palette::TEXT);
            y += 1;
        }
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Command, PlayerId};
    use crate::core::{tutorial_board, GameMachine, ScriptedRoundGenerator, Wake};

    const VIEW: Viewport = Viewport {
        width: 80,
        height: 30,
    };

    fn machine() -> GameMachine<ScriptedRoundGenerator> {
        GameMachine::new(ScriptedRoundGenerator::repeat(tutorial_board()))
    }

    fn render(snap: &GameSnapshot) -> FrameBuffer {
        GameView::new().render(snap, &StatusView::default(), VIEW)
    }

    #[test]
    fn menu_shows_audio_state() {
        let snap = machine().snapshot();
        let fb = GameView::new().render(
            &snap,
            &StatusView {
                audio_enabled: false,
            },
            VIEW,
        );
        assert!(fb.contains_text("T A R G E T"));
        assert!(fb.contains_text("audio: off"));
    }

    #[test]
    fn config_shows_counts() {
        let mut m = machine();
        m.apply(Command::Start);
        let fb = render(&m.snapshot());
        assert!(fb.contains_text("Players  ◀ 2 ▶"));
        assert!(fb.contains_text("Rounds   ▲  3 ▼"));
    }

    #[test]
    fn board_shows_tiles_target_and_clock() {
        let mut m = machine();
        m.apply(Command::Start);
        m.apply(Command::StartGame);
        let fb = render(&m.snapshot());
        assert!(fb.contains_text("TARGET 11"));
        assert!(fb.contains_text("3:00"));
        assert!(fb.contains_text("Round 1/3"));
        assert!(fb.contains_text("×5"));
        assert!(fb.contains_text("Press 1-2 to guess"));
    }

    #[test]
    fn guessing_shows_selection_slots() {
        let mut m = machine();
        m.apply(Command::Start);
        m.apply(Command::StartGame);
        m.apply(Command::StartGuessing(PlayerId::new(2)));
        m.apply(Command::SelectTile(0));
        let fb = render(&m.snapshot());
        assert!(fb.contains_text("Player 2 guessing  A _ _   0:10"));
    }

    #[test]
    fn result_line_shows_equation_and_verdict() {
        let mut m = machine();
        m.apply(Command::Start);
        m.apply(Command::StartGame);
        m.apply(Command::StartGuessing(PlayerId::new(1)));
        for tile in [0, 8, 9] {
            m.apply(Command::SelectTile(tile));
        }
        let fb = render(&m.snapshot());
        assert!(fb.contains_text("1 + 2 × 5 = 11  Correct!  +1"));
    }

    #[test]
    fn timeout_line_has_no_value() {
        let mut m = machine();
        m.apply(Command::Start);
        m.apply(Command::StartGame);
        m.apply(Command::StartGuessing(PlayerId::new(1)));
        let epoch = m.clock(crate::types::Clock::Guess).epoch();
        for _ in 0..crate::types::GUESS_DURATION_SECS {
            m.wake(Wake::Tick {
                clock: crate::types::Clock::Guess,
                epoch,
            });
        }
        let fb = render(&m.snapshot());
        assert!(fb.contains_text("Time's up!"));
    }

    #[test]
    fn game_over_names_winner() {
        let mut snap = GameSnapshot {
            phase: Phase::GameOver,
            players: crate::types::roster(2),
            ..Default::default()
        };
        snap.players[1].score = 3;
        let fb = render(&snap);
        assert!(fb.contains_text("Player 2 wins!"));
        assert!(fb.contains_text("1. Player 2"));
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let mut m = machine();
        m.apply(Command::Start);
        m.apply(Command::StartGame);
        let fb = GameView::new().render(&m.snapshot(), &StatusView::default(), Viewport::new(5, 3));
        assert_eq!(fb.width(), 5);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(180), "3:00");
        assert_eq!(format_clock(9), "0:09");
    }
}

//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, input mapping).
//!
//! # Board
//!
//! Every round deals a fixed row of tiles:
//!
//! - **Tiles**: 10 per round, labelled `A` through `J`
//! - **Equation**: exactly 3 distinct tiles, in selection order
//! - **Target**: one integer per round, hit by at least one equation
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `CLOCK_PERIOD_MS` | 1000 | One countdown unit |
//! | `ROUND_DURATION_SECS` | 180 | Round timer start value |
//! | `GUESS_DURATION_SECS` | 10 | Guess timer start value |
//! | `RESULT_DISPLAY_MS` | 2500 | Result shown before the machine resolves it |
//! | `ROUND_TRANSITION_MS` | 600 | Delay before the next round is dealt |
//!
//! # Examples
//!
//! ```
//! use tui_target_types::{Command, Operator, Phase, TILE_COUNT};
//!
//! let op = Operator::from_char('x').unwrap();
//! assert_eq!(op, Operator::Mul);
//! assert_eq!(op.symbol(), '×');
//!
//! assert_eq!(Command::from_str("startGame"), Some(Command::StartGame));
//! assert_eq!(Phase::ShowingResult.as_str(), "showingResult");
//! assert_eq!(TILE_COUNT, 10);
//! ```

use std::fmt;

/// Tiles dealt per round.
pub const TILE_COUNT: usize = 10;

/// Tiles that make up one equation.
pub const TILES_PER_EQUATION: usize = 3;

/// Length of one countdown unit in milliseconds.
pub const CLOCK_PERIOD_MS: u32 = 1000;

/// Round timer start value (3 minutes).
pub const ROUND_DURATION_SECS: u32 = 180;

/// Guess timer start value.
pub const GUESS_DURATION_SECS: u32 = 10;

/// How long an outcome stays on screen before it is resolved.
pub const RESULT_DISPLAY_MS: u32 = 2500;

/// Delay between `nextRound` and dealing the new board.
pub const ROUND_TRANSITION_MS: u32 = 600;

pub const MIN_PLAYERS: u8 = 1;
pub const MAX_PLAYERS: u8 = 4;
pub const INITIAL_PLAYERS: u8 = 2;

pub const MIN_ROUNDS: u8 = 1;
pub const MAX_ROUNDS: u8 = 10;
pub const INITIAL_ROUNDS: u8 = 3;

/// Smallest number printed on a generated tile.
pub const TILE_NUMBER_MIN: i32 = 1;

/// Largest number printed on a generated tile.
pub const TILE_NUMBER_MAX: i32 = 9;

/// Preferred number of valid equations per generated round (inclusive).
pub const PREFERRED_SOLUTIONS: (usize, usize) = (2, 5);


/// Label of the tile at `index` (`A` for 0 through `J` for 9).
pub fn tile_label(index: usize) -> Option<char> {
    if index < TILE_COUNT {
        Some((b'A' + index as u8) as char)
    } else {
        None
    }
}

/// Inverse of [`tile_label`], case-insensitive.
pub fn tile_index(label: char) -> Option<usize> {
    let upper = label.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        let index = (upper as u8 - b'A') as usize;
        (index < TILE_COUNT).then_some(index)
    } else {
        None
    }
}

/// Arithmetic operator printed on a tile
///
/// - **Add** / **Sub**: low precedence
/// - **Mul** / **Div**: bind tighter than `+` and `-`
///
/// The operator of the first tile in an equation is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    /// Parse from a single character; accepts ASCII and typographic forms.
    ///
    /// ```
    /// use tui_target_types::Operator;
    ///
    /// assert_eq!(Operator::from_char('+'), Some(Operator::Add));
    /// assert_eq!(Operator::from_char('−'), Some(Operator::Sub));
    /// assert_eq!(Operator::from_char('*'), Some(Operator::Mul));
    /// assert_eq!(Operator::from_char('÷'), Some(Operator::Div));
    /// assert_eq!(Operator::from_char('%'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' | '−' => Some(Operator::Sub),
            '*' | 'x' | 'X' | '×' => Some(Operator::Mul),
            '/' | '÷' => Some(Operator::Div),
            _ => None,
        }
    }

    /// Display symbol.
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '−',
            Operator::Mul => '×',
            Operator::Div => '÷',
        }
    }

    /// True for `×` and `÷`.
    pub fn binds_tighter(&self) -> bool {
        matches!(self, Operator::Mul | Operator::Div)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A game piece: operator, number and fixed label. Immutable once dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub operator: Operator,
    pub number: i32,
    pub label: char,
}

impl Tile {
    pub fn new(operator: Operator, number: i32, label: char) -> Self {
        Self {
            operator,
            number,
            label,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.label, self.operator, self.number)
    }
}

/// Ordered triple of tile indices, in selection order.
///
/// `0,8,9` and `8,0,9` are different keys even when both evaluate to the
/// same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EquationKey([usize; TILES_PER_EQUATION]);

impl EquationKey {
    pub fn new(indices: [usize; TILES_PER_EQUATION]) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> [usize; TILES_PER_EQUATION] {
        self.0
    }

    /// Tile labels in selection order, e.g. `"AIJ"`.
    pub fn labels(&self) -> String {
        self.0.iter().filter_map(|&i| tile_label(i)).collect()
    }
}

impl fmt::Display for EquationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [i, j, k] = self.0;
        write!(f, "{i},{j},{k}")
    }
}

/// An equation the generator knows to hit the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidEquation {
    pub key: EquationKey,
    pub result: i64,
}

/// Everything the generator hands over for one round. Read-only for the
/// round's duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPayload {
    pub tiles: [Tile; TILE_COUNT],
    pub target: i64,
    pub valid_equations: Vec<ValidEquation>,
}

impl RoundPayload {
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Tiles for `key`, in key order.
    pub fn triple(&self, key: EquationKey) -> Option<[Tile; TILES_PER_EQUATION]> {
        let [i, j, k] = key.indices();
        Some([*self.tile(i)?, *self.tile(j)?, *self.tile(k)?])
    }
}

/// Stable player identifier (1-based seat number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(u8);

impl PlayerId {
    pub const fn new(seat: u8) -> Self {
        Self(seat)
    }

    pub const fn seat(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

/// A local player. Scores are unsigned, so deductions clamp at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            name: format!("Player {}", id.seat()),
            score: 0,
        }
    }

    pub fn award(&mut self) {
        self.score = self.score.saturating_add(1);
    }

    pub fn deduct(&mut self) {
        self.score = self.score.saturating_sub(1);
    }
}

/// Fresh roster of `count` players with ids `player-1..=player-count`.
pub fn roster(count: u8) -> Vec<Player> {
    (1..=count).map(|seat| Player::new(PlayerId::new(seat))).collect()
}

/// A correct equation found during the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoundEquation {
    pub key: EquationKey,
    pub found_by: PlayerId,
}

/// Immutable record of a finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundHistoryEntry {
    pub round_number: u8,
    pub payload: RoundPayload,
    pub found_equations: Vec<FoundEquation>,
    pub scores: Vec<(PlayerId, u32)>,
}

/// Top-level phase of a session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Menu,
    Config,
    Game,
    Guessing,
    ShowingResult,
    RoundOver,
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Menu => "menu",
            Phase::Config => "config",
            Phase::Game => "game",
            Phase::Guessing => "guessing",
            Phase::ShowingResult => "showingResult",
            Phase::RoundOver => "roundOver",
            Phase::GameOver => "gameOver",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a submission (or a guess that ran out of time) was judged.
///
/// Decided once per submission; the score change is derived from it alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Correct,
    Duplicate,
    Incorrect,
    Timeout,
}

impl Resolution {
    /// Score delta for the guessing player.
    pub fn score_delta(&self) -> i8 {
        match self {
            Resolution::Correct => 1,
            Resolution::Duplicate | Resolution::Incorrect | Resolution::Timeout => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Correct => "correct",
            Resolution::Duplicate => "duplicate",
            Resolution::Incorrect => "incorrect",
            Resolution::Timeout => "timeout",
        }
    }
}

/// The two countdown clocks owned by the game machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clock {
    Round,
    Guess,
}

impl Clock {
    pub const ALL: [Clock; 2] = [Clock::Round, Clock::Guess];

    pub fn index(&self) -> usize {
        match self {
            Clock::Round => 0,
            Clock::Guess => 1,
        }
    }
}

/// Session configuration. `current_round` is 0 only before the first round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub num_players: u8,
    pub num_rounds: u8,
    pub current_round: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: INITIAL_PLAYERS,
            num_rounds: INITIAL_ROUNDS,
            current_round: 0,
        }
    }
}

impl GameConfig {
    /// Apply a partial update, clamping each field into its bounds.
    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(players) = update.num_players {
            self.num_players = players.clamp(MIN_PLAYERS, MAX_PLAYERS);
        }
        if let Some(rounds) = update.num_rounds {
            self.num_rounds = rounds.clamp(MIN_ROUNDS, MAX_ROUNDS);
        }
    }
}

/// Partial configuration change; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigUpdate {
    pub num_players: Option<u8>,
    pub num_rounds: Option<u8>,
}

impl ConfigUpdate {
    pub fn players(n: u8) -> Self {
        Self {
            num_players: Some(n),
            num_rounds: None,
        }
    }

    pub fn rounds(n: u8) -> Self {
        Self {
            num_players: None,
            num_rounds: Some(n),
        }
    }
}

/// User-facing commands accepted by the game machine
///
/// Commands that are not legal in the current phase are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the menu for the configuration screen
    Start,
    /// Change player/round counts (clamped)
    UpdateConfig(ConfigUpdate),
    /// Deal round 1 and start the round timer
    StartGame,
    /// A player claims the board to submit an equation
    StartGuessing(PlayerId),
    /// Add a tile to the selection buffer
    SelectTile(usize),
    /// Advance to the next round, or end the game after the last one
    NextRound,
    /// Back to configuration for another game
    ContinueGame,
    /// Abandon the session
    ExitToMenu,
}

impl Command {
    /// Parse argument-free commands from their camelCase names
    ///
    /// ```
    /// use tui_target_types::Command;
    ///
    /// assert_eq!(Command::from_str("nextround"), Some(Command::NextRound));
    /// assert_eq!(Command::from_str("exitToMenu"), Some(Command::ExitToMenu));
    /// assert_eq!(Command::from_str("selectTile"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "startgame" => Some(Command::StartGame),
            "nextround" => Some(Command::NextRound),
            "continuegame" => Some(Command::ContinueGame),
            "exittomenu" => Some(Command::ExitToMenu),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::UpdateConfig(_) => "updateConfig",
            Command::StartGame => "startGame",
            Command::StartGuessing(_) => "startGuessing",
            Command::SelectTile(_) => "selectTile",
            Command::NextRound => "nextRound",
            Command::ContinueGame => "continueGame",
            Command::ExitToMenu => "exitToMenu",
        }
    }
}

//! Key mapping from terminal events to UI actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::{tile_index, Command, ConfigUpdate, GameConfig, Phase, PlayerId, MAX_PLAYERS};

/// Navigation inside the tutorial overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialAction {
    Next,
    Previous,
    /// Leave and mark the tutorial as seen.
    Skip,
    /// Leave without marking it as seen.
    Leave,
}

/// What a key press asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Game(Command),
    AdjustPlayers(i8),
    AdjustRounds(i8),
    OpenTutorial,
    ToggleAudio,
    Tutorial(TutorialAction),
    Quit,
}

impl UiAction {
    /// The machine command for this action, resolving relative config
    /// adjustments against `config`.
    pub fn command(self, config: &GameConfig) -> Option<Command> {
        match self {
            UiAction::Game(command) => Some(command),
            UiAction::AdjustPlayers(delta) => Some(Command::UpdateConfig(ConfigUpdate::players(
                config.num_players.saturating_add_signed(delta),
            ))),
            UiAction::AdjustRounds(delta) => Some(Command::UpdateConfig(ConfigUpdate::rounds(
                config.num_rounds.saturating_add_signed(delta),
            ))),
            _ => None,
        }
    }
}

/// Map a key press during normal play.
pub fn handle_key_event(key: KeyEvent, phase: Phase) -> Option<UiAction> {
    if should_quit(key) {
        return Some(UiAction::Quit);
    }
    if key.code == KeyCode::Esc {
        return match phase {
            Phase::Menu => None,
            _ => Some(UiAction::Game(Command::ExitToMenu)),
        };
    }

    match phase {
        Phase::Menu => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(UiAction::Game(Command::Start)),
            KeyCode::Char('t') | KeyCode::Char('T') => Some(UiAction::OpenTutorial),
            KeyCode::Char('m') | KeyCode::Char('M') => Some(UiAction::ToggleAudio),
            _ => None,
        },
        Phase::Config => match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(UiAction::AdjustPlayers(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some(UiAction::AdjustPlayers(1)),
            KeyCode::Up | KeyCode::Char('k') => Some(UiAction::AdjustRounds(1)),
            KeyCode::Down | KeyCode::Char('j') => Some(UiAction::AdjustRounds(-1)),
            KeyCode::Enter | KeyCode::Char(' ') => Some(UiAction::Game(Command::StartGame)),
            KeyCode::Char('m') | KeyCode::Char('M') => Some(UiAction::ToggleAudio),
            _ => None,
        },
        Phase::Game => match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let seat = c as u8 - b'0';
                (seat <= MAX_PLAYERS)
                    .then(|| UiAction::Game(Command::StartGuessing(PlayerId::new(seat))))
            }
            _ => None,
        },
        Phase::Guessing => match key.code {
            KeyCode::Char(c) => tile_index(c).map(|i| UiAction::Game(Command::SelectTile(i))),
            _ => None,
        },
        Phase::ShowingResult => None,
        Phase::RoundOver => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') | KeyCode::Char('N') => {
                Some(UiAction::Game(Command::NextRound))
            }
            KeyCode::Char('c') | KeyCode::Char('C') => Some(UiAction::Game(Command::ContinueGame)),
            _ => None,
        },
        Phase::GameOver => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(UiAction::Game(Command::ContinueGame)),
            _ => None,
        },
    }
}

/// Map a key press while the tutorial is open.
pub fn handle_tutorial_key(key: KeyEvent) -> Option<UiAction> {
    if should_quit(key) {
        return Some(UiAction::Quit);
    }
    let action = match key.code {
        KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('l') => {
            TutorialAction::Next
        }
        KeyCode::Left | KeyCode::Backspace | KeyCode::Char('h') => TutorialAction::Previous,
        KeyCode::Char('s') | KeyCode::Char('S') => TutorialAction::Skip,
        KeyCode::Esc => TutorialAction::Leave,
        _ => return None,
    };
    Some(UiAction::Tutorial(action))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

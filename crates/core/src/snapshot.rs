use crate::machine::Outcome;
use crate::types::{FoundEquation, GameConfig, Phase, Player, PlayerId, RoundPayload};

/// Read-only view of a session for presentation code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub config: GameConfig,
    pub players: Vec<Player>,
    pub payload: Option<RoundPayload>,
    pub selection: Vec<usize>,
    pub found: Vec<FoundEquation>,
    pub rounds_recorded: usize,
    pub round_remaining: u32,
    pub guess_remaining: u32,
    pub round_clock_running: bool,
    pub guess_clock_running: bool,
    pub guessing: Option<PlayerId>,
    pub outcome: Option<Outcome>,
    pub transitioning: bool,
}

impl GameSnapshot {
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Number of valid equations in the current round.
    pub fn valid_count(&self) -> usize {
        self.payload
            .as_ref()
            .map_or(0, |p| p.valid_equations.len())
    }

    /// Players ordered by score, highest first; ties keep seat order.
    pub fn ranking(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        ranked
    }

    /// Sole highest scorer, if there is no tie for first.
    pub fn winner(&self) -> Option<&Player> {
        let ranked = self.ranking();
        match ranked.as_slice() {
            [first, second, ..] if first.score == second.score => None,
            [first, ..] => Some(first),
            [] => None,
        }
    }

    /// Whether any clock is counting down.
    pub fn clock_running(&self) -> bool {
        self.round_clock_running || self.guess_clock_running
    }
}

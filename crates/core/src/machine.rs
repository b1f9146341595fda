//! Game machine - the authoritative session state and its transitions
//!
//! The machine is a reducer. User commands go through [`GameMachine::apply`],
//! scheduled continuations come back through [`GameMachine::wake`], and both
//! return the [`Effects`] the driver must carry out. The machine itself never
//! sleeps, spawns, or reads a clock.
//!
//! # Phases
//!
//! | From | Event | To |
//! |------|-------|----|
//! | menu, gameOver | `Start` | config |
//! | config | `StartGame` | game |
//! | game | `StartGuessing` | guessing |
//! | guessing | 3rd tile / guess clock expiry | showingResult |
//! | showingResult | `ResolveOutcome` wake | game or roundOver |
//! | game | round clock expiry | roundOver |
//! | roundOver, config | `NextRound` | game (after `BeginRound`) or gameOver |
//! | roundOver, gameOver | `ContinueGame` | config |
//! | any | `ExitToMenu` | menu |
//!
//! Commands that do not apply to the current phase are ignored.
//!
//! # Wakes
//!
//! Every armed clock carries an epoch and every deferred continuation a token.
//! A wake whose epoch or token no longer matches is stale and does nothing, so
//! a driver may deliver late wakes after a cancel without harm.

use arrayvec::ArrayVec;
use log::{debug, info};

use crate::countdown::{Countdown, Tick};
use crate::evaluator::{evaluate, Evaluation};
use crate::generator::RoundGenerator;
use crate::snapshot::GameSnapshot;
use crate::types::{
    roster, Clock, Command, EquationKey, FoundEquation, GameConfig, Phase, Player, PlayerId,
    Resolution, RoundHistoryEntry, RoundPayload, GUESS_DURATION_SECS, INITIAL_PLAYERS,
    RESULT_DISPLAY_MS, ROUND_DURATION_SECS, ROUND_TRANSITION_MS, TILES_PER_EQUATION, TILE_COUNT,
};

/// Upper bound on effects produced by one command or wake.
pub const MAX_EFFECTS: usize = 8;

/// Instruction for whoever drives the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `Wake::Tick { clock, epoch }` every clock period until disarmed,
    /// replacing any earlier schedule for the same clock.
    ArmClock { clock: Clock, epoch: u32 },
    /// Stop delivering ticks for `clock`.
    DisarmClock(Clock),
    /// Deliver `Wake::Deferred { token }` once, after `delay_ms`.
    Defer { token: u64, delay_ms: u32 },
    /// Drop the deferred wake for `token` if it has not fired.
    CancelDeferred { token: u64 },
}

pub type Effects = ArrayVec<Effect, MAX_EFFECTS>;

/// Scheduled input coming back to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wake {
    Tick { clock: Clock, epoch: u32 },
    Deferred { token: u64 },
}

/// What an outstanding deferred continuation will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredKind {
    /// Finalize the shown outcome and resume or end the round.
    ResolveOutcome,
    /// Deal the next round and restart its clock.
    BeginRound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    token: u64,
    kind: DeferredKind,
}

/// The judged result of one submission or guess timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub player: PlayerId,
    /// Tiles in selection order. `None` for a timeout.
    pub key: Option<EquationKey>,
    /// `None` for a timeout.
    pub evaluation: Option<Evaluation>,
    pub resolution: Resolution,
    settled: bool,
}

impl Outcome {
    /// Whether the score change for this outcome has been applied.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn is_timeout(&self) -> bool {
        self.resolution == Resolution::Timeout
    }
}

type Selection = ArrayVec<usize, TILES_PER_EQUATION>;

/// One local game session.
pub struct GameMachine<G> {
    generator: G,
    phase: Phase,
    config: GameConfig,
    players: Vec<Player>,
    payload: Option<RoundPayload>,
    selection: Selection,
    found: Vec<FoundEquation>,
    history: Vec<RoundHistoryEntry>,
    guessing: Option<PlayerId>,
    outcome: Option<Outcome>,
    clocks: [Countdown; 2],
    pending: Option<Pending>,
    next_token: u64,
}

impl<G: RoundGenerator> GameMachine<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            phase: Phase::Menu,
            config: GameConfig::default(),
            players: roster(INITIAL_PLAYERS),
            payload: None,
            selection: Selection::new(),
            found: Vec::new(),
            history: Vec::new(),
            guessing: None,
            outcome: None,
            clocks: [
                Countdown::new(ROUND_DURATION_SECS),
                Countdown::new(GUESS_DURATION_SECS),
            ],
            pending: None,
            next_token: 1,
        }
    }

    // ========== Accessors ==========

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn payload(&self) -> Option<&RoundPayload> {
        self.payload.as_ref()
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn found_equations(&self) -> &[FoundEquation] {
        &self.found
    }

    pub fn history(&self) -> &[RoundHistoryEntry] {
        &self.history
    }

    pub fn guessing_player(&self) -> Option<PlayerId> {
        self.guessing
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn clock(&self, clock: Clock) -> &Countdown {
        &self.clocks[clock.index()]
    }

    /// Token and kind of the outstanding deferred continuation, if any.
    pub fn pending_deferred(&self) -> Option<(u64, DeferredKind)> {
        self.pending.map(|p| (p.token, p.kind))
    }

    /// True while a `NextRound` is waiting to deal the new board.
    pub fn is_transitioning(&self) -> bool {
        matches!(
            self.pending,
            Some(Pending {
                kind: DeferredKind::BeginRound,
                ..
            })
        )
    }

    /// True once every valid equation of the current round has been found.
    pub fn is_round_complete(&self) -> bool {
        self.payload
            .as_ref()
            .is_some_and(|p| self.found.len() >= p.valid_equations.len())
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut out = GameSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    /// Fill `out` in place, reusing its allocations.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.phase = self.phase;
        out.config = self.config;
        out.players.clone_from(&self.players);
        out.payload.clone_from(&self.payload);
        out.selection.clear();
        out.selection.extend_from_slice(&self.selection);
        out.found.clone_from(&self.found);
        out.rounds_recorded = self.history.len();
        out.round_remaining = self.clock(Clock::Round).remaining();
        out.guess_remaining = self.clock(Clock::Guess).remaining();
        out.round_clock_running = self.clock(Clock::Round).is_armed();
        out.guess_clock_running = self.clock(Clock::Guess).is_armed();
        out.guessing = self.guessing;
        out.outcome = self.outcome;
        out.transitioning = self.is_transitioning();
    }

    // ========== Commands ==========

    pub fn apply(&mut self, command: Command) -> Effects {
        let mut fx = Effects::new();
        match command {
            Command::Start => self.start(),
            Command::UpdateConfig(update) => {
                self.config.apply(update);
                debug!(
                    "config: {} players, {} rounds",
                    self.config.num_players, self.config.num_rounds
                );
            }
            Command::StartGame => self.start_game(&mut fx),
            Command::StartGuessing(player) => self.start_guessing(player, &mut fx),
            Command::SelectTile(index) => self.select_tile(index, &mut fx),
            Command::NextRound => self.next_round(&mut fx),
            Command::ContinueGame => self.continue_game(&mut fx),
            Command::ExitToMenu => self.exit_to_menu(&mut fx),
        }
        fx
    }

    fn ignore(&self, command: &str) {
        debug!("ignored {} in {}", command, self.phase);
    }

    fn start(&mut self) {
        match self.phase {
            Phase::Menu | Phase::GameOver => {
                self.config.current_round = 0;
                self.set_phase(Phase::Config);
            }
            _ => self.ignore("start"),
        }
    }

    fn start_game(&mut self, fx: &mut Effects) {
        if self.phase != Phase::Config {
            return self.ignore("startGame");
        }
        self.cancel_pending(fx);
        self.stop_clock(Clock::Guess, fx);

        self.config.current_round = 1;
        self.payload = Some(self.generator.generate());
        self.players = roster(self.config.num_players);
        self.history.clear();
        self.clear_round_state();
        for clock in &mut self.clocks {
            clock.reset();
        }

        self.set_phase(Phase::Game);
        self.start_clock(Clock::Round, fx);
        info!(
            "game started: {} players, {} rounds",
            self.config.num_players, self.config.num_rounds
        );
    }

    fn start_guessing(&mut self, player: PlayerId, fx: &mut Effects) {
        if self.phase != Phase::Game
            || self.is_transitioning()
            || self.payload.is_none()
            || self.player(player).is_none()
        {
            return self.ignore("startGuessing");
        }
        self.stop_clock(Clock::Round, fx);
        self.clocks[Clock::Guess.index()].reset();
        self.start_clock(Clock::Guess, fx);

        self.selection.clear();
        self.guessing = Some(player);
        self.set_phase(Phase::Guessing);
    }

    fn select_tile(&mut self, index: usize, fx: &mut Effects) {
        let Some(player) = self.guessing else {
            return self.ignore("selectTile");
        };
        if self.phase != Phase::Guessing
            || self.payload.is_none()
            || index >= TILE_COUNT
            || self.selection.contains(&index)
            || self.selection.is_full()
        {
            return self.ignore("selectTile");
        }

        self.selection.push(index);
        if self.selection.is_full() {
            self.submit(player, fx);
        }
    }

    fn submit(&mut self, player: PlayerId, fx: &mut Effects) {
        let Some(payload) = self.payload.as_ref() else {
            return;
        };
        let Ok(indices) = <[usize; TILES_PER_EQUATION]>::try_from(self.selection.as_slice()) else {
            return;
        };
        let key = EquationKey::new(indices);
        let Some(tiles) = payload.triple(key) else {
            return;
        };

        let evaluation = evaluate(&tiles);
        let resolution = if self.found.iter().any(|f| f.key == key) {
            Resolution::Duplicate
        } else if evaluation.matches(payload.target) {
            Resolution::Correct
        } else {
            Resolution::Incorrect
        };
        debug!(
            "{} submitted {} = {}: {}",
            player,
            key.labels(),
            evaluation.display(),
            resolution.as_str()
        );

        self.stop_clock(Clock::Guess, fx);
        self.outcome = Some(Outcome {
            player,
            key: Some(key),
            evaluation: Some(evaluation),
            resolution,
            settled: false,
        });
        if resolution != Resolution::Incorrect {
            self.settle_outcome();
        }
        self.set_phase(Phase::ShowingResult);
        self.defer(DeferredKind::ResolveOutcome, RESULT_DISPLAY_MS, fx);
    }

    fn next_round(&mut self, fx: &mut Effects) {
        let allowed = match self.phase {
            Phase::RoundOver => true,
            Phase::Config => self.config.current_round >= 1,
            _ => false,
        };
        if !allowed || self.is_transitioning() {
            return self.ignore("nextRound");
        }

        self.record_history();
        if self.config.current_round >= self.config.num_rounds {
            self.stop_clock(Clock::Round, fx);
            self.stop_clock(Clock::Guess, fx);
            self.set_phase(Phase::GameOver);
            info!("game over after {} rounds", self.config.current_round);
        } else {
            self.set_phase(Phase::Game);
            self.defer(DeferredKind::BeginRound, ROUND_TRANSITION_MS, fx);
        }
    }

    fn continue_game(&mut self, fx: &mut Effects) {
        if !matches!(self.phase, Phase::RoundOver | Phase::GameOver) {
            return self.ignore("continueGame");
        }
        self.cancel_pending(fx);
        self.stop_clock(Clock::Round, fx);
        self.stop_clock(Clock::Guess, fx);
        self.config.current_round = 0;
        self.set_phase(Phase::Config);
    }

    fn exit_to_menu(&mut self, fx: &mut Effects) {
        self.cancel_pending(fx);
        for clock in Clock::ALL {
            self.clocks[clock.index()].stop();
            fx.push(Effect::DisarmClock(clock));
        }

        self.config = GameConfig::default();
        self.players = roster(INITIAL_PLAYERS);
        self.payload = None;
        self.history.clear();
        self.clear_round_state();
        for clock in &mut self.clocks {
            clock.reset();
        }
        self.set_phase(Phase::Menu);
    }

    // ========== Wakes ==========

    pub fn wake(&mut self, wake: Wake) -> Effects {
        let mut fx = Effects::new();
        match wake {
            Wake::Tick { clock, epoch } => match self.clocks[clock.index()].tick(epoch) {
                Tick::Ignored => debug!("stale {:?} tick (epoch {})", clock, epoch),
                Tick::Running(_) => {}
                Tick::Expired => {
                    fx.push(Effect::DisarmClock(clock));
                    match clock {
                        Clock::Round => self.on_round_expired(&mut fx),
                        Clock::Guess => self.on_guess_expired(&mut fx),
                    }
                }
            },
            Wake::Deferred { token } => match self.pending {
                Some(pending) if pending.token == token => {
                    self.pending = None;
                    match pending.kind {
                        DeferredKind::ResolveOutcome => self.resolve_outcome(&mut fx),
                        DeferredKind::BeginRound => self.begin_round(&mut fx),
                    }
                }
                _ => debug!("stale deferred wake (token {})", token),
            },
        }
        fx
    }

    fn on_round_expired(&mut self, fx: &mut Effects) {
        if self.phase == Phase::Game {
            info!("round {} timed out", self.config.current_round);
            self.end_round(fx);
        } else {
            debug!("round clock expired in {}", self.phase);
        }
    }

    fn on_guess_expired(&mut self, fx: &mut Effects) {
        let Some(player) = self.guessing.filter(|_| self.phase == Phase::Guessing) else {
            debug!("guess clock expired in {}", self.phase);
            return;
        };
        debug!("{} ran out of time", player);
        self.outcome = Some(Outcome {
            player,
            key: None,
            evaluation: None,
            resolution: Resolution::Timeout,
            settled: false,
        });
        self.settle_outcome();
        self.set_phase(Phase::ShowingResult);
        self.defer(DeferredKind::ResolveOutcome, RESULT_DISPLAY_MS, fx);
    }

    /// Submission finalizer: settle if still outstanding, clear the guess,
    /// then resume the round or end it.
    fn resolve_outcome(&mut self, fx: &mut Effects) {
        if self.phase != Phase::ShowingResult {
            debug!("outcome resolve in {}", self.phase);
            return;
        }
        self.settle_outcome();
        self.selection.clear();
        self.guessing = None;
        self.outcome = None;

        if self.is_round_complete() {
            info!("round {} complete", self.config.current_round);
            self.end_round(fx);
        } else {
            self.set_phase(Phase::Game);
            self.start_clock(Clock::Round, fx);
        }
    }

    fn begin_round(&mut self, fx: &mut Effects) {
        self.config.current_round = self.config.current_round.saturating_add(1);
        self.payload = Some(self.generator.generate());
        self.clear_round_state();
        for clock in &mut self.clocks {
            clock.reset();
        }
        self.set_phase(Phase::Game);
        self.start_clock(Clock::Round, fx);
        info!(
            "round {}/{} started",
            self.config.current_round, self.config.num_rounds
        );
    }

    // ========== Helpers ==========

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!("phase {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn start_clock(&mut self, clock: Clock, fx: &mut Effects) {
        let epoch = self.clocks[clock.index()].start();
        fx.push(Effect::ArmClock { clock, epoch });
    }

    fn stop_clock(&mut self, clock: Clock, fx: &mut Effects) {
        if self.clocks[clock.index()].stop() {
            fx.push(Effect::DisarmClock(clock));
        }
    }

    fn defer(&mut self, kind: DeferredKind, delay_ms: u32, fx: &mut Effects) {
        self.cancel_pending(fx);
        let token = self.next_token;
        self.next_token += 1;
        self.pending = Some(Pending { token, kind });
        fx.push(Effect::Defer { token, delay_ms });
    }

    fn cancel_pending(&mut self, fx: &mut Effects) {
        if let Some(pending) = self.pending.take() {
            fx.push(Effect::CancelDeferred {
                token: pending.token,
            });
        }
    }

    fn clear_round_state(&mut self) {
        self.selection.clear();
        self.found.clear();
        self.guessing = None;
        self.outcome = None;
    }

    /// Apply the outcome's score change if it has not been applied yet.
    fn settle_outcome(&mut self) {
        let Some(outcome) = self.outcome.as_mut() else {
            return;
        };
        if outcome.settled {
            return;
        }
        outcome.settled = true;
        let Outcome {
            player,
            key,
            resolution,
            ..
        } = *outcome;

        if let (Resolution::Correct, Some(key)) = (resolution, key) {
            self.found.push(FoundEquation {
                key,
                found_by: player,
            });
        }
        if let Some(p) = self.players.iter_mut().find(|p| p.id == player) {
            if resolution.score_delta() > 0 {
                p.award();
            } else {
                p.deduct();
            }
        }
    }

    fn end_round(&mut self, fx: &mut Effects) {
        self.stop_clock(Clock::Round, fx);
        self.stop_clock(Clock::Guess, fx);
        self.record_history();
        self.set_phase(Phase::RoundOver);
    }

    /// Append the current round to history unless it is already there.
    fn record_history(&mut self) {
        let round_number = self.config.current_round;
        let Some(payload) = self.payload.as_ref() else {
            return;
        };
        if round_number == 0 || self.history.iter().any(|h| h.round_number == round_number) {
            return;
        }
        self.history.push(RoundHistoryEntry {
            round_number,
            payload: payload.clone(),
            found_equations: self.found.clone(),
            scores: self.players.iter().map(|p| (p.id, p.score)).collect(),
        });
    }
}

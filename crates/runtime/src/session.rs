//! Session - a game machine wired to a scheduler.
//!
//! The session is the only place where [`Effect`]s turn into scheduled
//! tasks. It keeps at most one repeating task per clock and one deferred
//! task, cancelling the previous one before replacing it.

use std::time::Duration;

use log::trace;

use tui_target_core::types::{Clock, Command, CLOCK_PERIOD_MS};
use tui_target_core::{Effect, Effects, GameMachine, GameSnapshot, RoundGenerator, Wake};

use crate::scheduler::{ManualScheduler, ScheduledTask, Scheduler};

pub struct Session<G, S: Scheduler> {
    machine: GameMachine<G>,
    scheduler: S,
    clocks: [Option<S::Task>; 2],
    deferred: Option<(u64, S::Task)>,
}

impl<G: RoundGenerator, S: Scheduler> Session<G, S> {
    pub fn new(machine: GameMachine<G>, scheduler: S) -> Self {
        Self {
            machine,
            scheduler,
            clocks: [None, None],
            deferred: None,
        }
    }

    pub fn machine(&self) -> &GameMachine<G> {
        &self.machine
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.machine.snapshot()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.machine.snapshot_into(out);
    }

    /// Apply a user command and schedule whatever it asks for.
    pub fn dispatch(&mut self, command: Command) {
        let effects = self.machine.apply(command);
        self.execute(&effects);
    }

    /// Hand a scheduled wake back to the machine.
    pub fn deliver(&mut self, wake: Wake) {
        let effects = self.machine.wake(wake);
        self.execute(&effects);
    }

    /// Whether a tick task is live for `clock`.
    pub fn clock_scheduled(&self, clock: Clock) -> bool {
        self.clocks[clock.index()]
            .as_ref()
            .is_some_and(|task| task.is_pending())
    }

    /// Whether a deferred task is live.
    pub fn deferred_scheduled(&self) -> bool {
        self.deferred
            .as_ref()
            .is_some_and(|(_, task)| task.is_pending())
    }

    fn execute(&mut self, effects: &Effects) {
        for effect in effects {
            trace!("effect {:?}", effect);
            match *effect {
                Effect::ArmClock { clock, epoch } => {
                    self.cancel_clock(clock);
                    let task = self.scheduler.schedule_repeating(
                        Duration::from_millis(u64::from(CLOCK_PERIOD_MS)),
                        Wake::Tick { clock, epoch },
                    );
                    self.clocks[clock.index()] = Some(task);
                }
                Effect::DisarmClock(clock) => self.cancel_clock(clock),
                Effect::Defer { token, delay_ms } => {
                    if let Some((_, mut task)) = self.deferred.take() {
                        task.cancel();
                    }
                    let task = self.scheduler.schedule_once(
                        Duration::from_millis(u64::from(delay_ms)),
                        Wake::Deferred { token },
                    );
                    self.deferred = Some((token, task));
                }
                Effect::CancelDeferred { token } => {
                    if matches!(self.deferred, Some((t, _)) if t == token) {
                        if let Some((_, mut task)) = self.deferred.take() {
                            task.cancel();
                        }
                    }
                }
            }
        }
    }

    fn cancel_clock(&mut self, clock: Clock) {
        if let Some(mut task) = self.clocks[clock.index()].take() {
            task.cancel();
        }
    }
}

impl<G: RoundGenerator> Session<G, ManualScheduler> {
    pub fn manual(machine: GameMachine<G>) -> Self {
        Self::new(machine, ManualScheduler::new())
    }

    /// Move virtual time forward by `ms`, delivering every wake that falls
    /// due on the way, including ones scheduled while delivering.
    pub fn advance(&mut self, ms: u64) {
        let until = self.scheduler.now_ms() + ms;
        while let Some(wake) = self.scheduler.pop_due(until) {
            self.deliver(wake);
        }
        self.scheduler.set_now(until);
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }
}

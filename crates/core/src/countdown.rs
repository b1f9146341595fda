//! Countdown clock - whole-unit countdown with epoch-guarded ticks
//!
//! A countdown never measures time itself. Whoever drives it delivers one
//! [`Countdown::tick`] per elapsed unit, tagged with the epoch returned by the
//! [`Countdown::start`] call that armed it. Ticks carrying any other epoch are
//! stale (the clock was stopped or restarted since) and change nothing.

/// Result of delivering one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Stale epoch, or the clock is not armed.
    Ignored,
    /// One unit elapsed; this many remain.
    Running(u32),
    /// Reached zero on this tick. The clock is now disarmed.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
    armed: bool,
    epoch: u32,
}

impl Countdown {
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            remaining: duration,
            armed: false,
            epoch: 0,
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Restore the full duration. Does not change whether the clock is armed.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }

    /// Arm from the current remaining value and return the new epoch.
    ///
    /// Any tick scheduled under an earlier epoch becomes stale.
    pub fn start(&mut self) -> u32 {
        self.epoch = self.epoch.wrapping_add(1);
        self.armed = true;
        self.epoch
    }

    /// Disarm, keeping the remaining value. Returns whether it was armed.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.armed, false)
    }

    pub fn tick(&mut self, epoch: u32) -> Tick {
        if !self.armed || epoch != self.epoch {
            return Tick::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.armed = false;
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_exactly_once_at_zero() {
        let mut clock = Countdown::new(3);
        let epoch = clock.start();
        assert_eq!(clock.tick(epoch), Tick::Running(2));
        assert_eq!(clock.tick(epoch), Tick::Running(1));
        assert_eq!(clock.tick(epoch), Tick::Expired);
        assert!(!clock.is_armed());
        assert_eq!(clock.tick(epoch), Tick::Ignored);
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn stale_epoch_is_ignored() {
        let mut clock = Countdown::new(5);
        let old = clock.start();
        clock.stop();
        let new = clock.start();
        assert_ne!(old, new);
        assert_eq!(clock.tick(old), Tick::Ignored);
        assert_eq!(clock.remaining(), 5);
        assert_eq!(clock.tick(new), Tick::Running(4));
    }

    #[test]
    fn stop_keeps_remaining_and_restart_resumes() {
        let mut clock = Countdown::new(10);
        let epoch = clock.start();
        clock.tick(epoch);
        clock.tick(epoch);
        assert!(clock.stop());
        assert!(!clock.stop());
        assert_eq!(clock.tick(epoch), Tick::Ignored);

        let epoch = clock.start();
        assert_eq!(clock.tick(epoch), Tick::Running(7));
    }

    #[test]
    fn reset_restores_duration_without_arming() {
        let mut clock = Countdown::new(4);
        let epoch = clock.start();
        clock.tick(epoch);
        clock.stop();
        clock.reset();
        assert_eq!(clock.remaining(), 4);
        assert!(!clock.is_armed());
    }

    #[test]
    fn zero_duration_expires_on_first_tick() {
        let mut clock = Countdown::new(0);
        let epoch = clock.start();
        assert_eq!(clock.tick(epoch), Tick::Expired);
    }
}

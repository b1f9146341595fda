//! Scheduling seam between the game machine and real (or virtual) time.
//!
//! The machine asks for ticks and deferred wakes through [`Effect`]s; a
//! [`Scheduler`] turns those into tasks that later hand a [`Wake`] back.
//! [`ManualScheduler`] keeps a virtual millisecond clock for tests and
//! headless runs. The tokio-backed scheduler lives in [`crate::realtime`].
//!
//! [`Effect`]: tui_target_core::Effect

use std::cell::Cell;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::Duration;

use tui_target_core::Wake;

/// Handle to something scheduled.
pub trait ScheduledTask {
    /// Guarantee the task delivers nothing further. Idempotent.
    fn cancel(&mut self);
    /// True until the task has fired (one-shot) or been cancelled.
    fn is_pending(&self) -> bool;
}

pub trait Scheduler {
    type Task: ScheduledTask;

    /// Deliver `wake` once after `delay`.
    fn schedule_once(&mut self, delay: Duration, wake: Wake) -> Self::Task;

    /// Deliver `wake` every `period`, first after one period.
    fn schedule_repeating(&mut self, period: Duration, wake: Wake) -> Self::Task;
}

#[derive(Debug, Default)]
struct TaskState {
    cancelled: Cell<bool>,
    fired: Cell<bool>,
}

#[derive(Debug, Clone)]
pub struct ManualTask {
    state: Rc<TaskState>,
}

impl ScheduledTask for ManualTask {
    fn cancel(&mut self) {
        self.state.cancelled.set(true);
    }

    fn is_pending(&self) -> bool {
        !self.state.cancelled.get() && !self.state.fired.get()
    }
}

#[derive(Debug)]
struct Entry {
    due_ms: u64,
    seq: u64,
    period_ms: Option<u64>,
    wake: Wake,
    state: Rc<TaskState>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        (self.due_ms, self.seq) == (other.due_ms, other.seq)
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

/// Virtual-time scheduler.
///
/// Nothing fires on its own; [`ManualScheduler::pop_due`] releases wakes whose
/// due time is within a horizon, earliest first, ties in scheduling order.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time in milliseconds since creation.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Tasks that can still fire.
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|Reverse(e)| !e.state.cancelled.get())
            .count()
    }

    /// Next wake due at or before `until_ms`, moving virtual time to its due
    /// time. Repeating tasks are re-queued one period later.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Wake> {
        loop {
            let due = self.queue.peek()?.0.due_ms;
            if due > until_ms {
                return None;
            }
            let Reverse(entry) = self.queue.pop()?;
            if entry.state.cancelled.get() {
                continue;
            }
            self.now_ms = self.now_ms.max(entry.due_ms);
            match entry.period_ms {
                Some(period) => {
                    let seq = self.bump_seq();
                    self.queue.push(Reverse(Entry {
                        due_ms: entry.due_ms + period,
                        seq,
                        ..entry
                    }));
                }
                None => entry.state.fired.set(true),
            }
            return Some(entry.wake);
        }
    }

    /// Move virtual time forward without delivering anything.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>, wake: Wake) -> ManualTask {
        let state = Rc::new(TaskState::default());
        let seq = self.bump_seq();
        self.queue.push(Reverse(Entry {
            due_ms: self.now_ms + millis(delay),
            seq,
            period_ms: period.map(|p| millis(p).max(1)),
            wake,
            state: Rc::clone(&state),
        }));
        ManualTask { state }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Scheduler for ManualScheduler {
    type Task = ManualTask;

    fn schedule_once(&mut self, delay: Duration, wake: Wake) -> ManualTask {
        self.push(delay, None, wake)
    }

    fn schedule_repeating(&mut self, period: Duration, wake: Wake) -> ManualTask {
        self.push(period, Some(period), wake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_target_core::types::Clock;

    fn tick(epoch: u32) -> Wake {
        Wake::Tick {
            clock: Clock::Round,
            epoch,
        }
    }

    #[test]
    fn releases_in_due_order_then_insertion_order() {
        let mut s = ManualScheduler::new();
        s.schedule_once(Duration::from_millis(30), Wake::Deferred { token: 3 });
        s.schedule_once(Duration::from_millis(10), Wake::Deferred { token: 1 });
        s.schedule_once(Duration::from_millis(10), Wake::Deferred { token: 2 });

        assert_eq!(s.pop_due(5), None);
        assert_eq!(s.pop_due(100), Some(Wake::Deferred { token: 1 }));
        assert_eq!(s.pop_due(100), Some(Wake::Deferred { token: 2 }));
        assert_eq!(s.now_ms(), 10);
        assert_eq!(s.pop_due(100), Some(Wake::Deferred { token: 3 }));
        assert_eq!(s.pop_due(100), None);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut s = ManualScheduler::new();
        let mut task = s.schedule_once(Duration::from_millis(10), Wake::Deferred { token: 1 });
        assert!(task.is_pending());
        task.cancel();
        task.cancel();
        assert!(!task.is_pending());
        assert_eq!(s.pending(), 0);
        assert_eq!(s.pop_due(1_000), None);
    }

    #[test]
    fn one_shot_is_not_pending_after_firing() {
        let mut s = ManualScheduler::new();
        let task = s.schedule_once(Duration::from_millis(10), Wake::Deferred { token: 1 });
        s.pop_due(10);
        assert!(!task.is_pending());
    }

    #[test]
    fn repeating_task_fires_every_period() {
        let mut s = ManualScheduler::new();
        let mut task = s.schedule_repeating(Duration::from_millis(1000), tick(1));
        let mut fired = 0;
        while s.pop_due(3_500).is_some() {
            fired += 1;
        }
        assert_eq!(fired, 3);
        assert!(task.is_pending());

        task.cancel();
        assert_eq!(s.pop_due(10_000), None);
    }
}

//! Real-time scheduling on a tokio runtime.
//!
//! Bridges the sync game loop with async timers: every scheduled task is a
//! tokio task that sleeps and then sends its [`Wake`] over an unbounded
//! channel. The game loop drains the channel with [`Realtime::try_recv`]
//! between frames.

use std::io;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use tui_target_core::Wake;

use crate::scheduler::{ScheduledTask, Scheduler};

#[derive(Debug)]
pub struct TokioTask {
    handle: JoinHandle<()>,
    cancelled: bool,
}

impl ScheduledTask for TokioTask {
    fn cancel(&mut self) {
        self.cancelled = true;
        self.handle.abort();
    }

    fn is_pending(&self) -> bool {
        !self.cancelled && !self.handle.is_finished()
    }
}

/// Scheduler that spawns onto a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
    tx: mpsc::UnboundedSender<Wake>,
}

impl TokioScheduler {
    pub fn new(handle: Handle, tx: mpsc::UnboundedSender<Wake>) -> Self {
        Self { handle, tx }
    }
}

impl Scheduler for TokioScheduler {
    type Task = TokioTask;

    fn schedule_once(&mut self, delay: Duration, wake: Wake) -> TokioTask {
        let tx = self.tx.clone();
        let handle = self.handle.spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(wake);
        });
        TokioTask {
            handle,
            cancelled: false,
        }
    }

    fn schedule_repeating(&mut self, period: Duration, wake: Wake) -> TokioTask {
        let tx = self.tx.clone();
        let handle = self.handle.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(wake).is_err() {
                    break;
                }
            }
        });
        TokioTask {
            handle,
            cancelled: false,
        }
    }
}

/// Owns the runtime and the receiving end of the wake channel.
pub struct Realtime {
    _rt: Runtime,
    scheduler: TokioScheduler,
    rx: mpsc::UnboundedReceiver<Wake>,
}

impl Realtime {
    pub fn start() -> io::Result<Self> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("tui-target-timers")
            .enable_time()
            .build()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(rt.handle().clone(), tx);
        Ok(Self {
            _rt: rt,
            scheduler,
            rx,
        })
    }

    /// A scheduler whose wakes arrive at this instance.
    pub fn scheduler(&self) -> TokioScheduler {
        self.scheduler.clone()
    }

    pub fn try_recv(&mut self) -> Option<Wake> {
        self.rx.try_recv().ok()
    }
}

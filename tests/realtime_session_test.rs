//! A session wired to the tokio scheduler, with paused time.

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tui_target::core::{tutorial_board, GameMachine, ScriptedRoundGenerator};
use tui_target::runtime::{Session, TokioScheduler};
use tui_target::types::{Clock, Command, Phase, PlayerId, Resolution, GUESS_DURATION_SECS};

#[tokio::test(start_paused = true)]
async fn guess_timeout_resolves_on_tokio_timers() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let scheduler = TokioScheduler::new(Handle::current(), tx);
    let machine = GameMachine::new(ScriptedRoundGenerator::repeat(tutorial_board()));
    let mut session = Session::new(machine, scheduler);

    session.dispatch(Command::Start);
    session.dispatch(Command::StartGame);
    session.dispatch(Command::StartGuessing(PlayerId::new(1)));

    let start = tokio::time::Instant::now();
    while session.machine().phase() == Phase::Guessing {
        let wake = rx.recv().await.expect("scheduler alive");
        session.deliver(wake);
    }
    assert!(start.elapsed().as_secs() >= u64::from(GUESS_DURATION_SECS));
    assert_eq!(
        session.machine().outcome().map(|o| o.resolution),
        Some(Resolution::Timeout)
    );

    while session.machine().phase() == Phase::ShowingResult {
        let wake = rx.recv().await.expect("scheduler alive");
        session.deliver(wake);
    }
    assert_eq!(session.machine().phase(), Phase::Game);
    assert!(session.clock_scheduled(Clock::Round));
    assert!(!session.clock_scheduled(Clock::Guess));
}

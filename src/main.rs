//! Terminal target-number game (default binary).
//!
//! Sync frame loop: drain timer wakes, render, poll crossterm for one frame.
//! Timers run on a small tokio runtime owned by [`Realtime`].

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::{info, warn};

use tui_target::core::{GameMachine, GameSnapshot, RandomRoundGenerator, Tutorial, TutorialProgress};
use tui_target::input::{handle_key_event, handle_tutorial_key, TutorialAction, UiAction};
use tui_target::runtime::{logging, AudioPreference, FileStore, Realtime, RuntimeConfig, Session};
use tui_target::term::{FrameBuffer, GameView, StatusView, TerminalRenderer, TutorialView, Viewport};
use tui_target::types::Command;

fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();
    if let Err(e) = logging::init(config.log_path.as_deref()) {
        eprintln!("logging disabled: {e}");
    }
    info!("starting, seed {}", config.seed);

    let realtime = Realtime::start().context("failed to start timer runtime")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, realtime, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(e) = &result {
        warn!("exiting with error: {e:#}");
    }
    result
}

fn run(term: &mut TerminalRenderer, mut realtime: Realtime, config: &RuntimeConfig) -> Result<()> {
    let machine = GameMachine::new(RandomRoundGenerator::new(config.seed));
    let mut session = Session::new(machine, realtime.scheduler());
    let mut audio = AudioPreference::load(FileStore::new(&config.prefs_path));
    let mut tutorial = Tutorial::new();

    let game_view = GameView::new();
    let tutorial_view = TutorialView::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let mut outcome_seen = false;

    loop {
        while let Some(wake) = realtime.try_recv() {
            session.deliver(wake);
        }
        session.snapshot_into(&mut snap);

        // Audio cue: one bell when an outcome appears.
        let showing = snap.outcome.is_some();
        if showing && !outcome_seen && audio.is_enabled() {
            term.bell()?;
        }
        outcome_seen = showing;

        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        if tutorial.is_active() {
            tutorial_view.render_into(&tutorial, viewport, &mut fb);
        } else {
            let status = StatusView {
                audio_enabled: audio.is_enabled(),
            };
            game_view.render_into(&snap, &status, viewport, &mut fb);
        }
        term.draw_swap(&mut fb)?;

        // Input with timeout until next frame.
        if !event::poll(config.frame)? {
            continue;
        }
        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            Event::Resize(..) => {
                term.invalidate();
                continue;
            }
            _ => continue,
        };

        let action = if tutorial.is_active() {
            handle_tutorial_key(key)
        } else {
            handle_key_event(key, snap.phase)
        };
        let Some(action) = action else {
            continue;
        };

        match action {
            UiAction::Quit => return Ok(()),
            UiAction::OpenTutorial => tutorial.start(),
            UiAction::ToggleAudio => {
                let enabled = audio.toggle();
                info!("audio {}", if enabled { "on" } else { "off" });
            }
            UiAction::Tutorial(TutorialAction::Next) => {
                if tutorial.next() == TutorialProgress::Completed {
                    session.dispatch(Command::ExitToMenu);
                }
            }
            UiAction::Tutorial(TutorialAction::Previous) => tutorial.previous(),
            UiAction::Tutorial(TutorialAction::Skip) => {
                tutorial.exit();
                session.dispatch(Command::ExitToMenu);
            }
            UiAction::Tutorial(TutorialAction::Leave) => tutorial.exit_without_completion(),
            other => {
                if let Some(command) = other.command(&snap.config) {
                    session.dispatch(command);
                }
            }
        }
    }
}

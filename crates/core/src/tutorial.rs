//! Tutorial sequencer - a fixed five-step walkthrough
//!
//! Pure navigation state. Steps are numbered from 1. Advancing past the last
//! step completes the tutorial; the caller decides what happens next (the
//! terminal app returns to the menu).

use log::debug;

/// Part of the screen a step draws attention to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Tiles,
    Target,
    Score,
    Answers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialStep {
    pub id: u8,
    pub title: Option<&'static str>,
    pub content: &'static [&'static str],
    pub highlight: Option<Highlight>,
    pub show_tiles: bool,
    /// Tile indices shown as selected on the demo board.
    pub selected_tiles: &'static [usize],
    pub result: Option<i64>,
    pub equation: Option<&'static str>,
}

pub const TUTORIAL_STEPS: [TutorialStep; 5] = [
    TutorialStep {
        id: 1,
        title: None,
        content: &["Pick 3 tiles. Form an equation = target number"],
        highlight: Some(Highlight::Tiles),
        show_tiles: true,
        selected_tiles: &[],
        result: None,
        equation: None,
    },
    TutorialStep {
        id: 2,
        title: None,
        content: &["First tile's operator is ignored"],
        highlight: None,
        show_tiles: true,
        selected_tiles: &[0],
        result: None,
        equation: None,
    },
    TutorialStep {
        id: 3,
        title: None,
        content: &["× and ÷ before + and −"],
        highlight: None,
        show_tiles: true,
        selected_tiles: &[0, 8, 9],
        result: Some(11),
        equation: Some("1 + 2 × 5"),
    },
    TutorialStep {
        id: 4,
        title: Some("How to Score"),
        content: &[
            "Correct = +1",
            "Wrong = −1",
            "Already found = −1",
            "Too slow = −1",
        ],
        highlight: Some(Highlight::Score),
        show_tiles: false,
        selected_tiles: &[],
        result: None,
        equation: None,
    },
    TutorialStep {
        id: 5,
        title: Some("Pro Tips"),
        content: &[
            "2–5 answers per round",
            "3 minutes per round",
            "Order matters! ABC ≠ BAC",
        ],
        highlight: None,
        show_tiles: false,
        selected_tiles: &[],
        result: None,
        equation: None,
    },
];

/// What [`Tutorial::next`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialProgress {
    Advanced,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tutorial {
    current_step: u8,
    active: bool,
    completed: bool,
}

impl Default for Tutorial {
    fn default() -> Self {
        Self::new()
    }
}

impl Tutorial {
    pub fn new() -> Self {
        Self {
            current_step: 1,
            active: false,
            completed: false,
        }
    }

    pub fn step_count() -> u8 {
        TUTORIAL_STEPS.len() as u8
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn step(&self) -> &'static TutorialStep {
        let index = usize::from(self.current_step.max(1) - 1).min(TUTORIAL_STEPS.len() - 1);
        &TUTORIAL_STEPS[index]
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_completed(&self) -> bool {
        self.completed
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step >= Self::step_count()
    }

    pub fn start(&mut self) {
        self.active = true;
        self.current_step = 1;
    }

    pub fn next(&mut self) -> TutorialProgress {
        if self.current_step < Self::step_count() {
            self.current_step += 1;
            TutorialProgress::Advanced
        } else {
            self.active = false;
            self.completed = true;
            debug!("tutorial completed");
            TutorialProgress::Completed
        }
    }

    pub fn previous(&mut self) {
        if self.current_step > 1 {
            self.current_step -= 1;
        }
    }

    /// Leave and mark the tutorial as seen.
    pub fn exit(&mut self) {
        self.active = false;
        self.completed = true;
    }

    pub fn exit_without_completion(&mut self) {
        self.active = false;
    }

    pub fn reset(&mut self) {
        self.current_step = 1;
        self.active = false;
    }

    /// Jump to `step` (1-based). Out-of-range values are ignored.
    pub fn skip_to_step(&mut self, step: u8) -> bool {
        if (1..=Self::step_count()).contains(&step) {
            self.current_step = step;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_forward_to_completion() {
        let mut tutorial = Tutorial::new();
        tutorial.start();
        assert!(tutorial.is_active());
        for expected in 2..=5 {
            assert_eq!(tutorial.next(), TutorialProgress::Advanced);
            assert_eq!(tutorial.current_step(), expected);
        }
        assert_eq!(tutorial.next(), TutorialProgress::Completed);
        assert!(!tutorial.is_active());
        assert!(tutorial.has_completed());
        assert_eq!(tutorial.current_step(), 5);
    }

    #[test]
    fn previous_stops_at_first_step() {
        let mut tutorial = Tutorial::new();
        tutorial.start();
        tutorial.previous();
        assert_eq!(tutorial.current_step(), 1);
        tutorial.next();
        tutorial.previous();
        assert_eq!(tutorial.current_step(), 1);
    }

    #[test]
    fn exit_variants() {
        let mut tutorial = Tutorial::new();
        tutorial.start();
        tutorial.exit_without_completion();
        assert!(!tutorial.is_active());
        assert!(!tutorial.has_completed());

        tutorial.start();
        tutorial.exit();
        assert!(tutorial.has_completed());
    }

    #[test]
    fn skip_is_bounds_checked() {
        let mut tutorial = Tutorial::new();
        assert!(!tutorial.skip_to_step(0));
        assert!(!tutorial.skip_to_step(6));
        assert_eq!(tutorial.current_step(), 1);
        assert!(tutorial.skip_to_step(3));
        assert_eq!(tutorial.step().equation, Some("1 + 2 × 5"));
        assert_eq!(tutorial.step().selected_tiles, &[0, 8, 9]);
    }

    #[test]
    fn reset_returns_to_first_step_inactive() {
        let mut tutorial = Tutorial::new();
        tutorial.start();
        tutorial.skip_to_step(4);
        tutorial.reset();
        assert_eq!(tutorial.current_step(), 1);
        assert!(!tutorial.is_active());
    }

    #[test]
    fn start_restarts_from_step_one() {
        let mut tutorial = Tutorial::new();
        tutorial.start();
        tutorial.next();
        tutorial.next();
        tutorial.start();
        assert_eq!(tutorial.current_step(), 1);
    }
}

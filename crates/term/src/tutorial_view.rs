//! TutorialView: draws the current tutorial step over the demo board.

use crate::core::{tutorial_board, Highlight, Tutorial};
use crate::fb::{FrameBuffer, text_width};
use crate::game_view::{draw_tiles, palette, tile_grid_width, Viewport, TILE_H};
use crate::types::RoundPayload;

pub struct TutorialView {
    board: RoundPayload,
}

impl Default for TutorialView {
    fn default() -> Self {
        Self::new()
    }
}

impl TutorialView {
    pub fn new() -> Self {
        Self {
            board: tutorial_board(),
        }
    }

    pub fn render_into(&self, tutorial: &Tutorial, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(palette::TEXT.cell(' '));

        let step = tutorial.step();
        let mut y = 1;

        let counter = format!("How to play  {}/{}", tutorial.current_step(), Tutorial::step_count());
        fb.put_str_centered(y, &counter, palette::HINT);
        y += 2;

        if let Some(title) = step.title {
            fb.put_str_centered(y, title, palette::TITLE);
            y += 2;
        }

        if step.show_tiles {
            let target = format!("TARGET {}", self.board.target);
            let style = if step.highlight == Some(Highlight::Target) {
                palette::ACCENT
            } else {
                palette::TITLE
            };
            fb.put_str_centered(y, &target, style);
            y += 2;

            let x = fb.width().saturating_sub(tile_grid_width()) / 2;
            if step.highlight == Some(Highlight::Tiles) {
                let w = tile_grid_width() + 2;
                let h = 2 * (TILE_H + 1) + 1;
                fb.draw_box(x.saturating_sub(1), y.saturating_sub(1), w, h, palette::ACCENT);
            }
            draw_tiles(fb, x, y, &self.board.tiles, step.selected_tiles);
            y += 2 * (TILE_H + 1) + 1;
        }

        let content_style = if step.highlight == Some(Highlight::Score) {
            palette::ACCENT
        } else {
            palette::TEXT
        };
        let widest = step.content.iter().map(|l| text_width(l)).max().unwrap_or(0);
        let left = fb.width().saturating_sub(widest) / 2;
        for line in step.content {
            if step.content.len() > 1 {
                fb.put_str(left, y, line, content_style);
            } else {
                fb.put_str_centered(y, line, content_style);
            }
            y += 1;
        }

        if let (Some(equation), Some(result)) = (step.equation, step.result) {
            y += 1;
            let line = format!("{equation} = {result}");
            fb.put_str_centered(y, &line, palette::GOOD);
            y += 1;
        }

        y += 1;
        let hint = if tutorial.is_last_step() {
            "←  back   Enter  finish   Esc  leave"
        } else {
            "←  back   →  next   s  skip   Esc  leave"
        };
        fb.put_str_centered(y, hint, palette::HINT);
    }

    pub fn render(&self, tutorial: &Tutorial, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(tutorial, viewport, &mut fb);
        fb
    }
}

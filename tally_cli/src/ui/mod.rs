//! Ratatui views.
//!
//! # Layout
//! - `display` - previous/current readout
//! - `keypad` - key legend, with the function row in scientific mode
//! - `history_panel` - right side list of past computations (F3)
//! - `status_bar` - store location and status messages

pub mod display;
pub mod history_panel;
pub mod keypad;
pub mod status_bar;

use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;
use tally_core::KeyValueStore;

use crate::app::App;

/// Width of the history panel when shown
const HISTORY_WIDTH: u16 = 36;

pub fn render<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let palette = app.theme().palette();
    let area = frame.area();
    frame.render_widget(
        Block::new().style(Style::new().bg(palette.background).fg(palette.foreground)),
        area,
    );

    let [body, status] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let calc_area = if app.is_history_visible() {
        let [calc_area, history_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(HISTORY_WIDTH)]).areas(body);
        history_panel::render(frame, history_area, app, &palette);
        calc_area
    } else {
        body
    };

    let [display_area, keypad_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(calc_area);
    display::render(frame, display_area, app.calculator().display(), app.calculator().is_error(), &palette);
    keypad::render(frame, keypad_area, app.is_scientific(), &palette);
    status_bar::render(frame, status, app.store_label(), app.status(), &palette);
}

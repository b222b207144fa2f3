//! Terminal setup and the event loop.

use anyhow::Context;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use tally_core::KeyValueStore;

use crate::app::App;
use crate::ui;

/// Run the keypad until the user quits. The terminal is restored on every exit path.
pub fn run<S: KeyValueStore>(mut app: App<S>) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn event_loop<S: KeyValueStore>(terminal: &mut DefaultTerminal, app: &mut App<S>) -> anyhow::Result<()> {
    while !app.should_quit() {
        terminal
            .draw(|frame| ui::render(frame, app))
            .context("failed to draw")?;

        match event::read().context("failed to read terminal event")? {
            // Windows reports both press and release
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            _ => {}
        }
    }
    Ok(())
}

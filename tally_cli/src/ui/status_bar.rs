//! Status Bar (Bottom)
//!
//! Displays:
//! - Store location
//! - Status messages

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme::Palette;

/// Render the status bar
pub fn render(frame: &mut Frame, area: Rect, store_label: &str, status: &str, palette: &Palette) {
    let style = Style::new().bg(palette.highlight).fg(palette.foreground);
    let [left, right] = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);

    frame.render_widget(Paragraph::new(store_label.to_string()).style(style.fg(palette.muted)), left);
    frame.render_widget(
        Paragraph::new(status.to_string()).style(style).alignment(Alignment::Right),
        right,
    );
}

//! Calculator readout: the pending operation above the current operand.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use tally_core::Display;

use crate::theme::Palette;

pub fn render(frame: &mut Frame, area: Rect, display: Display, is_error: bool, palette: &Palette) {
    let current_color = if is_error { palette.error } else { palette.foreground };
    let lines = vec![
        Line::styled(display.previous, Style::new().fg(palette.muted)),
        Line::styled(
            display.current,
            Style::new().fg(current_color).add_modifier(Modifier::BOLD),
        ),
    ];

    let block = Block::bordered().border_style(Style::new().fg(palette.muted));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Right).block(block), area);
}

//! Key legend.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;

use crate::keymap::{SCIENTIFIC_KEYS, TOGGLE_SIGN_KEY};
use crate::theme::Palette;

const BASIC_KEYS: [(&str, &str); 8] = [
    ("0-9 .", "enter number"),
    ("+ - * / ^", "operator"),
    ("Enter =", "compute"),
    ("Backspace", "delete"),
    ("Esc", "clear"),
    ("Tab", "recall selected"),
    ("↑ ↓", "select history"),
    ("F5", "clear history"),
];

pub fn render(frame: &mut Frame, area: Rect, scientific: bool, palette: &Palette) {
    let key_style = Style::new().fg(palette.accent).add_modifier(Modifier::BOLD);
    let label_style = Style::new().fg(palette.muted);

    let mut lines: Vec<Line> = BASIC_KEYS
        .iter()
        .map(|(key, label)| legend_line(key, label, key_style, label_style))
        .collect();
    let sign_key = TOGGLE_SIGN_KEY.to_string();
    lines.push(legend_line(&sign_key, "±", key_style, label_style));

    if scientific {
        lines.push(Line::default());
        let mut row = Vec::new();
        for (key, _, label) in SCIENTIFIC_KEYS.iter() {
            row.push(Span::styled(key.to_string(), key_style));
            row.push(Span::styled(format!(" {}   ", label), label_style));
        }
        lines.push(Line::from(row));
    }

    let title = if scientific { " Scientific " } else { " Basic " };
    let block = Block::bordered()
        .title(title)
        .border_style(Style::new().fg(palette.muted));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn legend_line<'a>(key: &str, label: &'a str, key_style: Style, label_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:>10}", key), key_style),
        Span::styled(format!("  {}", label), label_style),
    ])
}

//! History list (newest first) with the selected row highlighted.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState};
use ratatui::Frame;
use tally_core::{HistoryStore, KeyValueStore};

use crate::app::App;
use crate::theme::Palette;

pub fn render<S: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<S>, palette: &Palette) {
    let entries = app.calculator().history().load_all();
    let block = Block::bordered()
        .title(format!(" History ({}) ", entries.len()))
        .border_style(Style::new().fg(palette.muted));

    if entries.is_empty() {
        let empty = List::new([ListItem::new(Span::styled("No history yet", Style::new().fg(palette.muted)))]);
        frame.render_widget(empty.block(block), area);
        return;
    }

    let items: Vec<ListItem> = entries
        .into_iter()
        .map(|entry| {
            ListItem::new(vec![
                Line::styled(entry.expression, Style::new().fg(palette.muted)),
                Line::styled(entry.result, Style::new().fg(palette.foreground).add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::new().bg(palette.highlight))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(app.selected());
    frame.render_stateful_widget(list, area, &mut state);
}

// Condition checklist rendering module
//
// Renders the scrollable list of conditions with a checkbox per entry,
// colored with the node's current display color.

use crate::app::AppState;
use crate::theme::{ACCENT, HIGHLIGHT_BG, MUTED, TEXT};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

/// Checkbox text for a condition
pub fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn render_conditions(f: &mut Frame, area: Rect, app: &mut AppState) {
    let store = app.engine.store();
    let mut items = Vec::with_capacity(store.nodes().len());

    for (idx, node) in store.nodes().iter().enumerate() {
        let checked = app.selection.contains(&node.id);
        let name_style = if node.active {
            Style::default().fg(node.color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT)
        };

        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("{:2}.", idx + 1), Style::default().fg(MUTED)),
            Span::styled(format!(" {} ", checkbox(checked)), Style::default().fg(ACCENT)),
            Span::styled(node.id.clone(), name_style),
            Span::styled(
                format!(" ({})", node.meta.pack_count),
                Style::default().fg(MUTED),
            ),
        ])));
    }

    let title = format!(
        "━ Conditions ({}/{}) ",
        app.selection.len(),
        store.nodes().len()
    );

    let list = List::new(items)
        .block(
            Block::default()
                .title(vec![
                    Span::styled(title, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
                    Span::styled("━━━━━━━", Style::default().fg(ACCENT)),
                ])
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT)),
        )
        // The cursor row comes from the list state
        .highlight_style(Style::default().bg(HIGHLIGHT_BG));

    f.render_stateful_widget(list, area, &mut app.condition_list_state);
}

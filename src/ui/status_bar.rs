// Status Bar rendering module
//
// Renders the bottom status bar with keyboard shortcuts and toggle indicators.

use crate::app::AppState;
use crate::theme::{ACCENT, DISABLED, ENABLED, MUTED};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Leading glyph of the status line
const STATUS_ICON: &str = " ◇ ";

/// One key hint; lower priority numbers are kept first when space runs out
struct Hint {
    priority: u8,
    key: &'static str,
    desc: &'static str,
    color: Color,
}

static HINTS: [Hint; 6] = [
    Hint {
        priority: 1,
        key: "Q:",
        desc: "Quit | ",
        color: DISABLED,
    },
    Hint {
        priority: 1,
        key: "↑↓:",
        desc: "Move | ",
        color: ACCENT,
    },
    Hint {
        priority: 1,
        key: "Space:",
        desc: "Toggle | ",
        color: ACCENT,
    },
    Hint {
        priority: 2,
        key: "C:",
        desc: "Clear | ",
        color: ACCENT,
    },
    Hint {
        priority: 2,
        key: "A:",
        desc: "Anim | ",
        color: ACCENT,
    },
    Hint {
        priority: 3,
        key: "t:",
        desc: "Labels | ",
        color: ACCENT,
    },
];

/// Hints that fit in `available_width` columns, highest priority first
/// (display order within the bar is preserved)
fn fitting_hints(available_width: usize) -> Vec<&'static Hint> {
    let mut used = 0;
    let mut keep = vec![false; HINTS.len()];
    for priority in 1..=3 {
        for (i, hint) in HINTS.iter().enumerate() {
            if hint.priority != priority {
                continue;
            }
            let len = hint.key.width() + hint.desc.width();
            if used + len <= available_width {
                keep[i] = true;
                used += len;
            }
        }
    }
    HINTS
        .iter()
        .zip(keep)
        .filter(|(_, kept)| *kept)
        .map(|(hint, _)| hint)
        .collect()
}

/// Columns left for key hints once the borders, the icon, the separator
/// and the toggle indicators are placed
fn hint_budget(bar_width: u16, indicators: &[Span]) -> usize {
    let reserved = 2 + STATUS_ICON.width() + 1 + indicators.iter().map(Span::width).sum::<usize>();
    (bar_width as usize).saturating_sub(reserved)
}

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let indicators = build_toggle_indicators(app);
    let available_width = hint_budget(area.width, &indicators);

    let mut spans = vec![Span::styled(STATUS_ICON, Style::default().fg(ACCENT))];
    for hint in fitting_hints(available_width) {
        spans.push(Span::styled(
            hint.key,
            Style::default().fg(hint.color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(hint.desc));
    }

    // Toggle indicators are always shown
    spans.push(Span::raw(" "));
    spans.extend(indicators);

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(ACCENT)),
        )
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

fn toggle_indicator(key: &'static str, enabled: bool) -> [Span<'static>; 3] {
    let (state, color) = if enabled {
        ("ON", ENABLED)
    } else {
        ("OFF", MUTED)
    };
    [
        Span::styled(key, Style::default().fg(MUTED)),
        Span::styled(state, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled("] ", Style::default().fg(MUTED)),
    ]
}

/// Build toggle status indicator spans for the status bar
/// Shows [A:ON/OFF] [t:ON/OFF], plus a marker while a transition plays
pub fn build_toggle_indicators(app: &AppState) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    spans.extend(toggle_indicator("[A:", app.graph_settings.animations_enabled));
    spans.extend(toggle_indicator("[t:", app.graph_settings.labels_enabled));
    if app.engine.is_animating() {
        spans.push(Span::styled("~", Style::default().fg(ACCENT)));
    }
    spans
}

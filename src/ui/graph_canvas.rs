// Hypergraph canvas rendering module
//
// Renders the engine's current visuals: protocol hulls as outlines behind
// the condition nodes, with optional labels. Layout space has y pointing
// down; the canvas has y pointing up, so every point is flipped on the way
// in.

use crate::app::config::MAX_LABEL_WIDTH;
use crate::app::AppState;
use crate::engine::geometry::Point;
use crate::engine::layout::{self, LayoutMode};
use crate::theme::{ACCENT, MUTED, TEXT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, BorderType, Borders, Paragraph,
    },
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Glyph for a checked condition
pub const ACTIVE_NODE_GLYPH: &str = "●";

/// Glyph for an unchecked condition
pub const INACTIVE_NODE_GLYPH: &str = "○";

/// Drawable size in layout units for a canvas occupying `inner`
///
/// One column is one unit wide and one row is two units tall, which keeps
/// rings round on a typical terminal font.
pub fn layout_size(inner: Rect) -> (f64, f64) {
    (inner.width as f64, inner.height as f64 * 2.0)
}

/// Layout point to canvas coordinates (flips y)
pub fn to_canvas(point: Point, height: f64) -> (f64, f64) {
    (point.x, height - point.y)
}

/// Consecutive outline points as closed-loop segments
pub fn outline_segments(outline: &[Point]) -> Vec<(Point, Point)> {
    if outline.len() < 2 {
        return Vec::new();
    }
    outline
        .iter()
        .zip(outline.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
        .collect()
}

/// Shorten `label` to at most `max_width` display columns, marking the cut
pub fn truncate_label(label: &str, max_width: usize) -> String {
    if label.width() <= max_width {
        return label.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    // Measured on the whole prefix: joiners and variation selectors
    // change the width of what precedes them
    let budget = max_width - 1;
    let mut out = String::new();
    for c in label.chars() {
        out.push(c);
        if out.width() > budget {
            out.pop();
            break;
        }
    }
    out.push('…');
    out
}

pub fn render_graph_canvas(f: &mut Frame, area: Rect, app: &mut AppState) {
    // Split: summary line + canvas
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let canvas_block = Block::default()
        .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT));

    // Resize is picked up here, before anything is read for drawing
    let (width, height) = layout_size(canvas_block.inner(chunks[1]));
    app.sync_viewport(width, height);

    let store = app.engine.store();
    let (mode, _) = layout::assign_rings(store);
    let active_nodes = store.nodes().iter().filter(|n| n.active).count();
    let visible_hulls = app.engine.hull_visuals().len();

    let mode_text = match mode {
        LayoutMode::Idle => "idle ring",
        LayoutMode::Selection => "focused",
    };
    let summary = Paragraph::new(Line::from(vec![
        Span::styled(" ◇ ", Style::default().fg(ACCENT)),
        Span::styled(
            format!(
                "Conditions: {}/{} | Protocols shown: {} | Layout: {}",
                active_nodes,
                store.nodes().len(),
                visible_hulls,
                mode_text
            ),
            Style::default().fg(TEXT),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT))
            .title(vec![Span::styled(
                "━ Protocol Hypergraph ━",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )]),
    );
    f.render_widget(summary, chunks[0]);

    // Capture drawable data for the paint closure
    let hulls: Vec<_> = app
        .engine
        .hull_visuals()
        .iter()
        .map(|hull| (outline_segments(&hull.path.outline()), hull.color))
        .collect();
    let nodes: Vec<_> = app
        .engine
        .node_visuals()
        .iter()
        .map(|node| (node.id.clone(), node.position, node.color, node.active))
        .collect();
    let labels_enabled = app.graph_settings.labels_enabled;
    let is_empty = nodes.is_empty();

    let canvas = Canvas::default()
        .block(canvas_block)
        .marker(Marker::Braille)
        .x_bounds([0.0, width.max(1.0)])
        .y_bounds([0.0, height.max(1.0)])
        .paint(move |ctx| {
            // Hulls first so nodes sit on top
            for (segments, color) in &hulls {
                for (a, b) in segments {
                    let (x1, y1) = to_canvas(*a, height);
                    let (x2, y2) = to_canvas(*b, height);
                    ctx.draw(&CanvasLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        color: *color,
                    });
                }
            }
            ctx.layer();

            for (id, position, color, active) in &nodes {
                let (x, y) = to_canvas(*position, height);
                let glyph = if *active {
                    ACTIVE_NODE_GLYPH
                } else {
                    INACTIVE_NODE_GLYPH
                };
                ctx.print(x, y, Span::styled(glyph, Style::default().fg(*color)));

                if labels_enabled {
                    let style = if *active {
                        Style::default().fg(*color).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(MUTED)
                    };
                    ctx.print(
                        x + 2.0,
                        y,
                        Span::styled(truncate_label(id, MAX_LABEL_WIDTH), style),
                    );
                }
            }

            if is_empty {
                let message = "No conditions in this snapshot";
                let offset = message.width() as f64 / 2.0;
                ctx.print(
                    width / 2.0 - offset,
                    height / 2.0,
                    Span::styled(
                        message,
                        Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
                    ),
                );
            }
        });

    f.render_widget(canvas, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_layout_size_doubles_rows() {
        assert_eq!(layout_size(Rect::new(3, 4, 80, 30)), (80.0, 60.0));
        assert_eq!(layout_size(Rect::new(0, 0, 0, 0)), (0.0, 0.0));
    }

    #[test]
    fn test_to_canvas_flips_y() {
        assert_eq!(to_canvas(Point::new(5.0, 0.0), 40.0), (5.0, 40.0));
        assert_eq!(to_canvas(Point::new(5.0, 40.0), 40.0), (5.0, 0.0));
        // Top of a ring in layout space stays at the top on screen
        assert_eq!(to_canvas(Point::new(20.0, 10.0), 40.0), (20.0, 30.0));
    }

    #[test]
    fn test_outline_segments_close_the_loop() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let segments = outline_segments(&square);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3], (Point::new(0.0, 1.0), Point::new(0.0, 0.0)));
        assert!(outline_segments(&square[..1]).is_empty());
        assert!(outline_segments(&[]).is_empty());
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Dx.Preeclampsia", 24), "Dx.Preeclampsia");
        assert_eq!(truncate_label("DxAttr.Preeclampsia.Severe", 10), "DxAttr.Pr…");
        assert_eq!(truncate_label("abc", 0), "");
        // Wide characters count double
        assert_eq!(truncate_label("妊娠高血圧", 5), "妊娠…");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_truncated_label_fits(label in "\\PC{0,40}", max in 0usize..30) {
            let out = truncate_label(&label, max);
            prop_assert!(out.width() <= max);
        }
    }
}

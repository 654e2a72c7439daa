//! Field rendering utilities for forms

use crate::state::{FieldKind, FieldSpec, FieldValue};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows a single field occupies
pub const FIELD_HEIGHT: u16 = 3;

/// Draw one wizard field in a bordered box titled with its label
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    spec: &FieldSpec,
    value: Option<&FieldValue>,
    is_active: bool,
) {
    let accent = if is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .title(format!(" {} ", spec.label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    let line = Line::from(value_spans(spec, value, is_active));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn value_spans<'a>(spec: &FieldSpec, value: Option<&FieldValue>, is_active: bool) -> Vec<Span<'a>> {
    let text_style = if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = Span::styled("▌", Style::default().fg(Color::Cyan));

    match spec.kind {
        FieldKind::Flag => {
            let on = value.map(FieldValue::as_flag).unwrap_or(false);
            let mark = if on { "[x] Yes" } else { "[ ] No" };
            vec![Span::styled(mark, text_style)]
        }
        FieldKind::Choice(_) => {
            let shown = display_or_placeholder(value, is_active);
            let arrow = Style::default().fg(Color::DarkGray);
            let mut spans = Vec::new();
            if is_active {
                spans.push(Span::styled("◀ ", arrow));
            }
            spans.push(Span::styled(shown, text_style));
            if is_active {
                spans.push(cursor);
                spans.push(Span::styled(" ▶", arrow));
            }
            spans
        }
        FieldKind::Text | FieldKind::Number => {
            let shown = display_or_placeholder(value, is_active);
            let mut spans = vec![Span::styled(shown, text_style)];
            if is_active {
                spans.push(cursor);
            }
            spans
        }
    }
}

fn display_or_placeholder(value: Option<&FieldValue>, is_active: bool) -> String {
    let shown = value.map(FieldValue::display_value).unwrap_or_default();
    if shown.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        shown
    }
}

/// Draw a one-line help text under a form
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));
    frame.render_widget(help, area);
}

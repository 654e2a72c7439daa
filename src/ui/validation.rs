//! Validation feedback panel

use crate::state::ValidationResult;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, result: &ValidationResult) {
    let (title, color) = headline(result);
    let block = Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    frame.render_widget(
        Paragraph::new(lines(result))
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn headline(result: &ValidationResult) -> (&'static str, Color) {
    if result.is_valid {
        ("Valid", Color::Green)
    } else if result.warnings.is_empty() && result.suggestions.is_empty() {
        ("Not validated yet", Color::DarkGray)
    } else {
        ("Needs attention", Color::Yellow)
    }
}

fn lines(result: &ValidationResult) -> Vec<Line<'static>> {
    let warnings = result.warnings.iter().map(|warning| {
        Line::from(vec![
            Span::styled("⚠ ", Style::default().fg(Color::Yellow)),
            Span::raw(warning.clone()),
        ])
    });
    let suggestions = result.suggestions.iter().map(|suggestion| {
        Line::from(vec![
            Span::styled("→ ", Style::default().fg(Color::Cyan)),
            Span::styled(suggestion.clone(), Style::default().fg(Color::Gray)),
        ])
    });
    let mut lines: Vec<Line> = warnings.chain(suggestions).collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Press Enter to validate this step and continue",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

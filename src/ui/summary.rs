//! Final confirmation screen

use crate::api::TaskStatus;
use crate::app::App;
use crate::state::Submission;
use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.wizard.state();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Banner
            Constraint::Min(6),    // Details
        ])
        .split(area);

    let banner = Paragraph::new(vec![
        Line::from(Span::styled(
            "Business Confirmation created",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            confirmation_number(state.task_status.as_ref()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(banner, chunks[0]);

    let details = Paragraph::new(detail_lines(&state.submission, state.task_status.as_ref()))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Details ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(details, chunks[1]);
}

fn confirmation_number(status: Option<&TaskStatus>) -> String {
    status
        .and_then(|status| status.confirmation_number.clone())
        .unwrap_or_else(|| "(no confirmation number returned)".to_string())
}

fn detail_lines(submission: &Submission, status: Option<&TaskStatus>) -> Vec<Line<'static>> {
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<16}"), Style::default().fg(Color::Gray)),
            Span::raw(value),
        ])
    };

    let mut lines = vec![row(
        "Task",
        submission.task_id().unwrap_or("—").to_string(),
    )];
    if let Some(at) = submission.submitted_at() {
        lines.push(row(
            "Submitted",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        ));
    }
    if let Some(status) = status {
        if let Some(seconds) = status.processing_time {
            lines.push(row("Processing time", format!("{seconds:.1}s")));
        }
        if let Some(timestamp) = &status.timestamp {
            lines.push(row("Completed", timestamp.clone()));
        }
        if let Some(result) = &status.result {
            lines.push(Line::from(""));
            lines.push(Line::from(result.clone()));
        }
    }
    lines
}

//! Layout components (step header, status bar)

use super::components::BUTTON_HEIGHT;
use crate::app::App;
use crate::state::{Step, SubmissionStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into step header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BUTTON_HEIGHT), // Step indicator
            Constraint::Min(0),                // Content
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let step = app.wizard.current_step();
    let submission = app.wizard.submission_status();

    let mut spans = vec![Span::styled(
        format!(" {}/{} ", step.number(), Step::LAST.number()),
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )];

    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        step_hints(step, submission),
        Style::default().fg(Color::Gray),
    ));

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Quit hint on the right
    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        width: (quit_hint.len() as u16).min(area.width),
        ..area
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current step
fn step_hints(step: Step, submission: SubmissionStatus) -> &'static str {
    if submission.is_in_flight() {
        return "Processing deal, please wait";
    }
    match step {
        Step::DealBasics => "Tab:next field  Enter:validate & continue",
        Step::CommercialTerms | Step::PaymentTerms => {
            "Tab:next field  Enter:validate & continue  Esc:back"
        }
        Step::Review if submission == SubmissionStatus::Failed => {
            "Enter:retry submit  v:revalidate  Esc:back"
        }
        Step::Review => "Enter:submit  v:revalidate  Esc:back",
        Step::Summary => "n:new deal  q:quit",
    }
}

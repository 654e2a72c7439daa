//! Review screen: every section at a glance, then submit

use crate::app::App;
use crate::state::{SectionName, Submission, SubmissionStatus};
use crate::ui::validation;
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Sections
            Constraint::Length(6), // Validation
            Constraint::Length(5), // Submission
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[0]);

    for (section, column) in SectionName::ALL.iter().zip(columns.iter()) {
        draw_section(frame, *column, app, *section);
    }

    validation::draw(frame, chunks[1], &app.wizard.state().validation);
    draw_submission(frame, chunks[2], app);
}

fn draw_section(frame: &mut Frame, area: Rect, app: &App, section: SectionName) {
    let form = &app.wizard.state().form;
    let lines: Vec<Line> = section
        .fields()
        .iter()
        .map(|spec| {
            let value_span = match form.value(section, spec.name) {
                Some(value) if !value.is_blank() => Span::raw(value.display_value()),
                _ => Span::styled("—", Style::default().fg(Color::DarkGray)),
            };
            Line::from(vec![
                Span::styled(
                    format!("{}: ", spec.label),
                    Style::default().fg(Color::Gray),
                ),
                value_span,
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" {} ", section.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn draw_submission(frame: &mut Frame, area: Rect, app: &App) {
    let submission = &app.wizard.state().submission;
    let color = match submission.status() {
        SubmissionStatus::Idle => Color::DarkGray,
        SubmissionStatus::Submitting | SubmissionStatus::Polling => Color::Yellow,
        SubmissionStatus::Completed => Color::Green,
        SubmissionStatus::Failed => Color::Red,
    };

    let block = Block::default()
        .title(Span::styled(
            format!(" Submission · {} ", submission.status().label()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let backend_status = app
        .wizard
        .state()
        .task_status
        .as_ref()
        .map(|status| status.status.as_str());
    frame.render_widget(
        Paragraph::new(submission_lines(submission, backend_status)).block(block),
        area,
    );
}

fn submission_lines(submission: &Submission, backend_status: Option<&str>) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::Gray);
    match submission.status() {
        SubmissionStatus::Idle => vec![Line::from(Span::styled(
            "Press Enter to submit this deal for processing",
            dim,
        ))],
        SubmissionStatus::Submitting => vec![Line::from("Sending deal to the backend...")],
        SubmissionStatus::Polling => {
            let elapsed = submission
                .submitted_at()
                .map(|at| (Utc::now() - at).num_seconds().max(0))
                .unwrap_or(0);
            vec![
                Line::from(format!(
                    "Processing task {} ({elapsed}s)",
                    submission.task_id().unwrap_or("?")
                )),
                Line::from(Span::styled(
                    format!("Backend status: {}", backend_status.unwrap_or("queued")),
                    dim,
                )),
            ]
        }
        SubmissionStatus::Completed => vec![Line::from("Deal processed")],
        SubmissionStatus::Failed => vec![
            Line::from(Span::styled(
                submission.error().unwrap_or("unknown error").to_string(),
                Style::default().fg(Color::Red),
            )),
            Line::from(Span::styled("Press Enter to retry", dim)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_idle_prompts_for_submit() {
        let submission = Submission::default();
        assert_eq!(
            text(&submission_lines(&submission, None)),
            vec!["Press Enter to submit this deal for processing"]
        );
    }

    #[test]
    fn test_polling_shows_task_and_backend_status() {
        let mut submission = Submission::default();
        submission.begin().unwrap();
        submission.start_polling("T42".to_string()).unwrap();

        let lines = text(&submission_lines(&submission, Some("processing")));
        assert!(lines[0].starts_with("Processing task T42"));
        assert_eq!(lines[1], "Backend status: processing");
    }

    #[test]
    fn test_failure_offers_retry() {
        let mut submission = Submission::default();
        submission.begin().unwrap();
        submission.fail("backend returned 500").unwrap();

        assert_eq!(
            text(&submission_lines(&submission, None)),
            vec!["backend returned 500", "Press Enter to retry"]
        );
    }
}

//! Row of step boxes across the top of the screen

use super::components::render_step_button;
use crate::state::{Step, SubmissionStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, current: Step, submission: SubmissionStatus) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Step::ALL.map(|_| Constraint::Ratio(1, Step::ALL.len() as u32)))
        .split(area);

    for (step, chunk) in Step::ALL.iter().zip(chunks.iter()) {
        render_step_button(
            frame,
            *chunk,
            step.number(),
            step.title(),
            *step == current,
            is_done(*step, current, submission),
        );
    }
}

/// A step is done once the wizard has moved past it; the summary only
/// once the deal has been processed
fn is_done(step: Step, current: Step, submission: SubmissionStatus) -> bool {
    if step == Step::Summary {
        return submission == SubmissionStatus::Completed;
    }
    step < current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_before_current_are_done() {
        assert!(is_done(Step::DealBasics, Step::PaymentTerms, SubmissionStatus::Idle));
        assert!(!is_done(Step::PaymentTerms, Step::PaymentTerms, SubmissionStatus::Idle));
        assert!(!is_done(Step::Review, Step::PaymentTerms, SubmissionStatus::Idle));
    }

    #[test]
    fn test_summary_done_only_when_completed() {
        assert!(!is_done(Step::Summary, Step::Review, SubmissionStatus::Polling));
        assert!(is_done(Step::Summary, Step::Summary, SubmissionStatus::Completed));
    }
}

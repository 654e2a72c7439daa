//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod review;
mod step_indicator;
mod summary;
mod validation;

use crate::app::App;
use crate::state::Step;
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    let step = app.wizard.current_step();
    step_indicator::draw(frame, header_area, step, app.wizard.submission_status());

    match step {
        Step::DealBasics | Step::CommercialTerms | Step::PaymentTerms => {
            forms::draw_section_form(frame, main_area, app)
        }
        Step::Review => review::draw(frame, main_area, app),
        Step::Summary => summary::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Errors render last so they sit above everything (modal)
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message, app.state.error_count());
    }
}

//! Data-entry screen for the three deal sections

use super::field_renderer::{draw_field, draw_help_text, FIELD_HEIGHT};
use crate::app::App;
use crate::ui::validation;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

const HELP: &str = "Tab/↑↓ move between fields · ←/→ pick an option · Space toggles";

/// Draw the active section's fields in two columns with the validation panel below
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let step = app.wizard.current_step();
    let Some(section) = step.section() else {
        return;
    };

    let fields = section.fields();
    let rows = fields.len().div_ceil(2) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(rows * FIELD_HEIGHT + 2), // Form
            Constraint::Min(4),                          // Validation
            Constraint::Length(1),                       // Help
        ])
        .split(area);

    let block = Block::default()
        .title(format!(" Step {} · {} ", step.number(), step.description()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let form = &app.wizard.state().form;
    for (idx, spec) in fields.iter().enumerate() {
        let column = columns[idx % 2];
        let row = (idx / 2) as u16;
        let y = column.y + row * FIELD_HEIGHT;
        if y + FIELD_HEIGHT > column.y + column.height {
            continue;
        }
        let field_area = Rect {
            x: column.x,
            y,
            width: column.width,
            height: FIELD_HEIGHT,
        };
        draw_field(
            frame,
            field_area,
            spec,
            form.value(section, spec.name),
            idx == app.state.active_field,
        );
    }

    validation::draw(frame, chunks[1], &app.wizard.state().validation);
    draw_help_text(frame, chunks[2], HELP);
}

//! Application state module

mod app_state;
mod forms;
mod wizard_state;

pub use app_state::*;
pub use forms::*;
pub use wizard_state::*;

//! Form rendering module
//!
//! - `field_renderer`: single-field boxes
//! - `section_form`: the deal-basics, commercial-terms and payment-terms screens

mod field_renderer;
mod section_form;

pub use section_form::draw as draw_section_form;

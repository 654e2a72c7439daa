//! Form domain layer
//!
//! Type-safe field values plus the static field catalog for each
//! data-entry section of the wizard.

mod field;
mod sections;

pub use field::{DropdownList, FieldKind, FieldSpec, FieldValue};
pub use sections::{FieldMap, FormSections, SectionName};

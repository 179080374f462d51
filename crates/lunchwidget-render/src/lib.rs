//! Output stage: row-template rendering and host-document data injection.

pub mod error;
pub mod inject;
pub mod output;
pub mod template;

pub use error::RenderError;
pub use inject::{inject_data, inject_into_file, serialize_records};
pub use output::write_atomic;
pub use template::{field_value, render_widget, Template, LOOP_END, LOOP_START};

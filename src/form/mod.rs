mod actions;
pub(crate) mod convert;
mod error;
mod fields;
mod variants;

pub use actions::FormCommand;
pub use error::FieldCoercionError;
pub use fields::{FieldEdit, FieldKind, FieldTarget, FieldView, LinkView, Panel};
pub use variants::{apply_field_edit, is_testable, render_panel};

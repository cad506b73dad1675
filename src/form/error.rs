use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{pointer}: {message}")]
pub struct FieldCoercionError {
    pub pointer: String,
    pub message: String,
}

impl FieldCoercionError {
    pub(crate) fn new(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            message: message.into(),
        }
    }

    pub(crate) fn not_editable(pointer: &str, variant: &str) -> Self {
        Self::new(pointer, format!("not an editable field of a {variant} component"))
    }
}

use thiserror::Error;

use crate::form::FieldCoercionError;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("editor session is closed")]
    Closed,
    #[error(transparent)]
    Coercion(#[from] FieldCoercionError),
    #[error("editor runtime stopped")]
    RuntimeStopped,
}

use crate::value::ValueKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValueError {
    #[error("Invalid type label: {0}")]
    InvalidTypeLabel(String),

    #[error("Cannot compare {left} with {right}")]
    IncomparableVariants { left: ValueKind, right: ValueKind },

    #[error("Invalid {kind} literal: '{text}'")]
    InvalidLiteral { kind: ValueKind, text: String },

    #[error("Expected {expected}, got {actual}")]
    TypeMismatch { expected: ValueKind, actual: ValueKind },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

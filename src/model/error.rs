use std::fmt;

/// Input validation error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted field path (e.g., `"asset.capacity_mwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

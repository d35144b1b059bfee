//! Validation error types

/// Error information for a specific field that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Human-readable validation error message.
    pub message: String,
}

impl FieldValidationError {
    /// Creates a new field validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A form failed validation.
///
/// Carries every failing field, not just the first, so a form can mark all
/// of them at once.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} invalid field(s): {}", .fields.len(), join(.fields))]
pub struct ValidationError {
    /// The failing fields in form order.
    pub fields: Vec<FieldValidationError>,
}

impl ValidationError {
    /// Returns the error for a specific field, if it failed.
    pub fn field(&self, name: &str) -> Option<&FieldValidationError> {
        self.fields.iter().find(|f| f.field == name)
    }
}

fn join(fields: &[FieldValidationError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

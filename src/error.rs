use thiserror::Error;

/// The primary error type for the crate.
///
/// This enum consolidates all failures surfaced by the agent API, the
/// directory store and the file action orchestrator, providing a unified
/// way to handle and report them.
#[derive(Debug, Error)]
pub enum AppError {
    /// The agent could not be reached or answered with a malformed payload.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The agent rejected a request because a specific field was invalid.
    /// Carried through to the caller unmodified.
    #[error("Validation error on field '{field}': {message}")]
    Validation {
        /// The name of the field that failed validation.
        field: String,
        /// A message describing the validation error.
        message: String,
    },
    /// The current capability set does not allow the requested action.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    /// Another action on the same entry has not finished yet.
    #[error("Operation already in flight: {0}")]
    Busy(String),
    /// A requested resource is not present.
    #[error("Not found: {0}")]
    NotFound(String),
    /// For internal errors that callers are not expected to handle.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// A type alias for `Result<T, AppError>`, used throughout the crate.
pub type AppResult<T> = Result<T, AppError>;

/// An extension trait for `Option` that provides a convenient way to convert
/// an `Option` to a `Result` with a `NotFound` error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, AppError>`, describing the
    /// missing entity in the error message.
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(format!("{} not found", entity)))
    }
}

/// Local checks that run before a request is handed to the agent.
pub mod validation {
    use super::*;

    /// Validates an entry name supplied by the user, e.g. a rename target.
    ///
    /// Rejects empty (or whitespace-only) names and names containing null
    /// characters. Separators are allowed; a name with `/` simply resolves
    /// to a nested path once joined onto the directory.
    pub fn validate_entry_name(name: &str) -> AppResult<()> {
        if name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name cannot be empty".to_string(),
            });
        }

        if name.contains('\0') {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name contains null characters".to_string(),
            });
        }

        Ok(())
    }
}

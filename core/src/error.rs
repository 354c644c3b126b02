//! Error types
//!
//! Two classes of failure exist. [`AuthError::Validation`] means the caller
//! left out (or garbled) an input a code path needs; it is the only kind a
//! fallback chain may skip past, and several of them merge into one. Every
//! other variant is operational and ends the invocation.

use std::fmt;

use thiserror::Error;

/// Result type alias for token operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Missing or invalid caller input, with the names of the offending fields
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationFailure {
    pub message: String,
    pub fields: Vec<String>,
}

impl ValidationFailure {
    pub fn new(message: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            message: message.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Combine failures: distinct messages joined with " OR ", fields unioned.
    ///
    /// Both lists keep first-seen order with duplicates dropped.
    pub fn merge<'a>(failures: impl IntoIterator<Item = &'a ValidationFailure>) -> Self {
        let mut messages: Vec<&str> = Vec::new();
        let mut fields: Vec<String> = Vec::new();

        for failure in failures {
            if !messages.contains(&failure.message.as_str()) {
                messages.push(&failure.message);
            }
            for field in &failure.fields {
                if !fields.contains(field) {
                    fields.push(field.clone());
                }
            }
        }

        Self {
            message: messages.join(" OR "),
            fields,
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Token minting error
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Validation(ValidationFailure),

    #[error("{message}")]
    InstallationNotFound { message: String },

    #[error("upstream error: {message}")]
    Upstream { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error("not supported: {message}")]
    Unsupported { message: String },
}

impl From<ValidationFailure> for AuthError {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(failure)
    }
}

impl AuthError {
    pub fn validation(message: impl Into<String>, fields: &[&str]) -> Self {
        Self::Validation(ValidationFailure::new(message, fields))
    }

    pub fn installation_not_found(message: impl Into<String>) -> Self {
        Self::InstallationNotFound {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Input fields that caused the failure (empty for operational errors)
    pub fn fields(&self) -> &[String] {
        match self {
            Self::Validation(failure) => &failure.fields,
            _ => &[],
        }
    }

    /// Process exit code for command line front ends
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            _ => 1,
        }
    }
}

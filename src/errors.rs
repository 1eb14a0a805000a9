// Copyright 2025 Cowboy AI, LLC.

//! Error types for network model and view operations

use thiserror::Error;

/// Errors that can occur while building, mutating or viewing a network
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NetworkError {
    /// A mutating method was called on a read-only view
    #[error("unmodifiable view: cannot call {operation} on {element} '{id}'")]
    UnmodifiableView {
        /// Kind of element the view projects (e.g. `"bus"`)
        element: &'static str,
        /// Name of the rejected method
        operation: &'static str,
        /// Id of the underlying element
        id: String,
    },

    /// An identifiable with the same id already exists in the network
    #[error("duplicate id '{0}' in network")]
    DuplicateId(String),

    /// A referenced element was not found
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Kind of element that was looked up
        kind: &'static str,
        /// Id that was searched for
        id: String,
    },

    /// An element failed validation while being created or mutated
    #[error("validation of '{id}' failed: {reason}")]
    Validation {
        /// Id of the offending element
        id: String,
        /// Why validation failed
        reason: String,
    },

    /// A handle points at an element that has been removed from its network
    #[error("element '{0}' is detached from its network")]
    Detached(String),
}

impl NetworkError {
    /// Build the per-call immutability error raised by every view mutator.
    ///
    /// Each rejection carries the element kind, the attempted operation and
    /// the element id, so the failure is diagnosable without a stack trace.
    pub fn unmodifiable(
        element: &'static str,
        operation: &'static str,
        id: impl Into<String>,
    ) -> Self {
        NetworkError::UnmodifiableView {
            element,
            operation,
            id: id.into(),
        }
    }

    /// Build a validation error for the element with the given id.
    pub fn validation(id: impl Into<String>, reason: impl Into<String>) -> Self {
        NetworkError::Validation {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for network operations
pub type NetworkResult<T> = Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmodifiable_error_names_element_operation_and_id() {
        let err = NetworkError::unmodifiable("bus", "set_v", "NHV1");
        assert_eq!(
            err.to_string(),
            "unmodifiable view: cannot call set_v on bus 'NHV1'"
        );
    }

    #[test]
    fn two_rejections_are_distinct_values() {
        let a = NetworkError::unmodifiable("bus", "set_v", "B1");
        let b = NetworkError::unmodifiable("bus", "set_angle", "B1");
        assert_ne!(a, b);
    }
}

//! Centralized error types for cinegraph.

use thiserror::Error;

use crate::graph::Label;

/// Main error type for graph and service operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CineError {
    #[error("{label} not found: {id}")]
    NotFound { label: String, id: String },

    #[error("Constraint violation on {label}: {detail}")]
    ConstraintViolation { label: Label, detail: String },

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Graph store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for cinegraph operations.
pub type CineResult<T> = Result<T, CineError>;

impl CineError {
    /// Create a not found error for a node of a known label.
    pub fn not_found(label: Label, id: impl Into<String>) -> Self {
        Self::NotFound {
            label: label.to_string(),
            id: id.into(),
        }
    }

    /// Create a not found error for an id whose label is unknown.
    pub fn unknown_node(id: impl Into<String>) -> Self {
        Self::NotFound {
            label: "Node".to_string(),
            id: id.into(),
        }
    }

    /// Create a constraint violation error.
    pub fn constraint(label: Label, detail: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            label,
            detail: detail.into(),
        }
    }

    /// Create an invalid reference error.
    pub fn invalid_reference(msg: impl Into<String>) -> Self {
        Self::InvalidReference(msg.into())
    }

    /// Create a store unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

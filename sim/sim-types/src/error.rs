//! Error types for contact simulation operations.

use thiserror::Error;

/// Errors that can occur while evaluating the contact subsystem.
///
/// Every variant is raised eagerly, before any computation starts, so a
/// failing call never leaves a partially computed result behind.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// An array crossing an API boundary has the wrong length.
    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    Shape {
        /// Which input was malformed.
        what: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// A link name was requested that the model does not contain.
    #[error("unknown link: {name}")]
    UnknownLink {
        /// Name of the missing link.
        name: String,
    },

    /// The model cannot support the requested computation.
    #[error("invalid model: {reason}")]
    InvalidModel {
        /// Description of what's wrong.
        reason: String,
    },

    /// Soft contact or estimator parameters violate their invariants.
    #[error("invalid parameters: {reason}")]
    InvalidParameters {
        /// Description of the violated invariant.
        reason: String,
    },
}

impl SimError {
    /// Create a shape mismatch error.
    #[must_use]
    pub fn shape(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::Shape {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Create an unknown link error.
    #[must_use]
    pub fn unknown_link(name: impl Into<String>) -> Self {
        Self::UnknownLink { name: name.into() }
    }

    /// Create an invalid model error.
    #[must_use]
    pub fn invalid_model(reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameters error.
    #[must_use]
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            reason: reason.into(),
        }
    }

    /// Check if this is a shape error.
    #[must_use]
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::Shape { .. })
    }

    /// Check if this is an unknown link error.
    #[must_use]
    pub fn is_unknown_link(&self) -> bool {
        matches!(self, Self::UnknownLink { .. })
    }

    /// Check if this is an invalid model error.
    #[must_use]
    pub fn is_invalid_model(&self) -> bool {
        matches!(self, Self::InvalidModel { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::shape("tangential deformation", 4, 3);
        let msg = err.to_string();
        assert!(msg.contains("tangential deformation"));
        assert!(msg.contains('4'));
        assert!(msg.contains('3'));

        let err = SimError::unknown_link("left_foot");
        assert!(err.to_string().contains("left_foot"));

        let err = SimError::invalid_model("total mass must be positive");
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn test_error_predicates() {
        assert!(SimError::shape("x", 1, 2).is_shape_error());
        assert!(SimError::unknown_link("a").is_unknown_link());
        assert!(SimError::invalid_model("m").is_invalid_model());
        assert!(!SimError::invalid_params("k").is_invalid_model());
    }
}

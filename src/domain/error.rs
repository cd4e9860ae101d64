//! Domain validation errors for core domain types.
//!
//! These errors are returned when a value read from outside the process
//! (configuration files, serialized network configurations) violates a
//! domain invariant.
//!
//! # Examples
//!
//! ```
//! use nodelaunch::domain::error::DomainError;
//! use nodelaunch::domain::node::NodeIndex;
//!
//! let result = "frontend-2".parse::<NodeIndex>();
//! assert!(matches!(result, Err(DomainError::InvalidNodeIndex { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A node index was neither the front-end key nor a worker ordinal.
    #[error("invalid node index '{value}'")]
    InvalidNodeIndex {
        /// The rejected text.
        value: String,
    },

    /// Requested node count must be positive.
    #[error("node count must be greater than 0")]
    ZeroNodeCount,
}

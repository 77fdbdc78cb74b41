//! Error types for engine operations.

use thiserror::Error;

/// Errors that can occur in the synchronization engine.
///
/// Per-node precondition violations (empty meshes, missing data) are not
/// errors: the affected node is skipped during rebuild and simply never
/// appears in the active body set. These variants cover API misuse and
/// invalid configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyncError {
    /// Invalid timestep value in a [`crate::FrameConfig`].
    #[error("invalid timestep: {0} (must be positive and finite)")]
    InvalidTimestep(f64),

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// A body referenced a node index outside the caller's node slice.
    #[error("node index {index} out of bounds (slice has {len} nodes)")]
    NodeIndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Length of the node slice.
        len: usize,
    },

    /// A mesh was too degenerate to build any body from.
    #[error("degenerate mesh on node '{name}': {reason}")]
    DegenerateMesh {
        /// Name of the offending node.
        name: String,
        /// What was missing or malformed.
        reason: String,
    },
}

impl SyncError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a degenerate mesh error.
    #[must_use]
    pub fn degenerate_mesh(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DegenerateMesh {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. } | Self::InvalidTimestep(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::InvalidTimestep(-1.0);
        assert!(err.to_string().contains("-1"));

        let err = SyncError::degenerate_mesh("floor", "no triangles");
        assert!(err.to_string().contains("floor"));
        assert!(err.to_string().contains("no triangles"));
    }

    #[test]
    fn test_error_predicates() {
        assert!(SyncError::invalid_config("bad").is_config_error());
        assert!(SyncError::InvalidTimestep(0.0).is_config_error());
        assert!(!SyncError::degenerate_mesh("a", "b").is_config_error());
    }
}

//! Error type shared by every cmap operation

use crate::graph::{LinkId, NodeId, NodeType, TripleId};
use crate::registry::MapId;
use thiserror::Error;

/// Errors that can occur in concept map operations
#[derive(Debug, Error)]
pub enum CmapError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Link not found: {0}")]
    LinkNotFound(LinkId),

    #[error("Triple not found: {0}")]
    TripleNotFound(TripleId),

    #[error("No triple with value [{}]", .0.join(", "))]
    TripleValueNotFound([String; 3]),

    #[error("Id already in use: {0}")]
    DuplicateId(String),

    #[error("Link {0} does not join the given nodes")]
    LinkMismatch(LinkId),

    #[error("Node {id} is not a {expected} node")]
    WrongNodeType { id: NodeId, expected: NodeType },

    #[error("Concept map not found: {0}")]
    MapNotFound(MapId),

    /// An action or a committed step broke the graph's internal consistency.
    /// Indicates a planner bug or a malformed hand-built step, never bad input.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CmapError {
    /// Whether the error reports missing caller-supplied data
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CmapError::NodeNotFound(_)
                | CmapError::LinkNotFound(_)
                | CmapError::TripleNotFound(_)
                | CmapError::TripleValueNotFound(_)
                | CmapError::MapNotFound(_)
        )
    }
}

/// Result type for cmap operations
pub type CmapResult<T> = Result<T, CmapError>;

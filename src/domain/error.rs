//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors represent violated structural preconditions.
///
/// Every operation reporting one of these has validated its arguments before
/// touching the structure, so the forest is unchanged when an error is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("at least one node is required")]
    EmptyArguments,

    #[error("node does not exist in this forest: {0}")]
    UnknownNode(NodeId),

    #[error("node is not a root: {0}")]
    NotARoot(NodeId),

    #[error("node is a root and has no parent to detach from: {0}")]
    IsRoot(NodeId),

    #[error("node given more than once: {0}")]
    DuplicateNode(NodeId),

    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("attaching {child} below {parent} would create a cycle")]
    WouldCycle { parent: NodeId, child: NodeId },

    #[error("brand of {child} is not compatible with brand of {parent}")]
    BrandMismatch { parent: NodeId, child: NodeId },

    #[error("node is already branded: {0}")]
    AlreadyBranded(NodeId),

    #[error("node is branded and cannot be detached: {0}")]
    Branded(NodeId),

    #[error("node must be isolated (no parent, no children): {0}")]
    NotIsolated(NodeId),

    #[error("not a member: {0}")]
    NotAMember(String),

    #[error("identity already present: {0}")]
    DuplicateId(String),

    #[error("multiple parents declared for: {0}")]
    MultipleParents(String),

    #[error("cycle detected in hierarchy: {0}")]
    CycleDetected(String),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

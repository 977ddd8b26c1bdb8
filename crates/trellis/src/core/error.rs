use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::id::NodeId;

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("node not found: {0:?}")]
    /// A node id did not resolve to a live node.
    NodeNotFound(NodeId),
    #[error("node already attached: {0:?}")]
    /// The child already has a parent.
    AlreadyAttached(NodeId),
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    /// The child is an ancestor of the requested parent.
    WouldCreateCycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },
    #[error("widget is already borrowed: {0:?}")]
    /// The widget slot is checked out by an outer call.
    ReentrantWidgetBorrow(NodeId),
    #[error("invalid operation: {0}")]
    /// The operation is not permitted in the current tree state.
    InvalidOperation(String),
    #[error("invalid: {0}")]
    /// Invalid input, such as a malformed theme file.
    Invalid(String),
    #[error("internal: {0}")]
    /// Internal error.
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Invalid(e.to_string())
    }
}

//! Configuration errors raised when a list initializes.

use thiserror::Error;

use crate::scene::NodeId;

/// Fatal list configuration errors.
///
/// Raised once, by the list's first [`update`](crate::list::SortableList::update),
/// and not recoverable: a failed list keeps returning the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("list '{list}' is not under a canvas; lists must live inside a drawing surface")]
    MissingCanvas { list: String },

    #[error("list '{list}' has no scroll view assigned")]
    MissingScrollView { list: String },

    #[error("list '{list}' refers to {node}, which has no scroll view component")]
    NotAScrollView { list: String, node: NodeId },

    #[error("list node {node} no longer exists")]
    StaleNode { node: NodeId },
}

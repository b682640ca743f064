use postboard_types::{CommentId, PostId};

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Insert of a post whose id is already present.
    #[error("duplicate post id: {0}")]
    DuplicatePost(PostId),

    /// Insert of a comment whose id is already present.
    #[error("duplicate comment id: {0}")]
    DuplicateComment(CommentId),

    /// The backend cannot be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A writer panicked while holding the collection lock.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

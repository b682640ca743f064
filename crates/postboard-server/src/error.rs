use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use postboard_store::StoreError;
use postboard_types::{CommentId, PostId, TypeError};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the resource controller and the server.
///
/// Each variant belongs to one of two classes: user errors (422), where
/// the caller should change the request, and server errors (500), where the
/// caller should retry later.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("post not found: {0}")]
    PostNotFound(PostId),

    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    #[error("comment {comment} is not attached to post {post}")]
    CommentMismatch { post: PostId, comment: CommentId },

    #[error(transparent)]
    InvalidId(#[from] TypeError),

    /// A store failure during an operation whose failures are reported to
    /// the caller as user errors.
    #[error("store rejected request: {0}")]
    StoreRejected(#[source] StoreError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PostNotFound(_)
            | Self::CommentNotFound(_)
            | Self::CommentMismatch { .. }
            | Self::InvalidId(_)
            | Self::StoreRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code carried in the error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PostNotFound(_) | Self::CommentNotFound(_) => "not_found",
            Self::CommentMismatch { .. } => "comment_mismatch",
            Self::InvalidId(_) => "invalid_id",
            Self::StoreRejected(_) | Self::Store(_) => "store_error",
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => "internal",
        }
    }

    pub fn is_user_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "request failed: {self}");
        } else {
            tracing::debug!(code = self.code(), "request rejected: {self}");
        }

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

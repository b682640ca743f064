use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{CommentId, PostId};

/// A stored comment document. `parent` is fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub parent: PostId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(parent: PostId, text: impl Into<String>) -> Self {
        Self {
            id: CommentId::new(),
            parent,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn belongs_to(&self, post: &PostId) -> bool {
        self.parent == *post
    }
}

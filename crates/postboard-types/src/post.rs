use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::comment::Comment;
use crate::id::{CommentId, PostId};

/// A stored post document.
///
/// `comments` holds references in insertion order. The post indexes its
/// children but does not own their lifecycle: comment documents live in a
/// separate collection and are removed independently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub text: String,
    pub comments: Vec<CommentId>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with a fresh id and no comments.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: PostId::new(),
            title: title.into(),
            text: text.into(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// A placeholder document for an upsert against a missing id.
    pub fn empty(id: PostId) -> Self {
        Self {
            id,
            title: String::new(),
            text: String::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a comment reference.
    pub fn push_comment(&mut self, comment: CommentId) {
        self.comments.push(comment);
    }

    /// Remove every occurrence of a comment reference. Returns how many
    /// were removed.
    pub fn pull_comment(&mut self, comment: &CommentId) -> usize {
        let before = self.comments.len();
        self.comments.retain(|c| c != comment);
        before - self.comments.len()
    }
}

/// A post with its comment references expanded to full documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulatedPost {
    pub id: PostId,
    pub title: String,
    pub text: String,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl PopulatedPost {
    /// Join a post with the comments its references resolved to.
    ///
    /// `resolved` is matched against the post's reference list, so the
    /// output keeps reference order and drops references with no document.
    pub fn populate(post: Post, mut resolved: Vec<Comment>) -> Self {
        let comments = post
            .comments
            .iter()
            .filter_map(|id| {
                let pos = resolved.iter().position(|c| c.id == *id)?;
                Some(resolved.swap_remove(pos))
            })
            .collect();
        Self {
            id: post.id,
            title: post.title,
            text: post.text,
            comments,
            created_at: post.created_at,
        }
    }

    pub fn comment_ids(&self) -> Vec<CommentId> {
        self.comments.iter().map(|c| c.id).collect()
    }
}

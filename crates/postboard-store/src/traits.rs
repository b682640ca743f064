use async_trait::async_trait;
use postboard_types::{Comment, CommentId, Post, PostId};

use crate::error::StoreResult;

/// Collection of [`Post`] documents.
///
/// Implementations must be thread-safe and make each call atomic for the
/// single document it touches.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a new post. Fails if the id is already present.
    async fn insert(&self, post: &Post) -> StoreResult<()>;

    /// Returns `Ok(None)` if the post does not exist.
    async fn find_by_id(&self, id: &PostId) -> StoreResult<Option<Post>>;

    /// All posts, in store-defined order.
    async fn find_all(&self) -> StoreResult<Vec<Post>>;

    /// Append `comment` to the post's reference list and return the updated
    /// post, or `None` if the post does not exist.
    async fn push_comment(&self, id: &PostId, comment: &CommentId) -> StoreResult<Option<Post>>;

    /// Remove every occurrence of `comment` from the post's reference list
    /// and return the updated post.
    ///
    /// With `upsert` set, a missing post is first created as an empty
    /// document with this id, so the result is always `Some`. Without it a
    /// missing post yields `None`.
    async fn pull_comment(
        &self,
        id: &PostId,
        comment: &CommentId,
        upsert: bool,
    ) -> StoreResult<Option<Post>>;

    /// Remove a post and return the document as it was.
    async fn remove_by_id(&self, id: &PostId) -> StoreResult<Option<Post>>;

    /// Number of posts in the collection.
    async fn count(&self) -> StoreResult<usize>;
}

/// Collection of [`Comment`] documents.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Persist a new comment. Fails if the id is already present.
    async fn insert(&self, comment: &Comment) -> StoreResult<()>;

    /// Returns `Ok(None)` if the comment does not exist.
    async fn find_by_id(&self, id: &CommentId) -> StoreResult<Option<Comment>>;

    /// Resolve a list of references. Output follows `ids` order and skips
    /// ids with no document.
    async fn find_many(&self, ids: &[CommentId]) -> StoreResult<Vec<Comment>> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(comment) = self.find_by_id(id).await? {
                found.push(comment);
            }
        }
        Ok(found)
    }

    /// Every comment whose `parent` is `post`.
    async fn find_by_parent(&self, post: &PostId) -> StoreResult<Vec<Comment>>;

    /// All comments, in store-defined order.
    async fn find_all(&self) -> StoreResult<Vec<Comment>>;

    /// Remove a comment and return the document as it was.
    async fn remove_by_id(&self, id: &CommentId) -> StoreResult<Option<Comment>>;

    /// Remove every comment whose `parent` is `post`. Returns how many were
    /// removed.
    async fn remove_by_parent(&self, post: &PostId) -> StoreResult<usize>;
}

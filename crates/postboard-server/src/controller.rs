//! The resource controller: post and comment operations over injected
//! stores.
//!
//! Every operation is a short, fixed sequence of store calls. Nothing runs
//! inside a transaction; where two calls must agree (a comment document and
//! its reference in the parent post) the order is chosen so that a failure
//! part-way leaves a state [`ResourceController::reconcile`] can repair.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use postboard_store::{CommentStore, InMemoryCommentStore, InMemoryPostStore, PostStore, StoreResult};
use postboard_types::{Comment, CommentId, PopulatedPost, Post, PostId};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Counts from one [`ResourceController::reconcile`] pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub posts_scanned: usize,
    pub comments_scanned: usize,
    /// References dropped because no live comment with that parent exists.
    pub dangling_refs_removed: usize,
    /// Live comments appended to a parent that did not list them.
    pub links_restored: usize,
    /// Comments deleted because their parent post is gone.
    pub orphans_removed: usize,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.dangling_refs_removed == 0 && self.links_restored == 0 && self.orphans_removed == 0
    }
}

/// Post and comment operations.
///
/// Cheap to clone; clones share the same store handles.
#[derive(Clone)]
pub struct ResourceController {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
}

impl ResourceController {
    pub fn new(posts: Arc<dyn PostStore>, comments: Arc<dyn CommentStore>) -> Self {
        Self { posts, comments }
    }

    /// A controller over fresh in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryPostStore::new()),
            Arc::new(InMemoryCommentStore::new()),
        )
    }

    /// Create a post with no comments. Store failures are server errors.
    pub async fn create_post(&self, title: String, text: String) -> ServerResult<Post> {
        let post = Post::new(title, text);
        self.posts.insert(&post).await?;
        tracing::info!(post = %post.id, "created post");
        Ok(post)
    }

    /// All posts with comments expanded. Store failures are server errors.
    pub async fn list_posts(&self) -> ServerResult<Vec<PopulatedPost>> {
        let posts = self.posts.find_all().await?;
        let mut populated = Vec::with_capacity(posts.len());
        for post in posts {
            populated.push(self.populate(post).await?);
        }
        Ok(populated)
    }

    /// One post with comments expanded. Every failure is a user error.
    pub async fn find_post(&self, id: &PostId) -> ServerResult<PopulatedPost> {
        let post = self
            .posts
            .find_by_id(id)
            .await
            .map_err(ServerError::StoreRejected)?
            .ok_or(ServerError::PostNotFound(*id))?;
        self.populate(post).await.map_err(ServerError::StoreRejected)
    }

    /// Create a comment under `post_id` and link it from the post.
    ///
    /// The comment document is written before the reference. If the link
    /// step fails the comment is removed again. Every failure is a user
    /// error.
    pub async fn add_comment(&self, post_id: &PostId, text: String) -> ServerResult<Post> {
        self.posts
            .find_by_id(post_id)
            .await
            .map_err(ServerError::StoreRejected)?
            .ok_or(ServerError::PostNotFound(*post_id))?;

        let comment = Comment::new(*post_id, text);
        self.comments
            .insert(&comment)
            .await
            .map_err(ServerError::StoreRejected)?;

        let linked = self.posts.push_comment(post_id, &comment.id).await;
        match linked {
            Ok(Some(post)) => {
                tracing::info!(post = %post_id, comment = %comment.id, "added comment");
                Ok(post)
            }
            Ok(None) => {
                self.unlink_failed(&comment).await;
                Err(ServerError::PostNotFound(*post_id))
            }
            Err(e) => {
                self.unlink_failed(&comment).await;
                Err(ServerError::StoreRejected(e))
            }
        }
    }

    /// Delete a comment and pull its reference from the parent.
    ///
    /// The parent update upserts, so a parent removed concurrently comes
    /// back as an empty document. Every failure is a user error; if the
    /// comment cannot be deleted the post is left untouched.
    pub async fn delete_comment(&self, post_id: &PostId, comment_id: &CommentId) -> ServerResult<Post> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await
            .map_err(ServerError::StoreRejected)?
            .ok_or(ServerError::CommentNotFound(*comment_id))?;
        if !comment.belongs_to(post_id) {
            return Err(ServerError::CommentMismatch {
                post: *post_id,
                comment: *comment_id,
            });
        }

        self.comments
            .remove_by_id(comment_id)
            .await
            .map_err(ServerError::StoreRejected)?
            .ok_or(ServerError::CommentNotFound(*comment_id))?;

        let post = self
            .posts
            .pull_comment(post_id, comment_id, true)
            .await
            .map_err(ServerError::StoreRejected)?
            .ok_or(ServerError::PostNotFound(*post_id))?;
        tracing::info!(post = %post_id, comment = %comment_id, "deleted comment");
        Ok(post)
    }

    /// Delete a post, then every comment whose parent it is.
    ///
    /// Returns the post as it was removed, or `None` if there was no such
    /// post. The comment cascade runs either way. Store failures are server
    /// errors.
    pub async fn delete_post(&self, post_id: &PostId) -> ServerResult<Option<Post>> {
        let removed = self.posts.remove_by_id(post_id).await?;
        let cascaded = self.comments.remove_by_parent(post_id).await?;
        tracing::info!(
            post = %post_id,
            found = removed.is_some(),
            comments_removed = cascaded,
            "deleted post"
        );
        Ok(removed)
    }

    /// Repair the post/comment references.
    ///
    /// Drops references that no longer resolve to a live child, restores
    /// references to live children their parent does not list, and deletes
    /// comments whose parent is gone. Running it twice in a row finds
    /// nothing the second time unless writes happened in between.
    ///
    /// The pass works from two snapshots but only ever writes through the
    /// stores' single-document updates, re-reading before each one, so
    /// requests that land while it runs are never undone.
    pub async fn reconcile(&self) -> ServerResult<ReconcileReport> {
        let posts = self.posts.find_all().await?;
        let comments = self.comments.find_all().await?;
        let mut report = ReconcileReport {
            posts_scanned: posts.len(),
            comments_scanned: comments.len(),
            ..ReconcileReport::default()
        };

        let post_ids: HashSet<PostId> = posts.iter().map(|p| p.id).collect();
        let mut children: HashMap<PostId, Vec<CommentId>> = HashMap::new();
        for comment in &comments {
            if post_ids.contains(&comment.parent) {
                children.entry(comment.parent).or_default().push(comment.id);
                continue;
            }
            // The parent may have been created after the post snapshot.
            if self.posts.find_by_id(&comment.parent).await?.is_some() {
                continue;
            }
            if self.comments.remove_by_id(&comment.id).await?.is_some() {
                tracing::info!(comment = %comment.id, parent = %comment.parent, "removed orphan comment");
                report.orphans_removed += 1;
            }
        }

        for post in posts {
            let live = children.remove(&post.id).unwrap_or_default();
            let live_set: HashSet<CommentId> = live.iter().copied().collect();
            let (dropped, restored) = self.repair_post(&post, &live, &live_set).await?;
            if dropped > 0 || restored > 0 {
                tracing::info!(post = %post.id, dropped, restored, "repaired comment references");
                report.dangling_refs_removed += dropped;
                report.links_restored += restored;
            }
        }

        Ok(report)
    }

    /// Fix one post's reference list. `live` holds the post's children from
    /// the comment snapshot, in creation order. Returns
    /// `(references dropped, references restored)`.
    async fn repair_post(
        &self,
        post: &Post,
        live: &[CommentId],
        live_set: &HashSet<CommentId>,
    ) -> StoreResult<(usize, usize)> {
        let mut occurrences: Vec<(CommentId, usize)> = Vec::new();
        for id in &post.comments {
            match occurrences.iter_mut().find(|(seen, _)| seen == id) {
                Some((_, n)) => *n += 1,
                None => occurrences.push((*id, 1)),
            }
        }

        let mut dropped = 0;
        for (id, n) in occurrences {
            if !live_set.contains(&id) {
                // Ids are never reused, so a reference with no document
                // can only be stale.
                self.posts.pull_comment(&post.id, &id, false).await?;
                dropped += n;
            } else if n > 1 {
                self.posts.pull_comment(&post.id, &id, false).await?;
                if self.comments.find_by_id(&id).await?.is_some() {
                    self.posts.push_comment(&post.id, &id).await?;
                    dropped += n - 1;
                } else {
                    dropped += n;
                }
            }
        }

        let mut restored = 0;
        for id in live.iter().filter(|id| !post.comments.contains(id)) {
            let Some(current) = self.posts.find_by_id(&post.id).await? else {
                break;
            };
            if current.comments.contains(id) || self.comments.find_by_id(id).await?.is_none() {
                continue;
            }
            if self.posts.push_comment(&post.id, id).await?.is_some() {
                restored += 1;
            }
        }

        Ok((dropped, restored))
    }

    async fn populate(&self, post: Post) -> StoreResult<PopulatedPost> {
        let resolved = self.comments.find_many(&post.comments).await?;
        Ok(PopulatedPost::populate(post, resolved))
    }

    async fn unlink_failed(&self, comment: &Comment) {
        if let Err(e) = self.comments.remove_by_id(&comment.id).await {
            tracing::warn!(
                comment = %comment.id,
                parent = %comment.parent,
                "could not remove unlinked comment: {e}"
            );
        }
    }
}

impl std::fmt::Debug for ResourceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceController").finish_non_exhaustive()
    }
}

//! In-memory collections for tests and embedding.
//!
//! Both stores keep documents in a `HashMap` behind a `RwLock`. The lock is
//! held only for the duration of one call, which is what gives each call
//! its single-document atomicity. Data is lost when the store is dropped.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use postboard_types::{Comment, CommentId, Post, PostId};

use crate::error::{StoreError, StoreResult};
use crate::traits::{CommentStore, PostStore};

fn read_lock<T>(lock: &RwLock<T>) -> StoreResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|e| StoreError::Poisoned(e.to_string()))
}

fn write_lock<T>(lock: &RwLock<T>) -> StoreResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|e| StoreError::Poisoned(e.to_string()))
}

/// An in-memory implementation of [`PostStore`].
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    posts: RwLock<HashMap<PostId, Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(&self, post: &Post) -> StoreResult<()> {
        let mut posts = write_lock(&self.posts)?;
        if posts.contains_key(&post.id) {
            return Err(StoreError::DuplicatePost(post.id));
        }
        posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> StoreResult<Option<Post>> {
        Ok(read_lock(&self.posts)?.get(id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Post>> {
        let posts = read_lock(&self.posts)?;
        let mut all: Vec<Post> = posts.values().cloned().collect();
        // UUID v7 ids sort in creation order.
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn push_comment(&self, id: &PostId, comment: &CommentId) -> StoreResult<Option<Post>> {
        let mut posts = write_lock(&self.posts)?;
        Ok(posts.get_mut(id).map(|post| {
            post.push_comment(*comment);
            post.clone()
        }))
    }

    async fn pull_comment(
        &self,
        id: &PostId,
        comment: &CommentId,
        upsert: bool,
    ) -> StoreResult<Option<Post>> {
        let mut posts = write_lock(&self.posts)?;
        if upsert && !posts.contains_key(id) {
            tracing::debug!(post = %id, "upserting empty post on pull");
            posts.insert(*id, Post::empty(*id));
        }
        Ok(posts.get_mut(id).map(|post| {
            post.pull_comment(comment);
            post.clone()
        }))
    }

    async fn remove_by_id(&self, id: &PostId) -> StoreResult<Option<Post>> {
        Ok(write_lock(&self.posts)?.remove(id))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(read_lock(&self.posts)?.len())
    }
}

/// An in-memory implementation of [`CommentStore`].
#[derive(Debug, Default)]
pub struct InMemoryCommentStore {
    comments: RwLock<HashMap<CommentId, Comment>>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn insert(&self, comment: &Comment) -> StoreResult<()> {
        let mut comments = write_lock(&self.comments)?;
        if comments.contains_key(&comment.id) {
            return Err(StoreError::DuplicateComment(comment.id));
        }
        comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CommentId) -> StoreResult<Option<Comment>> {
        Ok(read_lock(&self.comments)?.get(id).cloned())
    }

    async fn find_many(&self, ids: &[CommentId]) -> StoreResult<Vec<Comment>> {
        let comments = read_lock(&self.comments)?;
        Ok(ids.iter().filter_map(|id| comments.get(id).cloned()).collect())
    }

    async fn find_by_parent(&self, post: &PostId) -> StoreResult<Vec<Comment>> {
        let comments = read_lock(&self.comments)?;
        let mut children: Vec<Comment> = comments
            .values()
            .filter(|c| c.belongs_to(post))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(children)
    }

    async fn find_all(&self) -> StoreResult<Vec<Comment>> {
        let comments = read_lock(&self.comments)?;
        let mut all: Vec<Comment> = comments.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn remove_by_id(&self, id: &CommentId) -> StoreResult<Option<Comment>> {
        Ok(write_lock(&self.comments)?.remove(id))
    }

    async fn remove_by_parent(&self, post: &PostId) -> StoreResult<usize> {
        let mut comments = write_lock(&self.comments)?;
        let before = comments.len();
        comments.retain(|_, c| !c.belongs_to(post));
        Ok(before - comments.len())
    }
}

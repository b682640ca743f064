//! Store wrappers that fail named operations on demand.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use postboard_store::{
    CommentStore, InMemoryCommentStore, InMemoryPostStore, PostStore, StoreError, StoreResult,
};
use postboard_types::{Comment, CommentId, Post, PostId};

use crate::controller::ResourceController;

#[derive(Default)]
struct Faults(Mutex<HashSet<&'static str>>);

impl Faults {
    fn set(&self, op: &'static str) {
        self.0.lock().unwrap().insert(op);
    }

    fn check(&self, op: &'static str) -> StoreResult<()> {
        if self.0.lock().unwrap().contains(op) {
            return Err(StoreError::Unavailable(format!("injected failure in {op}")));
        }
        Ok(())
    }
}

type Hook = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

/// A one-shot callback run after a `find_all` snapshot is taken, used to
/// interleave writes with a multi-step read.
#[derive(Default)]
struct AfterFindAll(Mutex<Option<Hook>>);

impl AfterFindAll {
    fn set<F, Fut>(&self, hook: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        *self.0.lock().unwrap() = Some(Box::new(move || Box::pin(hook())));
    }

    async fn run(&self) {
        let hook = self.0.lock().unwrap().take();
        if let Some(hook) = hook {
            hook().await;
        }
    }
}

#[derive(Default)]
pub struct FaultyPostStore {
    inner: InMemoryPostStore,
    faults: Faults,
    after_find_all: AfterFindAll,
}

impl FaultyPostStore {
    pub fn fail_on(&self, op: &'static str) {
        self.faults.set(op);
    }

    /// Run `hook` once, right after the next `find_all` has read its snapshot.
    pub fn after_find_all<F, Fut>(&self, hook: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.after_find_all.set(hook);
    }
}

#[async_trait]
impl PostStore for FaultyPostStore {
    async fn insert(&self, post: &Post) -> StoreResult<()> {
        self.faults.check("insert")?;
        self.inner.insert(post).await
    }

    async fn find_by_id(&self, id: &PostId) -> StoreResult<Option<Post>> {
        self.faults.check("find_by_id")?;
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Post>> {
        self.faults.check("find_all")?;
        let snapshot = self.inner.find_all().await?;
        self.after_find_all.run().await;
        Ok(snapshot)
    }

    async fn push_comment(&self, id: &PostId, comment: &CommentId) -> StoreResult<Option<Post>> {
        self.faults.check("push_comment")?;
        self.inner.push_comment(id, comment).await
    }

    async fn pull_comment(
        &self,
        id: &PostId,
        comment: &CommentId,
        upsert: bool,
    ) -> StoreResult<Option<Post>> {
        self.faults.check("pull_comment")?;
        self.inner.pull_comment(id, comment, upsert).await
    }

    async fn remove_by_id(&self, id: &PostId) -> StoreResult<Option<Post>> {
        self.faults.check("remove_by_id")?;
        self.inner.remove_by_id(id).await
    }

    async fn count(&self) -> StoreResult<usize> {
        self.inner.count().await
    }
}

#[derive(Default)]
pub struct FaultyCommentStore {
    inner: InMemoryCommentStore,
    faults: Faults,
    after_find_all: AfterFindAll,
}

impl FaultyCommentStore {
    pub fn fail_on(&self, op: &'static str) {
        self.faults.set(op);
    }

    /// Run `hook` once, right after the next `find_all` has read its snapshot.
    pub fn after_find_all<F, Fut>(&self, hook: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.after_find_all.set(hook);
    }
}

#[async_trait]
impl CommentStore for FaultyCommentStore {
    async fn insert(&self, comment: &Comment) -> StoreResult<()> {
        self.faults.check("insert")?;
        self.inner.insert(comment).await
    }

    async fn find_by_id(&self, id: &CommentId) -> StoreResult<Option<Comment>> {
        self.faults.check("find_by_id")?;
        self.inner.find_by_id(id).await
    }

    async fn find_many(&self, ids: &[CommentId]) -> StoreResult<Vec<Comment>> {
        self.faults.check("find_many")?;
        self.inner.find_many(ids).await
    }

    async fn find_by_parent(&self, post: &PostId) -> StoreResult<Vec<Comment>> {
        self.faults.check("find_by_parent")?;
        self.inner.find_by_parent(post).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Comment>> {
        self.faults.check("find_all")?;
        let snapshot = self.inner.find_all().await?;
        self.after_find_all.run().await;
        Ok(snapshot)
    }

    async fn remove_by_id(&self, id: &CommentId) -> StoreResult<Option<Comment>> {
        self.faults.check("remove_by_id")?;
        self.inner.remove_by_id(id).await
    }

    async fn remove_by_parent(&self, post: &PostId) -> StoreResult<usize> {
        self.faults.check("remove_by_parent")?;
        self.inner.remove_by_parent(post).await
    }
}

/// A controller over faulty stores, plus handles to inject failures.
pub fn faulty_controller() -> (ResourceController, Arc<FaultyPostStore>, Arc<FaultyCommentStore>) {
    let posts = Arc::new(FaultyPostStore::default());
    let comments = Arc::new(FaultyCommentStore::default());
    let controller = ResourceController::new(posts.clone(), comments.clone());
    (controller, posts, comments)
}

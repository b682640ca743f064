//! Document storage for postboard.
//!
//! Two independent collections back the API: posts and comments. Each is a
//! plain keyed document store with atomic single-document operations; no
//! operation spans both collections. Keeping the post's comment index in
//! step with the comment collection is the caller's job.
//!
//! # Storage Backends
//!
//! Both collections are traits so callers can hold them as injected handles:
//!
//! - [`PostStore`] / [`InMemoryPostStore`]
//! - [`CommentStore`] / [`InMemoryCommentStore`]
//!
//! # Design Rules
//!
//! 1. Every call touches at most one document atomically, except the bulk
//!    `remove_by_parent`, which is atomic per call on the comment collection.
//! 2. Array updates (`push_comment`, `pull_comment`) are find-and-update:
//!    they return the document as it is after the update.
//! 3. Missing documents are `Ok(None)`, never an error.
//! 4. Backend failures are propagated, never retried.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryCommentStore, InMemoryPostStore};
pub use traits::{CommentStore, PostStore};

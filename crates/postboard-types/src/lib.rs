//! Domain types for postboard.
//!
//! Posts and comments are stored as two independent document collections.
//! A [`Post`] is the authoritative index of its children through its
//! ordered `comments` list; each [`Comment`] names its owning post through
//! `parent`.
//!
//! # Key Types
//!
//! - [`PostId`] / [`CommentId`] — UUID v7 document identifiers
//! - [`Post`] — stored post document holding comment references
//! - [`Comment`] — stored comment document
//! - [`PopulatedPost`] — read shape with references expanded to full comments

pub mod comment;
pub mod error;
pub mod id;
pub mod post;

pub use comment::Comment;
pub use error::TypeError;
pub use id::{CommentId, PostId};
pub use post::{PopulatedPost, Post};

//! HTTP server for postboard.
//!
//! Serves posts and their comments as a REST resource API. Requests go
//! through the [`ResourceController`], which sequences calls against the
//! injected post and comment stores and maps failures to `422` (user
//! error) or `500` (server error).

pub mod config;
pub mod controller;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

#[cfg(test)]
mod testing;

pub use config::ServerConfig;
pub use controller::{ReconcileReport, ResourceController};
pub use error::{ServerError, ServerResult};
pub use handler::{AddCommentRequest, CreatePostRequest, HealthResponse};
pub use server::PostboardServer;

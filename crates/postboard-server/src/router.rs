use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::controller::ResourceController;
use crate::handler;

/// HTTP paths served by postboard.
pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const POSTS: &str = "/posts";
    pub const POST: &str = "/posts/:id";
    pub const COMMENTS: &str = "/posts/:id/comments";
    pub const COMMENT: &str = "/posts/:id/comments/:comment_id";
    pub const RECONCILE: &str = "/maintenance/reconcile";
}

/// Build the axum router with all postboard endpoints.
pub fn build_router(controller: ResourceController, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(
            endpoints::POSTS,
            get(handler::list_posts).post(handler::create_post),
        )
        .route(
            endpoints::POST,
            get(handler::find_post).delete(handler::delete_post),
        )
        .route(endpoints::COMMENTS, post(handler::add_comment))
        .route(endpoints::COMMENT, delete(handler::delete_comment))
        .route(endpoints::RECONCILE, post(handler::reconcile))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(controller);

    if config.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

use axum::extract::{Path, State};
use axum::response::Json;
use postboard_types::{CommentId, PopulatedPost, Post, PostId};
use serde::{Deserialize, Serialize};

use crate::controller::{ReconcileReport, ResourceController};
use crate::error::ServerResult;

/// Body of `POST /posts`. Missing fields are stored as empty text.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

/// Body of `POST /posts/:id/comments`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AddCommentRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

pub async fn create_post(
    State(controller): State<ResourceController>,
    Json(body): Json<CreatePostRequest>,
) -> ServerResult<Json<Post>> {
    let post = controller.create_post(body.title, body.text).await?;
    Ok(Json(post))
}

pub async fn list_posts(
    State(controller): State<ResourceController>,
) -> ServerResult<Json<Vec<PopulatedPost>>> {
    Ok(Json(controller.list_posts().await?))
}

pub async fn find_post(
    State(controller): State<ResourceController>,
    Path(id): Path<String>,
) -> ServerResult<Json<PopulatedPost>> {
    let id = PostId::parse(&id)?;
    Ok(Json(controller.find_post(&id).await?))
}

pub async fn add_comment(
    State(controller): State<ResourceController>,
    Path(id): Path<String>,
    Json(body): Json<AddCommentRequest>,
) -> ServerResult<Json<Post>> {
    let id = PostId::parse(&id)?;
    Ok(Json(controller.add_comment(&id, body.text).await?))
}

pub async fn delete_comment(
    State(controller): State<ResourceController>,
    Path((id, comment_id)): Path<(String, String)>,
) -> ServerResult<Json<Post>> {
    let id = PostId::parse(&id)?;
    let comment_id = CommentId::parse(&comment_id)?;
    Ok(Json(controller.delete_comment(&id, &comment_id).await?))
}

/// Responds with the removed post, or `null` if there was none.
pub async fn delete_post(
    State(controller): State<ResourceController>,
    Path(id): Path<String>,
) -> ServerResult<Json<Option<Post>>> {
    let id = PostId::parse(&id)?;
    Ok(Json(controller.delete_post(&id).await?))
}

pub async fn reconcile(
    State(controller): State<ResourceController>,
) -> ServerResult<Json<ReconcileReport>> {
    Ok(Json(controller.reconcile().await?))
}

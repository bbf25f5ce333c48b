/// Comment endpoints.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::Identity;
use crate::error::{AppError, Result};
use crate::handlers::{refusal, AppState};
use crate::services::{authorize, Action};

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

/// POST /posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    if let Some(response) = refusal(authorize(identity, &Action::AddComment)) {
        return Ok(response);
    }
    let author_id = identity
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("commenting requires a signed-in user".into()))?;

    let comment = state
        .comments
        .add_comment(path.into_inner(), author_id, body.into_inner().text)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// GET /posts/{id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    if state.posts.get_post(post_id).await?.is_none() {
        return Err(AppError::NotFound("post".to_string()));
    }
    let comments = state.comments.comments_for_post(post_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

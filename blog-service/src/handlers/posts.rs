/// Post CRUD endpoints.
///
/// Mutations run through the access policy before any store work: anonymous
/// callers bounce to the login page, non-owners bounce to the post's read
/// view.
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Comment, Identity, Post};
use crate::error::{AppError, Result};
use crate::handlers::{refusal, AppState};
use crate::services::{authorize, Action, NewPost, PostUpdate};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct PostDetailResponse {
    post: Post,
    comments: Vec<Comment>,
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    if let Some(response) = refusal(authorize(identity, &Action::CreatePost)) {
        return Ok(response);
    }
    let author_id = identity
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("creating a post requires a signed-in user".into()))?;

    let body = body.into_inner();
    let post = state
        .posts
        .create_post(
            author_id,
            NewPost {
                text: body.text,
                group_id: body.group_id,
                image_key: body.image_key,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(post))
}

/// GET /posts/{id}
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .get_post(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("post".to_string()))?;
    let comments = state.comments.comments_for_post(post_id).await?;
    Ok(HttpResponse::Ok().json(PostDetailResponse { post, comments }))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .get_post(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("post".to_string()))?;

    let action = Action::EditPost {
        post_id,
        author_id: post.author_id,
    };
    if let Some(response) = refusal(authorize(identity, &action)) {
        return Ok(response);
    }

    let body = body.into_inner();
    let updated = state
        .posts
        .edit_post(
            post_id,
            PostUpdate {
                text: body.text,
                group_id: body.group_id,
                image_key: body.image_key,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .get_post(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("post".to_string()))?;

    let action = Action::DeletePost {
        post_id,
        author_id: post.author_id,
    };
    if let Some(response) = refusal(authorize(identity, &action)) {
        return Ok(response);
    }

    state.posts.delete_post(post_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

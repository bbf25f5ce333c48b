/// Follow graph endpoints.
use actix_web::{web, HttpResponse};

use crate::domain::Identity;
use crate::error::{AppError, Result};
use crate::handlers::{refusal, AppState};
use crate::services::{authorize, Action};

/// POST /users/{username}/follow
pub async fn follow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    if let Some(response) = refusal(authorize(identity, &Action::Follow)) {
        return Ok(response);
    }
    let follower_id = identity
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("following requires a signed-in user".into()))?;

    state.follows.follow(follower_id, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /users/{username}/follow
pub async fn unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    if let Some(response) = refusal(authorize(identity, &Action::Unfollow)) {
        return Ok(response);
    }
    let follower_id = identity
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("unfollowing requires a signed-in user".into()))?;

    state
        .follows
        .unfollow(follower_id, &path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

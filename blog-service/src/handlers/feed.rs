/// Feed and profile read endpoints.
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::{Author, Group, Identity};
use crate::error::Result;
use crate::handlers::{refusal, AppState};
use crate::services::{authorize, page_from_query, Action, FeedPage, Viewpoint};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Raw page parameter; anything unparsable falls back to page 1.
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
struct GroupFeedResponse {
    group: Group,
    feed: FeedPage,
}

#[derive(Debug, Serialize)]
struct ProfileResponse {
    author: Author,
    /// Whether the signed-in viewer follows this author.
    following: bool,
    feed: FeedPage,
}

/// GET /feed - the global timeline, newest first.
pub async fn home_feed(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = page_from_query(query.page.as_deref());
    let feed = state.feed.build_feed(&Viewpoint::Global, page).await?;
    Ok(HttpResponse::Ok().json(feed))
}

/// GET /feed/following - posts by authors the viewer follows.
pub async fn following_feed(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    if let Some(response) = refusal(authorize(identity, &Action::ViewFollowFeed)) {
        return Ok(response);
    }
    let page = page_from_query(query.page.as_deref());
    let feed = state
        .feed
        .build_feed(&Viewpoint::ByFollowing(identity), page)
        .await?;
    Ok(HttpResponse::Ok().json(feed))
}

/// GET /groups/{slug}/posts - a group's timeline.
pub async fn group_feed(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let slug = path.into_inner();
    let group = state.feed.resolve_group(&slug).await?;
    let page = page_from_query(query.page.as_deref());
    let feed = state.feed.build_feed(&Viewpoint::ByGroup(slug), page).await?;
    Ok(HttpResponse::Ok().json(GroupFeedResponse { group, feed }))
}

/// GET /users/{username} - an author's profile with their timeline.
pub async fn profile(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    let author = state.feed.resolve_author(&username).await?;

    let following = match identity.user_id() {
        Some(viewer) => state.follows.is_following(viewer, author.id).await?,
        None => false,
    };

    let page = page_from_query(query.page.as_deref());
    let feed = state
        .feed
        .build_feed(&Viewpoint::ByAuthor(username), page)
        .await?;
    Ok(HttpResponse::Ok().json(ProfileResponse {
        author,
        following,
        feed,
    }))
}

/// HTTP request handlers
///
/// Thin translation between the JSON surface and the services: handlers ask
/// the access policy first, act on its decision, and let `AppError`'s
/// `ResponseError` impl render failures. Redirect decisions become
/// `303 See Other`.
pub mod comments;
pub mod feed;
pub mod follows;
pub mod posts;

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::header;
use actix_web::{web, HttpResponse};

use timeline_cache::{Clock, SystemClock, TtlCache};

use crate::repository::BlogStore;
use crate::services::{
    CommentService, Decision, FeedService, FollowService, PostService,
};

/// State shared across workers.
pub struct AppState {
    pub store: Arc<dyn BlogStore>,
    pub feed: FeedService,
    pub posts: PostService,
    pub comments: CommentService,
    pub follows: FollowService,
}

impl AppState {
    pub fn new(store: Arc<dyn BlogStore>, page_size: u32, cache_ttl: Duration) -> Self {
        Self::with_clock(store, page_size, cache_ttl, Arc::new(SystemClock))
    }

    /// Like `new`, but with an injected clock so cache expiry is testable.
    pub fn with_clock(
        store: Arc<dyn BlogStore>,
        page_size: u32,
        cache_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = Arc::new(TtlCache::with_clock(cache_ttl, clock));
        Self {
            feed: FeedService::new(store.clone(), cache.clone(), page_size),
            posts: PostService::new(store.clone(), cache),
            comments: CommentService::new(store.clone()),
            follows: FollowService::new(store.clone()),
            store,
        }
    }
}

/// Route table, mounted under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/feed")
            .route("", web::get().to(feed::home_feed))
            .route("/following", web::get().to(feed::following_feed)),
    )
    .service(web::scope("/groups").route("/{slug}/posts", web::get().to(feed::group_feed)))
    .service(
        web::scope("/users")
            .route("/{username}", web::get().to(feed::profile))
            .route("/{username}/follow", web::post().to(follows::follow))
            .route("/{username}/follow", web::delete().to(follows::unfollow)),
    )
    .service(
        web::scope("/posts")
            .route("", web::post().to(posts::create_post))
            .route("/{id}", web::get().to(posts::post_detail))
            .route("/{id}", web::put().to(posts::update_post))
            .route("/{id}", web::delete().to(posts::delete_post))
            .route("/{id}/comments", web::get().to(comments::list_comments))
            .route("/{id}/comments", web::post().to(comments::add_comment)),
    );
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Turn a policy decision into an early response, or `None` for `Allow`.
pub(crate) fn refusal(decision: Decision) -> Option<HttpResponse> {
    match decision {
        Decision::Allow => None,
        Decision::RedirectToLogin => Some(see_other("/auth/login")),
        Decision::RedirectToPost(post_id) => Some(see_other(&format!("/api/v1/posts/{post_id}"))),
    }
}

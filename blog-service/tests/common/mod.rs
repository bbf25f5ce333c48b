#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use blog_service::domain::{Author, Comment, Group, Post};
use blog_service::repository::{BlogStore, MemoryBlogStore};

/// Fixed reference instant so orderings are deterministic.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub async fn seed_author(store: &MemoryBlogStore, username: &str) -> Author {
    let author = Author {
        id: Uuid::new_v4(),
        username: username.to_string(),
    };
    store.upsert_author(&author).await.unwrap();
    author
}

pub async fn seed_group(store: &MemoryBlogStore, slug: &str) -> Group {
    let group = Group {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: format!("{slug} group"),
        description: String::new(),
    };
    store.create_group(&group).await.unwrap();
    group
}

/// A post created `minutes` after the reference instant.
pub fn post_at(author_id: Uuid, group_id: Option<Uuid>, text: &str, minutes: i64) -> Post {
    Post {
        id: Uuid::new_v4(),
        author_id,
        group_id,
        text: text.to_string(),
        image_key: None,
        created_at: base_time() + Duration::minutes(minutes),
    }
}

pub async fn seed_post(store: &MemoryBlogStore, post: &Post) {
    store.insert_post(post).await.unwrap();
}

pub async fn seed_comment(store: &MemoryBlogStore, post_id: Uuid, author_id: Uuid, text: &str) {
    let comment = Comment {
        id: Uuid::new_v4(),
        post_id,
        author_id,
        text: text.to_string(),
        created_at: Utc::now(),
    };
    store.insert_comment(&comment).await.unwrap();
}

/// Entity Store boundary
///
/// `BlogStore` is the repository interface the core talks to; persistence,
/// uniqueness, and referential integrity live behind it. Two backends
/// implement it: `PostgresBlogStore` (production) and `MemoryBlogStore`
/// (tests, local runs). Both are required to honor the same on-delete
/// policy: deleting a group nulls `posts.group_id`, deleting a post removes
/// its comments.
pub mod memory;
pub mod postgres;

pub use memory::MemoryBlogStore;
pub use postgres::PostgresBlogStore;

use uuid::Uuid;

use crate::domain::{Author, Comment, Follow, Group, Post};
use crate::error::Result;

/// Which base set of posts a feed query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post
    All,
    /// Posts tagged to one group
    Group(Uuid),
    /// Posts by one author
    Author(Uuid),
    /// Posts by any of a set of authors (the follow feed)
    Authors(Vec<Uuid>),
}

/// Data persistence contract for the four relations plus author lookup.
///
/// `list_posts` must return posts ordered by `created_at` descending with
/// ties broken by `id` descending, so pagination is deterministic across
/// backends.
#[async_trait::async_trait]
pub trait BlogStore: Send + Sync {
    // Authors
    async fn upsert_author(&self, author: &Author) -> Result<()>;
    async fn find_author(&self, id: Uuid) -> Result<Option<Author>>;
    async fn find_author_by_username(&self, username: &str) -> Result<Option<Author>>;

    // Groups
    async fn create_group(&self, group: &Group) -> Result<()>;
    async fn find_group(&self, id: Uuid) -> Result<Option<Group>>;
    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>>;
    /// Deletes the group; posts referencing it keep living with a null
    /// group reference.
    async fn delete_group(&self, id: Uuid) -> Result<()>;

    // Posts
    async fn insert_post(&self, post: &Post) -> Result<()>;
    /// Updates text, group, and image of an existing post. Author and
    /// creation timestamp are immutable.
    async fn update_post(&self, post: &Post) -> Result<()>;
    /// Deletes the post and, with it, its comments.
    async fn delete_post(&self, id: Uuid) -> Result<()>;
    async fn find_post(&self, id: Uuid) -> Result<Option<Post>>;
    async fn list_posts(&self, filter: &PostFilter, limit: i64, offset: i64)
        -> Result<Vec<Post>>;
    async fn count_posts(&self, filter: &PostFilter) -> Result<i64>;

    // Comments
    async fn insert_comment(&self, comment: &Comment) -> Result<()>;
    /// Comments of a post, oldest first.
    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>>;

    // Follows
    /// Idempotent: returns true if a new edge was inserted.
    async fn insert_follow(&self, follow: &Follow) -> Result<bool>;
    /// Idempotent: returns true if an edge was removed.
    async fn delete_follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool>;
    async fn is_following(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool>;
    /// Authors the given user follows.
    async fn following_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>>;
}

/// Follow graph - the directed user→author relation.
///
/// Follow and unfollow are idempotent; a self-follow is disallowed but
/// deliberately silent, not an error. These two no-ops are the only places
/// in the core where an outcome is swallowed.
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Author, Follow};
use crate::error::{AppError, Result};
use crate::repository::BlogStore;

pub struct FollowService {
    store: Arc<dyn BlogStore>,
}

impl FollowService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    async fn resolve(&self, username: &str) -> Result<Author> {
        self.store
            .find_author_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("author '{username}'")))
    }

    /// Create the follow edge follower→author. Following yourself or an
    /// already-followed author is a no-op.
    pub async fn follow(&self, follower_id: Uuid, author_username: &str) -> Result<()> {
        let author = self.resolve(author_username).await?;
        if follower_id == author.id {
            debug!(%follower_id, "ignored self-follow");
            return Ok(());
        }
        let edge = Follow {
            follower_id,
            author_id: author.id,
            created_at: Utc::now(),
        };
        let inserted = self.store.insert_follow(&edge).await?;
        if inserted {
            debug!(%follower_id, author_id = %author.id, "created follow edge");
        }
        Ok(())
    }

    /// Remove the follow edge; an absent edge is a no-op.
    pub async fn unfollow(&self, follower_id: Uuid, author_username: &str) -> Result<()> {
        let author = self.resolve(author_username).await?;
        let removed = self.store.delete_follow(follower_id, author.id).await?;
        if removed {
            debug!(%follower_id, author_id = %author.id, "removed follow edge");
        }
        Ok(())
    }

    pub async fn is_following(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        self.store.is_following(follower_id, author_id).await
    }

    /// Authors the given user follows, as consumed by the follow feed.
    pub async fn following(&self, follower_id: Uuid) -> Result<Vec<Uuid>> {
        self.store.following_ids(follower_id).await
    }
}

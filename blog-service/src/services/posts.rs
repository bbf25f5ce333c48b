/// Post service - validated post mutations.
///
/// Ownership is decided upstream by the access policy; this service assumes
/// the caller is already allowed to act. Every successful store write clears
/// the whole global timeline cache: a single mutation can reshuffle every
/// page, so per-page invalidation would be wrong.
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use timeline_cache::TtlCache;

use crate::domain::Post;
use crate::error::{AppError, Result};
use crate::repository::BlogStore;
use crate::services::feed::FeedPage;

/// Fields accepted when creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image_key: Option<String>,
}

/// Fields an author may change on their post. Author and creation timestamp
/// are immutable.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image_key: Option<String>,
}

pub struct PostService {
    store: Arc<dyn BlogStore>,
    cache: Arc<TtlCache<u32, FeedPage>>,
}

impl PostService {
    pub fn new(store: Arc<dyn BlogStore>, cache: Arc<TtlCache<u32, FeedPage>>) -> Self {
        Self { store, cache }
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        self.store.find_post(post_id).await
    }

    pub async fn create_post(&self, author_id: Uuid, new: NewPost) -> Result<Post> {
        self.validate_text(&new.text)?;
        self.validate_group(new.group_id).await?;

        let post = Post {
            id: Uuid::new_v4(),
            author_id,
            group_id: new.group_id,
            text: new.text,
            image_key: new.image_key,
            created_at: Utc::now(),
        };
        self.store.insert_post(&post).await?;
        self.invalidate_global("create");
        Ok(post)
    }

    pub async fn edit_post(&self, post_id: Uuid, update: PostUpdate) -> Result<Post> {
        self.validate_text(&update.text)?;
        self.validate_group(update.group_id).await?;

        let mut post = self
            .store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post".to_string()))?;

        post.text = update.text;
        post.group_id = update.group_id;
        post.image_key = update.image_key;
        self.store.update_post(&post).await?;
        self.invalidate_global("edit");
        Ok(post)
    }

    pub async fn delete_post(&self, post_id: Uuid) -> Result<()> {
        if self.store.find_post(post_id).await?.is_none() {
            return Err(AppError::NotFound("post".to_string()));
        }
        self.store.delete_post(post_id).await?;
        self.invalidate_global("delete");
        Ok(())
    }

    fn validate_text(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(AppError::invalid_field("text", "post text must not be empty"));
        }
        Ok(())
    }

    async fn validate_group(&self, group_id: Option<Uuid>) -> Result<()> {
        if let Some(id) = group_id {
            if self.store.find_group(id).await?.is_none() {
                return Err(AppError::invalid_field("group", "unknown group"));
            }
        }
        Ok(())
    }

    fn invalidate_global(&self, cause: &str) {
        self.cache.clear();
        debug!(cause, "global timeline cache invalidated");
    }
}

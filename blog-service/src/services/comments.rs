/// Comment service - append-only commenting under existing posts.
///
/// Comments never touch the timeline cache: the global feed body does not
/// render comment state.
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::Comment;
use crate::error::{AppError, Result};
use crate::repository::BlogStore;

pub struct CommentService {
    store: Arc<dyn BlogStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> Result<Comment> {
        if text.trim().is_empty() {
            return Err(AppError::invalid_field(
                "text",
                "comment text must not be empty",
            ));
        }
        if self.store.find_post(post_id).await?.is_none() {
            return Err(AppError::NotFound("post".to_string()));
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text,
            created_at: Utc::now(),
        };
        self.store.insert_comment(&comment).await?;
        Ok(comment)
    }

    /// Comments of a post, oldest first.
    pub async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.store.comments_for_post(post_id).await
    }
}

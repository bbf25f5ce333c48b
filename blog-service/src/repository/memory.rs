/// In-process store used by tests and local development.
///
/// The referential-integrity rules the Postgres schema declares through
/// foreign-key actions are enforced explicitly in the delete paths here, so
/// both backends observe the same contract.
use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::domain::{Author, Comment, Follow, Group, Post};
use crate::error::{AppError, Result};
use crate::repository::{BlogStore, PostFilter};

#[derive(Default)]
struct State {
    authors: HashMap<Uuid, Author>,
    groups: HashMap<Uuid, Group>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    follows: HashMap<(Uuid, Uuid), Follow>,
}

#[derive(Default)]
pub struct MemoryBlogStore {
    state: RwLock<State>,
}

impl MemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(filter: &PostFilter, post: &Post) -> bool {
    match filter {
        PostFilter::All => true,
        PostFilter::Group(group_id) => post.group_id == Some(*group_id),
        PostFilter::Author(author_id) => post.author_id == *author_id,
        PostFilter::Authors(author_ids) => author_ids.contains(&post.author_id),
    }
}

impl State {
    fn select_posts(&self, filter: &PostFilter) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .values()
            .filter(|post| matches(filter, post))
            .cloned()
            .collect();
        // Newest first, id descending on equal timestamps.
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        posts
    }
}

fn poisoned() -> AppError {
    AppError::Internal("memory store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl BlogStore for MemoryBlogStore {
    async fn upsert_author(&self, author: &Author) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.authors.insert(author.id, author.clone());
        Ok(())
    }

    async fn find_author(&self, id: Uuid) -> Result<Option<Author>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.authors.get(&id).cloned())
    }

    async fn find_author_by_username(&self, username: &str) -> Result<Option<Author>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state
            .authors
            .values()
            .find(|author| author.username == username)
            .cloned())
    }

    async fn create_group(&self, group: &Group) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.groups.insert(group.id, group.clone());
        Ok(())
    }

    async fn find_group(&self, id: Uuid) -> Result<Option<Group>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.groups.get(&id).cloned())
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.groups.values().find(|group| group.slug == slug).cloned())
    }

    async fn delete_group(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.groups.remove(&id);
        // ON DELETE SET NULL
        for post in state.posts.values_mut() {
            if post.group_id == Some(id) {
                post.group_id = None;
            }
        }
        Ok(())
    }

    async fn insert_post(&self, post: &Post) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn update_post(&self, post: &Post) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        match state.posts.get_mut(&post.id) {
            Some(existing) => {
                existing.text = post.text.clone();
                existing.group_id = post.group_id;
                existing.image_key = post.image_key.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("post".to_string())),
        }
    }

    async fn delete_post(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.posts.remove(&id);
        // ON DELETE CASCADE
        state.comments.retain(|_, comment| comment.post_id != id);
        Ok(())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.posts.get(&id).cloned())
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state
            .select_posts(filter)
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<i64> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.posts.values().filter(|post| matches(filter, post)).count() as i64)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(comments)
    }

    async fn insert_follow(&self, follow: &Follow) -> Result<bool> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let key = (follow.follower_id, follow.author_id);
        if state.follows.contains_key(&key) {
            return Ok(false);
        }
        state.follows.insert(key, follow.clone());
        Ok(true)
    }

    async fn delete_follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        Ok(state.follows.remove(&(follower_id, author_id)).is_some())
    }

    async fn is_following(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.follows.contains_key(&(follower_id, author_id)))
    }

    async fn following_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state
            .follows
            .keys()
            .filter(|(follower, _)| *follower == follower_id)
            .map(|(_, author)| *author)
            .collect())
    }
}

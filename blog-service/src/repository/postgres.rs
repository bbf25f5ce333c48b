/// PostgreSQL implementation of the Entity Store.
///
/// Referential integrity is declared in `migrations/0001_init.sql`:
/// `posts.group_id` is SET NULL on group deletion, comments CASCADE with
/// their post, and the follows table carries the unique-pair and
/// no-self-loop constraints. The delete paths below lean on those actions.
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Author, Comment, Follow, Group, Post};
use crate::error::Result;
use crate::repository::{BlogStore, PostFilter};

#[derive(Clone)]
pub struct PostgresBlogStore {
    pool: PgPool,
}

impl PostgresBlogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = "id, author_id, group_id, text, image_key, created_at";

#[async_trait::async_trait]
impl BlogStore for PostgresBlogStore {
    async fn upsert_author(&self, author: &Author) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO authors (id, username)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username
            "#,
        )
        .bind(author.id)
        .bind(&author.username)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_author(&self, id: Uuid) -> Result<Option<Author>> {
        let author =
            sqlx::query_as::<_, Author>("SELECT id, username FROM authors WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(author)
    }

    async fn find_author_by_username(&self, username: &str) -> Result<Option<Author>> {
        let author =
            sqlx::query_as::<_, Author>("SELECT id, username FROM authors WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(author)
    }

    async fn create_group(&self, group: &Group) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO groups (id, slug, title, description)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(group.id)
        .bind(&group.slug)
        .bind(&group.title)
        .bind(&group.description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_group(&self, id: Uuid) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, slug, title, description FROM groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(group)
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, slug, title, description FROM groups WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(group)
    }

    async fn delete_group(&self, id: Uuid) -> Result<()> {
        // posts.group_id goes NULL via the FK action
        sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(group_id = %id, "deleted group");
        Ok(())
    }

    async fn insert_post(&self, post: &Post) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, group_id, text, image_key, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(post.group_id)
        .bind(&post.text)
        .bind(&post.image_key)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_post(&self, post: &Post) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE posts
            SET text = $1, group_id = $2, image_key = $3
            WHERE id = $4
            "#,
        )
        .bind(&post.text)
        .bind(post.group_id)
        .bind(&post.image_key)
        .bind(post.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> Result<()> {
        // comments go with the post via the FK action
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(post_id = %id, "deleted post");
        Ok(())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>> {
        let posts = match filter {
            PostFilter::All => {
                sqlx::query_as::<_, Post>(&format!(
                    r#"
                    SELECT {POST_COLUMNS} FROM posts
                    ORDER BY created_at DESC, id DESC
                    LIMIT $1 OFFSET $2
                    "#
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            PostFilter::Group(group_id) => {
                sqlx::query_as::<_, Post>(&format!(
                    r#"
                    SELECT {POST_COLUMNS} FROM posts
                    WHERE group_id = $1
                    ORDER BY created_at DESC, id DESC
                    LIMIT $2 OFFSET $3
                    "#
                ))
                .bind(group_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            PostFilter::Author(author_id) => {
                sqlx::query_as::<_, Post>(&format!(
                    r#"
                    SELECT {POST_COLUMNS} FROM posts
                    WHERE author_id = $1
                    ORDER BY created_at DESC, id DESC
                    LIMIT $2 OFFSET $3
                    "#
                ))
                .bind(author_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            PostFilter::Authors(author_ids) => {
                sqlx::query_as::<_, Post>(&format!(
                    r#"
                    SELECT {POST_COLUMNS} FROM posts
                    WHERE author_id = ANY($1)
                    ORDER BY created_at DESC, id DESC
                    LIMIT $2 OFFSET $3
                    "#
                ))
                .bind(author_ids)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(posts)
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<i64> {
        let count: i64 = match filter {
            PostFilter::All => {
                sqlx::query_scalar("SELECT COUNT(*) FROM posts")
                    .fetch_one(&self.pool)
                    .await?
            }
            PostFilter::Group(group_id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE group_id = $1")
                    .bind(group_id)
                    .fetch_one(&self.pool)
                    .await?
            }
            PostFilter::Author(author_id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
                    .bind(author_id)
                    .fetch_one(&self.pool)
                    .await?
            }
            PostFilter::Authors(author_ids) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = ANY($1)")
                    .bind(author_ids)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.text)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, author_id, text, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn insert_follow(&self, follow: &Follow) -> Result<bool> {
        let inserted = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO follows (follower_id, author_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (follower_id, author_id) DO NOTHING
            RETURNING follower_id
            "#,
        )
        .bind(follow.follower_id)
        .bind(follow.author_id)
        .bind(follow.created_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(inserted.is_some())
    }

    async fn delete_follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        let affected =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND author_id = $2")
                .bind(follower_id)
                .bind(author_id)
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok(affected > 0)
    }

    async fn is_following(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND author_id = $2)",
        )
        .bind(follower_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn following_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT author_id FROM follows WHERE follower_id = $1 ORDER BY created_at DESC",
        )
        .bind(follower_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

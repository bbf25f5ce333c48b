use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author entity - a publishing user, owned by the external identity system.
/// Only the fields the feed and profile views need are mirrored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}

/// Group entity - a community posts can be tagged to, addressed by a
/// URL-stable slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
}

/// Post entity - the unit of publication.
///
/// `created_at` is server-assigned, immutable, and the primary feed sort key
/// (descending, id descending on ties). `group_id` is nullable: deleting the
/// group nulls the reference instead of deleting the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    /// Key of the illustration in the external media store, if any
    pub image_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Comment entity - append-only, cascade-deleted with its post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Follow edge - follower receives the followed author's posts in their
/// personalized feed. The pair is unique and never a self-loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub follower_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// The acting identity on a request. Authentication happens upstream; this
/// core only distinguishes anonymous from signed-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User(Uuid),
}

impl Identity {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Identity::Anonymous => None,
            Identity::User(id) => Some(*id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }
}

/// Business logic layer
///
/// - `feed`: viewpoint resolution, pagination, and the cached global timeline
/// - `posts`: validated post mutations plus the cache-invalidation hook
/// - `comments`: append-only commenting
/// - `follow`: the follow graph
/// - `policy`: the single access-control decision function
pub mod comments;
pub mod feed;
pub mod follow;
pub mod policy;
pub mod posts;

pub use comments::CommentService;
pub use feed::{page_from_query, FeedPage, FeedService, Viewpoint};
pub use follow::FollowService;
pub use policy::{authorize, Action, Decision};
pub use posts::{NewPost, PostService, PostUpdate};

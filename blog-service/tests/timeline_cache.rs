mod common;

use std::sync::Arc;
use std::time::Duration;

use blog_service::repository::MemoryBlogStore;
use blog_service::services::{
    CommentService, FeedService, FollowService, NewPost, PostService, PostUpdate, Viewpoint,
};
use timeline_cache::{ManualClock, TtlCache};

const TTL: Duration = Duration::from_secs(20);

struct Fixture {
    store: Arc<MemoryBlogStore>,
    feed: FeedService,
    posts: PostService,
    comments: CommentService,
    follows: FollowService,
    cache: Arc<TtlCache<u32, blog_service::services::FeedPage>>,
    clock: ManualClock,
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryBlogStore::new());
    let clock = ManualClock::new();
    let cache = Arc::new(TtlCache::with_clock(TTL, Arc::new(clock.clone())));
    Fixture {
        feed: FeedService::new(store.clone(), cache.clone(), 10),
        posts: PostService::new(store.clone(), cache.clone()),
        comments: CommentService::new(store.clone()),
        follows: FollowService::new(store.clone()),
        store,
        cache,
        clock,
    }
}

#[tokio::test]
async fn cached_page_is_served_byte_identical_within_ttl() {
    let fx = fixture();
    let author = common::seed_author(&fx.store, "leo").await;
    common::seed_post(&fx.store, &common::post_at(author.id, None, "first", 0)).await;

    let initial = fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();

    // A write that bypasses the post service must stay invisible while the
    // cached page is live.
    common::seed_post(&fx.store, &common::post_at(author.id, None, "hidden", 1)).await;
    fx.clock.advance(Duration::from_secs(19));

    let cached = fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();
    assert_eq!(
        serde_json::to_string(&cached).unwrap(),
        serde_json::to_string(&initial).unwrap()
    );
}

#[tokio::test]
async fn author_feed_is_never_cached() {
    let fx = fixture();
    let author = common::seed_author(&fx.store, "leo").await;
    common::seed_post(&fx.store, &common::post_at(author.id, None, "first", 0)).await;

    let viewpoint = Viewpoint::ByAuthor("leo".to_string());
    let before = fx.feed.build_feed(&viewpoint, 1).await.unwrap();
    common::seed_post(&fx.store, &common::post_at(author.id, None, "second", 1)).await;
    let after = fx.feed.build_feed(&viewpoint, 1).await.unwrap();

    assert_eq!(before.total_items, 1);
    assert_eq!(after.total_items, 2);
}

#[tokio::test]
async fn creating_a_post_invalidates_the_cached_pages() {
    let fx = fixture();
    let author = common::seed_author(&fx.store, "leo").await;
    common::seed_post(&fx.store, &common::post_at(author.id, None, "first", 0)).await;
    fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();

    fx.posts
        .create_post(
            author.id,
            NewPost {
                text: "fresh".to_string(),
                group_id: None,
                image_key: None,
            },
        )
        .await
        .unwrap();

    let feed = fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();
    assert_eq!(feed.total_items, 2);
    assert_eq!(feed.posts[0].text, "fresh");
}

#[tokio::test]
async fn editing_a_post_invalidates_the_cached_pages() {
    let fx = fixture();
    let author = common::seed_author(&fx.store, "leo").await;
    let post = common::post_at(author.id, None, "original", 0);
    common::seed_post(&fx.store, &post).await;
    fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();

    fx.posts
        .edit_post(
            post.id,
            PostUpdate {
                text: "revised".to_string(),
                group_id: None,
                image_key: None,
            },
        )
        .await
        .unwrap();

    let feed = fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();
    assert_eq!(feed.posts[0].text, "revised");
}

#[tokio::test]
async fn deleting_a_post_invalidates_the_cached_pages() {
    let fx = fixture();
    let author = common::seed_author(&fx.store, "leo").await;
    let post = common::post_at(author.id, None, "doomed", 0);
    common::seed_post(&fx.store, &post).await;
    fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();

    fx.posts.delete_post(post.id).await.unwrap();

    let feed = fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();
    assert_eq!(feed.total_items, 0);
}

#[tokio::test]
async fn comments_and_follows_leave_the_cache_alone() {
    let fx = fixture();
    let leo = common::seed_author(&fx.store, "leo").await;
    let mia = common::seed_author(&fx.store, "mia").await;
    let post = common::post_at(leo.id, None, "first", 0);
    common::seed_post(&fx.store, &post).await;
    let initial = fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();

    // Marker write that only a recomputation would reveal.
    common::seed_post(&fx.store, &common::post_at(leo.id, None, "hidden", 1)).await;

    fx.comments
        .add_comment(post.id, mia.id, "nice".to_string())
        .await
        .unwrap();
    fx.follows.follow(mia.id, "leo").await.unwrap();
    fx.follows.unfollow(mia.id, "leo").await.unwrap();

    let after = fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();
    assert_eq!(after, initial);
}

#[tokio::test]
async fn expired_page_is_recomputed() {
    let fx = fixture();
    let author = common::seed_author(&fx.store, "leo").await;
    common::seed_post(&fx.store, &common::post_at(author.id, None, "first", 0)).await;
    fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();

    common::seed_post(&fx.store, &common::post_at(author.id, None, "late", 1)).await;
    fx.clock.advance(TTL);

    let feed = fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();
    assert_eq!(feed.total_items, 2);
    assert_eq!(feed.posts[0].text, "late");
}

#[tokio::test]
async fn out_of_range_page_requests_do_not_grow_the_cache() {
    let fx = fixture();
    let author = common::seed_author(&fx.store, "leo").await;
    for minutes in 0..15 {
        let post = common::post_at(author.id, None, &format!("post {minutes}"), minutes);
        common::seed_post(&fx.store, &post).await;
    }

    // Two real pages; every request past the end clamps to page 2 and must
    // share its cache entry instead of minting one per requested number.
    for page in 3..=50 {
        let feed = fx.feed.build_feed(&Viewpoint::Global, page).await.unwrap();
        assert_eq!(feed.page, 2);
    }
    assert_eq!(fx.cache.len(), 1);
    assert!(fx.cache.get(&2).is_some());
}

#[tokio::test]
async fn pages_are_cached_under_their_clamped_page_number() {
    let fx = fixture();
    let author = common::seed_author(&fx.store, "leo").await;
    for minutes in 0..15 {
        let post = common::post_at(author.id, None, &format!("post {minutes}"), minutes);
        common::seed_post(&fx.store, &post).await;
    }

    fx.feed.build_feed(&Viewpoint::Global, 1).await.unwrap();
    fx.feed.build_feed(&Viewpoint::Global, 2).await.unwrap();
    assert_eq!(fx.cache.len(), 2);

    fx.posts
        .create_post(
            author.id,
            NewPost {
                text: "sixteenth".to_string(),
                group_id: None,
                image_key: None,
            },
        )
        .await
        .unwrap();
    assert!(fx.cache.is_empty());
}

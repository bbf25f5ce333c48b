mod common;

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use blog_service::error::AppError;
use blog_service::repository::{BlogStore, MemoryBlogStore};
use blog_service::services::{CommentService, NewPost, PostService, PostUpdate};
use timeline_cache::TtlCache;

fn post_service(store: &Arc<MemoryBlogStore>) -> PostService {
    PostService::new(store.clone(), Arc::new(TtlCache::new(Duration::from_secs(20))))
}

#[tokio::test]
async fn deleting_a_group_keeps_its_posts_without_the_tag() {
    let store = Arc::new(MemoryBlogStore::new());
    let author = common::seed_author(&store, "leo").await;
    let group = common::seed_group(&store, "cats").await;
    let post = common::post_at(author.id, Some(group.id), "tagged", 0);
    common::seed_post(&store, &post).await;

    store.delete_group(group.id).await.unwrap();

    let survivor = store.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(survivor.group_id, None);
    assert_eq!(survivor.text, "tagged");
    assert!(store.find_group_by_slug("cats").await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_post_removes_its_comments() {
    let store = Arc::new(MemoryBlogStore::new());
    let author = common::seed_author(&store, "leo").await;
    let kept = common::post_at(author.id, None, "kept", 0);
    let doomed = common::post_at(author.id, None, "doomed", 1);
    common::seed_post(&store, &kept).await;
    common::seed_post(&store, &doomed).await;
    common::seed_comment(&store, doomed.id, author.id, "on doomed").await;
    common::seed_comment(&store, kept.id, author.id, "on kept").await;

    post_service(&store).delete_post(doomed.id).await.unwrap();

    assert!(store.comments_for_post(doomed.id).await.unwrap().is_empty());
    assert_eq!(store.comments_for_post(kept.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn blank_post_text_is_a_field_error() {
    let store = Arc::new(MemoryBlogStore::new());
    let author = common::seed_author(&store, "leo").await;

    let err = post_service(&store)
        .create_post(
            author.id,
            NewPost {
                text: "   ".to_string(),
                group_id: None,
                image_key: None,
            },
        )
        .await
        .unwrap_err();

    match err {
        AppError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "text");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_group_reference_is_a_field_error() {
    let store = Arc::new(MemoryBlogStore::new());
    let author = common::seed_author(&store, "leo").await;

    let err = post_service(&store)
        .create_post(
            author.id,
            NewPost {
                text: "hello".to_string(),
                group_id: Some(Uuid::new_v4()),
                image_key: None,
            },
        )
        .await
        .unwrap_err();

    match err {
        AppError::Validation(errors) => assert_eq!(errors[0].field, "group"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn blank_comment_text_is_a_field_error() {
    let store = Arc::new(MemoryBlogStore::new());
    let author = common::seed_author(&store, "leo").await;
    let post = common::post_at(author.id, None, "a post", 0);
    common::seed_post(&store, &post).await;

    let err = CommentService::new(store.clone())
        .add_comment(post.id, author.id, "  ".to_string())
        .await
        .unwrap_err();

    match err {
        AppError::Validation(errors) => assert_eq!(errors[0].field, "text"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn commenting_on_a_missing_post_is_not_found() {
    let store = Arc::new(MemoryBlogStore::new());
    let author = common::seed_author(&store, "leo").await;

    let err = CommentService::new(store.clone())
        .add_comment(Uuid::new_v4(), author.id, "hello".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn editing_preserves_author_and_creation_time() {
    let store = Arc::new(MemoryBlogStore::new());
    let author = common::seed_author(&store, "leo").await;
    let group = common::seed_group(&store, "cats").await;
    let post = common::post_at(author.id, None, "original", 0);
    common::seed_post(&store, &post).await;

    let updated = post_service(&store)
        .edit_post(
            post.id,
            PostUpdate {
                text: "revised".to_string(),
                group_id: Some(group.id),
                image_key: Some("cover.png".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.text, "revised");
    assert_eq!(updated.group_id, Some(group.id));
    assert_eq!(updated.image_key.as_deref(), Some("cover.png"));
    assert_eq!(updated.author_id, post.author_id);
    assert_eq!(updated.created_at, post.created_at);
}

#[tokio::test]
async fn comments_come_back_oldest_first() {
    let store = Arc::new(MemoryBlogStore::new());
    let author = common::seed_author(&store, "leo").await;
    let post = common::post_at(author.id, None, "a post", 0);
    common::seed_post(&store, &post).await;
    let comments = CommentService::new(store.clone());

    comments
        .add_comment(post.id, author.id, "first".to_string())
        .await
        .unwrap();
    comments
        .add_comment(post.id, author.id, "second".to_string())
        .await
        .unwrap();

    let listed = comments.comments_for_post(post.id).await.unwrap();
    let texts: Vec<&str> = listed.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
}

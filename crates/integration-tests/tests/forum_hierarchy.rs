//! Category → thread → post scenarios, cascades included.

use domains::error::PlatformError;
use integration_tests::{admin, alice, bob, platform};
use uuid::Uuid;

#[tokio::test]
async fn category_thread_post_happy_path() {
    let p = platform();
    let category = p
        .forum
        .create_category(&admin(), "Test Category 1", "First category")
        .await
        .unwrap();

    let thread = p
        .forum
        .create_thread(&alice(), category.id, "New Thread")
        .await
        .unwrap();
    let post = p
        .forum
        .create_post(&alice(), thread.id, "first!", None)
        .await
        .unwrap();

    let details = p.forum.thread_details(thread.id).await.unwrap();
    assert_eq!(details.thread.title, "New Thread");
    assert_eq!(details.posts.len(), 1);
    assert_eq!(details.posts[0].post.id, post.id);

    let listed = p.forum.category_details(category.id).await.unwrap();
    assert_eq!(listed.threads.len(), 1);
}

#[tokio::test]
async fn thread_against_unknown_category_is_not_found() {
    let p = platform();
    let err = p
        .forum
        .create_thread(&alice(), Uuid::now_v7(), "orphan")
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::NotFound("Category", _)));
}

#[tokio::test]
async fn category_delete_cascades_to_posts() {
    let p = platform();
    let category = p
        .forum
        .create_category(&admin(), "Doomed", "Going away")
        .await
        .unwrap();
    let t1 = p
        .forum
        .create_thread(&alice(), category.id, "one")
        .await
        .unwrap();
    let t2 = p
        .forum
        .create_thread(&bob(), category.id, "two")
        .await
        .unwrap();
    p.forum.create_post(&alice(), t1.id, "a", None).await.unwrap();
    p.forum.create_post(&bob(), t1.id, "b", None).await.unwrap();
    p.forum.create_post(&alice(), t2.id, "c", None).await.unwrap();

    let outcome = p.forum.delete_category(&admin(), category.id).await.unwrap();
    assert_eq!(outcome.threads_removed, 2);
    assert_eq!(outcome.posts_removed, 3);

    // No survivors anywhere in the tree.
    assert!(matches!(
        p.forum.category_details(category.id).await.unwrap_err(),
        PlatformError::NotFound("Category", _)
    ));
    assert!(matches!(
        p.forum.thread_details(t1.id).await.unwrap_err(),
        PlatformError::NotFound("Thread", _)
    ));
    assert!(matches!(
        p.forum.thread_details(t2.id).await.unwrap_err(),
        PlatformError::NotFound("Thread", _)
    ));
}

#[tokio::test]
async fn thread_delete_spares_its_siblings() {
    let p = platform();
    let category = p
        .forum
        .create_category(&admin(), "General", "Talk")
        .await
        .unwrap();
    let doomed = p
        .forum
        .create_thread(&alice(), category.id, "doomed")
        .await
        .unwrap();
    let spared = p
        .forum
        .create_thread(&bob(), category.id, "spared")
        .await
        .unwrap();
    p.forum.create_post(&alice(), doomed.id, "x", None).await.unwrap();
    p.forum.create_post(&bob(), spared.id, "y", None).await.unwrap();

    let removed = p.forum.delete_thread(&admin(), doomed.id).await.unwrap();
    assert_eq!(removed, 1);

    let details = p.forum.thread_details(spared.id).await.unwrap();
    assert_eq!(details.posts.len(), 1);
}

#[tokio::test]
async fn deleting_an_unknown_thread_changes_nothing() {
    let p = platform();
    let category = p
        .forum
        .create_category(&admin(), "Stable", "Untouched")
        .await
        .unwrap();
    let thread = p
        .forum
        .create_thread(&alice(), category.id, "still here")
        .await
        .unwrap();

    let err = p
        .forum
        .delete_thread(&admin(), Uuid::now_v7())
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::NotFound("Thread", _)));
    assert!(p.forum.thread_details(thread.id).await.is_ok());
    assert_eq!(p.forum.list_categories().await.unwrap().len(), 1);
}

#[tokio::test]
async fn thread_details_name_known_and_unknown_authors() {
    let p = platform();
    let category = p
        .forum
        .create_category(&admin(), "Names", "Who said what")
        .await
        .unwrap();
    let thread = p
        .forum
        .create_thread(&alice(), category.id, "hello")
        .await
        .unwrap();

    p.forum.create_post(&alice(), thread.id, "hi", None).await.unwrap();
    // An author the directory has never heard of.
    let ghost = domains::models::Actor::new("ghost-7", vec![domains::models::Role::Standard]);
    p.forum.create_post(&ghost, thread.id, "boo", None).await.unwrap();

    let details = p.forum.thread_details(thread.id).await.unwrap();
    let names: Vec<&str> = details
        .posts
        .iter()
        .map(|view| view.author_name.as_str())
        .collect();
    assert_eq!(names, vec!["alice", "unknown"]);
}

#[tokio::test]
async fn authors_remove_their_own_posts() {
    let p = platform();
    let category = p
        .forum
        .create_category(&admin(), "Cleanup", "Second thoughts")
        .await
        .unwrap();
    let thread = p
        .forum
        .create_thread(&alice(), category.id, "oops")
        .await
        .unwrap();
    let post = p
        .forum
        .create_post(&alice(), thread.id, "delete me", None)
        .await
        .unwrap();

    p.forum.delete_post(&alice(), post.id).await.unwrap();
    let details = p.forum.thread_details(thread.id).await.unwrap();
    assert!(details.posts.is_empty());
}

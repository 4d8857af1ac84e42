//! Item submission and moderation integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn create_fact_check_awards_submission_karma() {
    let harness = TestHarness::new();

    let item_id = harness
        .create_item(&harness.user_auth_header(), "fact_check")
        .await;
    assert!(!item_id.is_empty());

    // Starting karma 10 + SUBMIT_FACT 10.
    assert_eq!(harness.karma_total(&harness.user_auth_header()).await, 20);
}

#[tokio::test]
async fn create_comment_awards_one_point() {
    let harness = TestHarness::new();

    harness
        .create_item(&harness.user_auth_header(), "comment")
        .await;

    // Starting karma 10 + SUBMIT_COMMENT 1.
    assert_eq!(harness.karma_total(&harness.user_auth_header()).await, 11);
}

#[tokio::test]
async fn create_without_auth_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/items")
        .json(&json!({ "kind": "fact_check" }))
        .await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Lookup
// ============================================================================

#[tokio::test]
async fn get_item_roundtrip() {
    let harness = TestHarness::new();

    let item_id = harness
        .create_item(&harness.user_auth_header(), "fact_check")
        .await;

    let response = harness
        .server
        .get(&format!("/v1/items/{item_id}"))
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], item_id);
    assert_eq!(body["owner_id"], harness.test_user_id.to_string());
    assert_eq!(body["status"], "UNVALIDATED");
    assert_eq!(body["upvotes"], 0);
    assert_eq!(body["downvotes"], 0);
}

#[tokio::test]
async fn get_missing_item_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/items/01ARZ3NDEKTSV4RRFFQ69G5FAV")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn get_invalid_item_id_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/items/not-a-ulid")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_bad_request();
}

// ============================================================================
// Moderation: validation status
// ============================================================================

#[tokio::test]
async fn set_status_awards_owner_once_per_verdict() {
    let harness = TestHarness::new();

    let item_id = harness
        .create_item(&harness.user_auth_header(), "fact_check")
        .await;
    assert_eq!(harness.karma_total(&harness.user_auth_header()).await, 20);

    // FACT_VALIDATED_TRUE: +20.
    harness.set_status(&item_id, "VALIDATED_TRUE").await;
    assert_eq!(harness.karma_total(&harness.user_auth_header()).await, 40);

    // Same verdict again changes nothing.
    harness.set_status(&item_id, "VALIDATED_TRUE").await;
    assert_eq!(harness.karma_total(&harness.user_auth_header()).await, 40);

    // FACT_VALIDATED_FALSE: -15.
    harness.set_status(&item_id, "VALIDATED_FALSE").await;
    assert_eq!(harness.karma_total(&harness.user_auth_header()).await, 25);
}

#[tokio::test]
async fn set_status_on_comment_rejected() {
    let harness = TestHarness::new();

    let item_id = harness
        .create_item(&harness.user_auth_header(), "comment")
        .await;

    let response = harness
        .server
        .post(&format!("/v1/items/{item_id}/status"))
        .add_header("x-moderator-key", harness.moderator_key.clone())
        .json(&json!({ "status": "VALIDATED_TRUE" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn set_status_requires_moderator_key() {
    let harness = TestHarness::new();

    let item_id = harness
        .create_item(&harness.user_auth_header(), "fact_check")
        .await;

    let response = harness
        .server
        .post(&format!("/v1/items/{item_id}/status"))
        .json(&json!({ "status": "VALIDATED_TRUE" }))
        .await;
    response.assert_status_unauthorized();

    let response = harness
        .server
        .post(&format!("/v1/items/{item_id}/status"))
        .add_header("x-moderator-key", "wrong-key".to_string())
        .json(&json!({ "status": "VALIDATED_TRUE" }))
        .await;
    response.assert_status_unauthorized();
}

// ============================================================================
// Moderation: deletion
// ============================================================================

#[tokio::test]
async fn delete_item_charges_owner() {
    let harness = TestHarness::new();

    let item_id = harness
        .create_item(&harness.user_auth_header(), "fact_check")
        .await;
    assert_eq!(harness.karma_total(&harness.user_auth_header()).await, 20);

    let response = harness
        .server
        .delete(&format!("/v1/items/{item_id}"))
        .add_header("x-moderator-key", harness.moderator_key.clone())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["deleted"], true);

    // FACT_DELETED: -10.
    assert_eq!(harness.karma_total(&harness.user_auth_header()).await, 10);

    // The item is gone.
    let response = harness
        .server
        .get(&format!("/v1/items/{item_id}"))
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn delete_requires_moderator_key() {
    let harness = TestHarness::new();

    let item_id = harness
        .create_item(&harness.user_auth_header(), "fact_check")
        .await;

    let response = harness
        .server
        .delete(&format!("/v1/items/{item_id}"))
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_unauthorized();
}

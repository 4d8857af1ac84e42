//! Vote submission integration tests, covering the full vote lifecycle and
//! its karma side effects.

mod common;

use common::TestHarness;
use podcheck_core::UserId;
use serde_json::json;

// ============================================================================
// Vote lifecycle
// ============================================================================

/// Walks a single voter through the whole vote state machine against one
/// fact check, checking counters and both users' karma at every step.
#[tokio::test]
async fn full_vote_lifecycle() {
    let harness = TestHarness::new();
    let owner = harness.user_auth_header();
    let voter = TestHarness::auth_header_for(UserId::generate());

    let item_id = harness.create_item(&owner, "fact_check").await;
    // Owner: 10 starting + 10 SUBMIT_FACT.
    assert_eq!(harness.karma_total(&owner).await, 20);

    // Fresh upvote: owner earns FACT_UPVOTED (+2), voter earns
    // UNVALIDATED_FACT_UPVOTED (+1).
    let body = harness.vote(&voter, &item_id, 1).await;
    assert_eq!(body["upvotes"], 1);
    assert_eq!(body["downvotes"], 0);
    assert_eq!(body["value"], 1);
    assert_eq!(harness.karma_total(&owner).await, 22);
    assert_eq!(harness.karma_total(&voter).await, 11);

    // Same vote again: no counter change, no new karma.
    let body = harness.vote(&voter, &item_id, 1).await;
    assert_eq!(body["upvotes"], 1);
    assert_eq!(body["downvotes"], 0);
    assert_eq!(harness.karma_total(&owner).await, 22);
    assert_eq!(harness.karma_total(&voter).await, 11);

    // Switch to downvote: owner loses the upvote (-2) and takes the
    // downvote (-1); voter's upvote withdrawal costs 1, the unvalidated
    // downvote itself is score-neutral.
    let body = harness.vote(&voter, &item_id, -1).await;
    assert_eq!(body["upvotes"], 0);
    assert_eq!(body["downvotes"], 1);
    assert_eq!(harness.karma_total(&owner).await, 19);
    assert_eq!(harness.karma_total(&voter).await, 10);

    // Clear the vote: the vote record is deleted and the downvote removal
    // refunds the owner (+1).
    let body = harness.vote(&voter, &item_id, 0).await;
    assert_eq!(body["upvotes"], 0);
    assert_eq!(body["downvotes"], 0);
    assert_eq!(body["value"], 0);
    assert_eq!(harness.karma_total(&owner).await, 20);
    assert_eq!(harness.karma_total(&voter).await, 10);

    // Upvote again: counters move, but every karma action for this
    // (user, action, item) triple has already been recorded, so totals hold.
    let body = harness.vote(&voter, &item_id, 1).await;
    assert_eq!(body["upvotes"], 1);
    assert_eq!(harness.karma_total(&owner).await, 20);
    assert_eq!(harness.karma_total(&voter).await, 10);
}

#[tokio::test]
async fn downvote_on_validated_false_rewards_voter() {
    let harness = TestHarness::new();
    let owner = harness.user_auth_header();
    let voter = TestHarness::auth_header_for(UserId::generate());

    let item_id = harness.create_item(&owner, "fact_check").await;
    harness.set_status(&item_id, "VALIDATED_FALSE").await;
    // Owner: 10 + 10 SUBMIT_FACT - 15 FACT_VALIDATED_FALSE.
    assert_eq!(harness.karma_total(&owner).await, 5);

    harness.vote(&voter, &item_id, -1).await;

    // Voter earns DOWNVOTE_GIVEN_VALIDATED_FALSE (+1), not the generic
    // unvalidated action; owner takes FACT_DOWNVOTED (-1).
    assert_eq!(harness.karma_total(&voter).await, 11);
    assert_eq!(harness.karma_total(&owner).await, 4);
}

#[tokio::test]
async fn upvote_on_validated_false_costs_voter() {
    let harness = TestHarness::new();
    let owner = harness.user_auth_header();
    let voter = TestHarness::auth_header_for(UserId::generate());

    let item_id = harness.create_item(&owner, "fact_check").await;
    harness.set_status(&item_id, "VALIDATED_FALSE").await;

    harness.vote(&voter, &item_id, 1).await;

    // UPVOTE_GIVEN_VALIDATED_FALSE: -2.
    assert_eq!(harness.karma_total(&voter).await, 8);
}

#[tokio::test]
async fn self_vote_earns_no_owner_karma() {
    let harness = TestHarness::new();
    let owner = harness.user_auth_header();

    let item_id = harness.create_item(&owner, "fact_check").await;

    let body = harness.vote(&owner, &item_id, 1).await;
    assert_eq!(body["upvotes"], 1);

    // 10 starting + 10 SUBMIT_FACT + 1 voter-side UNVALIDATED_FACT_UPVOTED;
    // no FACT_UPVOTED for voting on own content.
    assert_eq!(harness.karma_total(&owner).await, 21);
}

#[tokio::test]
async fn comment_vote_awards_owner_only() {
    let harness = TestHarness::new();
    let owner = harness.user_auth_header();
    let voter = TestHarness::auth_header_for(UserId::generate());

    let item_id = harness.create_item(&owner, "comment").await;
    // Owner: 10 + 1 SUBMIT_COMMENT.
    assert_eq!(harness.karma_total(&owner).await, 11);

    harness.vote(&voter, &item_id, 1).await;

    // COMMENT_UPVOTED (+1) for the owner, nothing for the voter.
    assert_eq!(harness.karma_total(&owner).await, 12);
    assert_eq!(harness.karma_total(&voter).await, 10);
}

// ============================================================================
// Validation and errors
// ============================================================================

#[tokio::test]
async fn vote_on_missing_item_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/items/01ARZ3NDEKTSV4RRFFQ69G5FAV/vote")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "value": 1 }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn vote_value_out_of_range_fails() {
    let harness = TestHarness::new();

    let item_id = harness
        .create_item(&harness.user_auth_header(), "fact_check")
        .await;

    let response = harness
        .server
        .post(&format!("/v1/items/{item_id}/vote"))
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "value": 3 }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn vote_without_auth_fails() {
    let harness = TestHarness::new();

    let item_id = harness
        .create_item(&harness.user_auth_header(), "fact_check")
        .await;

    let response = harness
        .server
        .post(&format!("/v1/items/{item_id}/vote"))
        .json(&json!({ "value": 1 }))
        .await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Lookups
// ============================================================================

#[tokio::test]
async fn batch_votes_omits_unvoted_items() {
    let harness = TestHarness::new();
    let voter = harness.user_auth_header();

    let voted = harness.create_item(&voter, "fact_check").await;
    let unvoted = harness.create_item(&voter, "fact_check").await;

    harness.vote(&voter, &voted, -1).await;

    let response = harness
        .server
        .get(&format!("/v1/votes?items={voted},{unvoted}"))
        .add_header("authorization", voter.clone())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let votes = body["votes"].as_object().unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[&voted], -1);
}

#[tokio::test]
async fn recount_matches_denormalized_counters() {
    let harness = TestHarness::new();
    let owner = harness.user_auth_header();

    let item_id = harness.create_item(&owner, "fact_check").await;
    for value in [1, 1, -1] {
        let voter = TestHarness::auth_header_for(UserId::generate());
        harness.vote(&voter, &item_id, value).await;
    }

    let plain = harness
        .server
        .get(&format!("/v1/items/{item_id}/votes"))
        .add_header("authorization", owner.clone())
        .await;
    plain.assert_status_ok();
    let plain: serde_json::Value = plain.json();

    let recount = harness
        .server
        .get(&format!("/v1/items/{item_id}/votes?recount=true"))
        .add_header("authorization", owner.clone())
        .await;
    recount.assert_status_ok();
    let recount: serde_json::Value = recount.json();

    assert_eq!(plain["upvotes"], 2);
    assert_eq!(plain["downvotes"], 1);
    assert_eq!(plain["upvotes"], recount["upvotes"]);
    assert_eq!(plain["downvotes"], recount["downvotes"]);
}

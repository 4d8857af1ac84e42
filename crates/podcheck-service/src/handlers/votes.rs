//! Vote submission and lookup handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use podcheck_core::{vote_awards, ItemId, VoteValue};
use podcheck_store::Store;

use crate::auth::AuthUser;
use crate::awards;
use crate::error::ApiError;
use crate::handlers::items::parse_item_id;
use crate::state::AppState;

/// Vote submission request.
#[derive(Debug, Deserialize)]
pub struct SubmitVoteRequest {
    /// Requested vote value: -1, 0, or 1. Zero clears the vote.
    pub value: i8,
}

/// Vote submission response.
#[derive(Debug, Serialize)]
pub struct VoteResponse {
    /// The item voted on.
    pub item_id: String,
    /// The voter's recorded value after the transaction.
    pub value: i8,
    /// Upvote counter after the transaction.
    pub upvotes: u32,
    /// Downvote counter after the transaction.
    pub downvotes: u32,
}

/// Submit, change, or clear a vote on an item.
///
/// The counter update and the vote record write commit in one transaction;
/// karma for the voter and the item's owner is posted afterwards,
/// best-effort. Re-submitting the current value is a no-op.
pub async fn submit_vote(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(item_id): Path<String>,
    Json(body): Json<SubmitVoteRequest>,
) -> Result<Json<VoteResponse>, ApiError> {
    let item_id = parse_item_id(&item_id)?;
    let requested = VoteValue::try_from(body.value)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::debug!(
        item_id = %item_id,
        voter_id = %auth.user_id,
        value = body.value,
        "Processing vote"
    );

    let outcome = state.store.apply_vote(&item_id, &auth.user_id, requested)?;

    if !outcome.is_noop() {
        let owed = vote_awards(&outcome);
        awards::post_awards(&state.store, &owed, &item_id);
    }

    Ok(Json(VoteResponse {
        item_id: item_id.to_string(),
        value: outcome.new_value.as_i8(),
        upvotes: outcome.upvotes,
        downvotes: outcome.downvotes,
    }))
}

/// Vote count query parameters.
#[derive(Debug, Deserialize)]
pub struct VoteCountsQuery {
    /// Recompute counters by scanning vote records instead of reading the
    /// denormalized counters (audit path).
    #[serde(default)]
    pub recount: bool,
}

/// Vote counts response.
#[derive(Debug, Serialize)]
pub struct VoteCountsResponse {
    /// The item.
    pub item_id: String,
    /// Upvote count.
    pub upvotes: u32,
    /// Downvote count.
    pub downvotes: u32,
}

/// Get an item's vote counts.
pub async fn get_vote_counts(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(item_id): Path<String>,
    Query(query): Query<VoteCountsQuery>,
) -> Result<Json<VoteCountsResponse>, ApiError> {
    let item_id = parse_item_id(&item_id)?;
    let item = state
        .store
        .get_item(&item_id)?
        .ok_or_else(|| ApiError::NotFound(format!("item not found: {item_id}")))?;

    let counts = if query.recount {
        state.store.tally_votes(&item_id)?
    } else {
        item.counts()
    };

    Ok(Json(VoteCountsResponse {
        item_id: item_id.to_string(),
        upvotes: counts.upvotes,
        downvotes: counts.downvotes,
    }))
}

/// Batched vote lookup query parameters.
#[derive(Debug, Deserialize)]
pub struct UserVotesQuery {
    /// Comma-separated item IDs.
    pub items: String,
}

/// Batched vote lookup response.
#[derive(Debug, Serialize)]
pub struct UserVotesResponse {
    /// The voter's active votes, keyed by item ID. Items without a vote are
    /// omitted.
    pub votes: HashMap<String, i8>,
}

/// Get the authenticated user's votes across a batch of items.
pub async fn get_user_votes(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<UserVotesQuery>,
) -> Result<Json<UserVotesResponse>, ApiError> {
    let item_ids = query
        .items
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_item_id)
        .collect::<Result<Vec<ItemId>, _>>()?;

    let votes = state.store.votes_for_user(&auth.user_id, &item_ids)?;

    Ok(Json(UserVotesResponse {
        votes: votes
            .into_iter()
            .map(|(item_id, value)| (item_id.to_string(), value.as_i8()))
            .collect(),
    }))
}

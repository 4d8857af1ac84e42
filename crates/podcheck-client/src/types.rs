//! Request and response types for the podcheck client.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use podcheck_core::{ItemKind, KarmaAction, ValidationStatus};

/// Create item request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateItemRequest {
    /// Whether this is a fact check or a comment.
    pub kind: ItemKind,
}

/// Item response.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemResponse {
    /// Item ID.
    pub id: String,
    /// Submitter's user ID.
    pub owner_id: String,
    /// Fact check or comment.
    pub kind: ItemKind,
    /// Moderation verdict.
    pub status: ValidationStatus,
    /// Active upvotes.
    pub upvotes: u32,
    /// Active downvotes.
    pub downvotes: u32,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

/// Vote submission request.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitVoteRequest {
    /// Requested vote value: -1, 0, or 1. Zero clears the vote.
    pub value: i8,
}

/// Vote submission response.
#[derive(Debug, Clone, Deserialize)]
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

/// Vote counts response.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteCountsResponse {
    /// The item.
    pub item_id: String,
    /// Upvote count.
    pub upvotes: u32,
    /// Downvote count.
    pub downvotes: u32,
}

/// Batched vote lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct UserVotesResponse {
    /// The voter's active votes, keyed by item ID. Items without a vote are
    /// omitted.
    pub votes: HashMap<String, i8>,
}

/// Status change request.
#[derive(Debug, Clone, Serialize)]
pub struct SetStatusRequest {
    /// The new validation status.
    pub status: ValidationStatus,
}

/// Delete item response.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteItemResponse {
    /// The deleted item's ID.
    pub id: String,
    /// Always true on success.
    pub deleted: bool,
}

/// Karma total response.
#[derive(Debug, Clone, Deserialize)]
pub struct KarmaResponse {
    /// The user.
    pub user_id: String,
    /// Running karma total.
    pub total_karma: i64,
}

/// Ledger entry response.
#[derive(Debug, Clone, Deserialize)]
pub struct KarmaEntryResponse {
    /// Entry ID.
    pub id: String,
    /// What happened.
    pub action: KarmaAction,
    /// Point value awarded.
    pub points: i64,
    /// The item the action concerns.
    pub target_id: String,
    /// When the entry was appended (RFC 3339).
    pub timestamp: String,
}

/// Karma history response.
#[derive(Debug, Clone, Deserialize)]
pub struct KarmaHistoryResponse {
    /// Ledger entries, newest first.
    pub entries: Vec<KarmaEntryResponse>,
}

/// API error envelope returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// The error payload.
    pub error: ApiErrorBody,
}

/// API error payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

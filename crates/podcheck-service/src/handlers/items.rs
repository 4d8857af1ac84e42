//! Item creation, lookup, moderation, and deletion handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use podcheck_core::{
    status_change_award, Item, ItemId, ItemKind, KarmaAction, KarmaAward, ValidationStatus,
};
use podcheck_store::Store;

use crate::auth::{AuthUser, ModeratorAuth};
use crate::awards;
use crate::error::ApiError;
use crate::state::AppState;

/// Create item request.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    /// Whether this is a fact check or a comment.
    pub kind: ItemKind,
}

/// Item response.
#[derive(Debug, Serialize)]
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
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            owner_id: item.owner_id.to_string(),
            kind: item.kind,
            status: item.status,
            upvotes: item.upvotes,
            downvotes: item.downvotes,
            created_at: item.created_at.to_rfc3339(),
            updated_at: item.updated_at.to_rfc3339(),
        }
    }
}

/// Create a fact check or comment.
///
/// Awards submission karma to the submitter, keyed by the new item's ID.
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = Item::new(auth.user_id, body.kind);
    state.store.put_item(&item)?;

    tracing::info!(
        item_id = %item.id,
        owner_id = %item.owner_id,
        kind = ?item.kind,
        "Item created"
    );

    let action = match body.kind {
        ItemKind::FactCheck => KarmaAction::SubmitFact,
        ItemKind::Comment => KarmaAction::SubmitComment,
    };
    awards::post_award(
        &state.store,
        KarmaAward {
            user_id: auth.user_id,
            action,
        },
        &item.id,
    );

    Ok(Json(ItemResponse::from(&item)))
}

/// Get an item by ID.
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(item_id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item_id = parse_item_id(&item_id)?;
    let item = state
        .store
        .get_item(&item_id)?
        .ok_or_else(|| ApiError::NotFound(format!("item not found: {item_id}")))?;

    Ok(Json(ItemResponse::from(&item)))
}

/// Status change request.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    /// The new validation status.
    pub status: ValidationStatus,
}

/// Set a fact check's validation status (moderation).
///
/// Awards validation karma to the item's owner when the status actually
/// changes. Comments carry no validation status and are rejected.
pub async fn set_status(
    State(state): State<Arc<AppState>>,
    moderator: ModeratorAuth,
    Path(item_id): Path<String>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item_id = parse_item_id(&item_id)?;

    let item = state
        .store
        .get_item(&item_id)?
        .ok_or_else(|| ApiError::NotFound(format!("item not found: {item_id}")))?;
    if item.kind == ItemKind::Comment {
        return Err(ApiError::BadRequest(
            "comments cannot be validated".into(),
        ));
    }

    let (updated, previous) = state.store.set_validation_status(&item_id, body.status)?;

    tracing::info!(
        item_id = %item_id,
        moderator_id = %moderator.moderator_id,
        previous = ?previous,
        status = ?body.status,
        "Validation status set"
    );

    if let Some(award) =
        status_change_award(updated.kind, updated.owner_id, previous, body.status)
    {
        awards::post_award(&state.store, award, &item_id);
    }

    Ok(Json(ItemResponse::from(&updated)))
}

/// Delete item response.
#[derive(Debug, Serialize)]
pub struct DeleteItemResponse {
    /// The deleted item's ID.
    pub id: String,
    /// Always true on success.
    pub deleted: bool,
}

/// Delete an item (moderation).
///
/// Removes the item and its vote records, then charges deletion karma to the
/// owner.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    moderator: ModeratorAuth,
    Path(item_id): Path<String>,
) -> Result<Json<DeleteItemResponse>, ApiError> {
    let item_id = parse_item_id(&item_id)?;
    let item = state.store.delete_item(&item_id)?;

    tracing::info!(
        item_id = %item_id,
        moderator_id = %moderator.moderator_id,
        owner_id = %item.owner_id,
        "Item deleted"
    );

    let action = match item.kind {
        ItemKind::FactCheck => KarmaAction::FactDeleted,
        ItemKind::Comment => KarmaAction::CommentDeleted,
    };
    awards::post_award(
        &state.store,
        KarmaAward {
            user_id: item.owner_id,
            action,
        },
        &item_id,
    );

    Ok(Json(DeleteItemResponse {
        id: item_id.to_string(),
        deleted: true,
    }))
}

pub(crate) fn parse_item_id(raw: &str) -> Result<ItemId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid item ID".into()))
}

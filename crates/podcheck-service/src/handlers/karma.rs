//! Karma total and history handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use podcheck_core::{KarmaAction, KarmaHistoryEntry, UserId};
use podcheck_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Karma total response.
#[derive(Debug, Serialize)]
pub struct KarmaResponse {
    /// The user.
    pub user_id: String,
    /// Running karma total.
    pub total_karma: i64,
}

/// Get the authenticated user's karma total.
pub async fn get_my_karma(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<KarmaResponse>, ApiError> {
    let total_karma = state.store.karma_total(&auth.user_id)?;

    Ok(Json(KarmaResponse {
        user_id: auth.user_id.to_string(),
        total_karma,
    }))
}

/// Get any user's karma total (for profile pages).
pub async fn get_user_karma(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<KarmaResponse>, ApiError> {
    let user_id: UserId = user_id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid user ID".into()))?;
    let total_karma = state.store.karma_total(&user_id)?;

    Ok(Json(KarmaResponse {
        user_id: user_id.to_string(),
        total_karma,
    }))
}

/// Ledger entry response.
#[derive(Debug, Serialize)]
pub struct KarmaEntryResponse {
    /// Entry ID.
    pub id: String,
    /// What happened.
    pub action: KarmaAction,
    /// Point value awarded.
    pub points: i64,
    /// The item the action concerns.
    pub target_id: String,
    /// When the entry was appended.
    pub timestamp: String,
}

impl From<&KarmaHistoryEntry> for KarmaEntryResponse {
    fn from(entry: &KarmaHistoryEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            action: entry.action,
            points: entry.points,
            target_id: entry.target_id.to_string(),
            timestamp: entry.timestamp.to_rfc3339(),
        }
    }
}

/// Karma history response.
#[derive(Debug, Serialize)]
pub struct KarmaHistoryResponse {
    /// Ledger entries, newest first.
    pub entries: Vec<KarmaEntryResponse>,
}

/// Get the authenticated user's karma history, newest first.
pub async fn get_my_history(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<KarmaHistoryResponse>, ApiError> {
    // The store returns ledger order (oldest first); present newest first.
    let mut entries = state.store.karma_history(&auth.user_id)?;
    entries.reverse();

    Ok(Json(KarmaHistoryResponse {
        entries: entries.iter().map(KarmaEntryResponse::from).collect(),
    }))
}

//! Votable item types.
//!
//! An item is anything users can vote on: a fact check attached to a
//! transcript passage, or a comment under a fact check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ItemId, UserId};

/// A votable item: a fact check or a comment.
///
/// The `upvotes`/`downvotes` counters are denormalized aggregates over the
/// item's vote records. They are mutated only by the vote transaction; the
/// validation status only by moderation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique item ID (ULID for time-ordering).
    pub id: ItemId,

    /// The user who submitted the item.
    pub owner_id: UserId,

    /// Whether this is a fact check or a comment.
    pub kind: ItemKind,

    /// Moderation verdict. Always `Unvalidated` for comments.
    pub status: ValidationStatus,

    /// Number of active upvotes.
    pub upvotes: u32,

    /// Number of active downvotes.
    pub downvotes: u32,

    /// When the item was created.
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Create a new item with zero votes.
    #[must_use]
    pub fn new(owner_id: UserId, kind: ItemKind) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::generate(),
            owner_id,
            kind,
            status: ValidationStatus::Unvalidated,
            upvotes: 0,
            downvotes: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The current denormalized counters.
    #[must_use]
    pub const fn counts(&self) -> VoteCounts {
        VoteCounts {
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        }
    }

    /// Whether the given user submitted this item.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.owner_id == *user_id
    }
}

/// What kind of votable item this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A fact check submitted against a transcript passage.
    FactCheck,

    /// A comment under a fact check.
    Comment,
}

/// Moderation verdict on a fact check.
///
/// Comments never leave `Unvalidated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    /// No moderation verdict yet.
    Unvalidated,

    /// Moderators confirmed the claim.
    ValidatedTrue,

    /// Moderators debunked the claim.
    ValidatedFalse,

    /// Moderators could not reach a verdict.
    ValidatedControversial,
}

impl ValidationStatus {
    /// Status used when scoring votes.
    ///
    /// Controversial facts score like unvalidated ones: the community has no
    /// verdict to be right or wrong about.
    #[must_use]
    pub const fn scoring(self) -> Self {
        match self {
            Self::ValidatedControversial => Self::Unvalidated,
            other => other,
        }
    }
}

/// Aggregated vote counters for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    /// Number of active upvotes.
    pub upvotes: u32,

    /// Number of active downvotes.
    pub downvotes: u32,
}

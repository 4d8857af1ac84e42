//! Karma actions, the point table, ledger entries, and award derivation.
//!
//! Karma is a per-user reputation score derived from an append-only ledger.
//! Every scoreable event is a [`KarmaAction`]; the point table is a total
//! mapping enforced by an exhaustive `match`, so an unmapped action cannot
//! compile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EntryId, ItemId, ItemKind, UserId, ValidationStatus, VoteApplied, VoteValue};

/// Karma total every user starts with.
pub const STARTING_KARMA: i64 = 10;

/// A scoreable event kind.
///
/// Wire names are SCREAMING_SNAKE_CASE to match the platform's existing
/// ledger data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KarmaAction {
    /// Submitted a fact check.
    SubmitFact,
    /// Own fact check was validated true by moderators.
    FactValidatedTrue,
    /// Own fact check was validated false by moderators.
    FactValidatedFalse,
    /// Own fact check was marked controversial by moderators.
    FactValidatedControversial,
    /// Own fact check was deleted by moderators.
    FactDeleted,
    /// Own fact check received an upvote.
    FactUpvoted,
    /// Own fact check received a downvote.
    FactDownvoted,
    /// An upvote on own fact check was withdrawn.
    FactUpvoteRemoved,
    /// A downvote on own fact check was withdrawn.
    FactDownvoteRemoved,
    /// Submitted a comment.
    SubmitComment,
    /// Own comment received an upvote.
    CommentUpvoted,
    /// Own comment received a downvote.
    CommentDownvoted,
    /// Own comment was deleted by moderators.
    CommentDeleted,
    /// Upvoted a fact check validated true.
    UpvoteGivenValidatedTrue,
    /// Upvoted a fact check validated false.
    UpvoteGivenValidatedFalse,
    /// Upvoted a fact check with no verdict.
    UnvalidatedFactUpvoted,
    /// Downvoted a fact check validated true.
    DownvoteGivenValidatedTrue,
    /// Downvoted a fact check validated false.
    DownvoteGivenValidatedFalse,
    /// Downvoted a fact check with no verdict.
    UnvalidatedFactDownvoted,
    /// Withdrew an upvote.
    UpvoteGivenRemoved,
    /// Withdrew a downvote from a fact validated false.
    DownvoteCorrectRemoved,
    /// Withdrew a downvote from a fact validated true.
    DownvoteValidatedFactRemoved,
    /// Withdrew a downvote from a fact with no verdict.
    DownvoteGivenRemoved,
}

impl KarmaAction {
    /// The signed point value for this action.
    ///
    /// The mapping is total: every action resolves here, at compile time.
    #[must_use]
    pub const fn points(self) -> i64 {
        match self {
            Self::SubmitFact => 10,
            Self::FactValidatedTrue => 20,
            Self::FactValidatedFalse => -15,
            Self::FactValidatedControversial => 5,
            Self::FactDeleted => -10,
            Self::FactUpvoted => 2,
            Self::FactDownvoted => -1,
            Self::FactUpvoteRemoved => -2,
            Self::FactDownvoteRemoved => 1,
            Self::SubmitComment => 1,
            Self::CommentUpvoted => 1,
            Self::CommentDownvoted => -1,
            Self::CommentDeleted => -1,
            Self::UpvoteGivenValidatedTrue => 1,
            Self::UpvoteGivenValidatedFalse => -2,
            Self::UnvalidatedFactUpvoted => 1,
            Self::DownvoteGivenValidatedTrue => -2,
            Self::DownvoteGivenValidatedFalse => 1,
            Self::UnvalidatedFactDownvoted => 0,
            Self::UpvoteGivenRemoved => -1,
            Self::DownvoteCorrectRemoved => -1,
            Self::DownvoteValidatedFactRemoved => 2,
            Self::DownvoteGivenRemoved => 0,
        }
    }

    /// The canonical wire name, used in dedup keys.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SubmitFact => "SUBMIT_FACT",
            Self::FactValidatedTrue => "FACT_VALIDATED_TRUE",
            Self::FactValidatedFalse => "FACT_VALIDATED_FALSE",
            Self::FactValidatedControversial => "FACT_VALIDATED_CONTROVERSIAL",
            Self::FactDeleted => "FACT_DELETED",
            Self::FactUpvoted => "FACT_UPVOTED",
            Self::FactDownvoted => "FACT_DOWNVOTED",
            Self::FactUpvoteRemoved => "FACT_UPVOTE_REMOVED",
            Self::FactDownvoteRemoved => "FACT_DOWNVOTE_REMOVED",
            Self::SubmitComment => "SUBMIT_COMMENT",
            Self::CommentUpvoted => "COMMENT_UPVOTED",
            Self::CommentDownvoted => "COMMENT_DOWNVOTED",
            Self::CommentDeleted => "COMMENT_DELETED",
            Self::UpvoteGivenValidatedTrue => "UPVOTE_GIVEN_VALIDATED_TRUE",
            Self::UpvoteGivenValidatedFalse => "UPVOTE_GIVEN_VALIDATED_FALSE",
            Self::UnvalidatedFactUpvoted => "UNVALIDATED_FACT_UPVOTED",
            Self::DownvoteGivenValidatedTrue => "DOWNVOTE_GIVEN_VALIDATED_TRUE",
            Self::DownvoteGivenValidatedFalse => "DOWNVOTE_GIVEN_VALIDATED_FALSE",
            Self::UnvalidatedFactDownvoted => "UNVALIDATED_FACT_DOWNVOTED",
            Self::UpvoteGivenRemoved => "UPVOTE_GIVEN_REMOVED",
            Self::DownvoteCorrectRemoved => "DOWNVOTE_CORRECT_REMOVED",
            Self::DownvoteValidatedFactRemoved => "DOWNVOTE_VALIDATED_FACT_REMOVED",
            Self::DownvoteGivenRemoved => "DOWNVOTE_GIVEN_REMOVED",
        }
    }
}

/// An immutable karma ledger entry.
///
/// At most one entry exists per `(user_id, action, target_id)` triple; the
/// store enforces this on append. Entries are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KarmaHistoryEntry {
    /// Unique entry ID (ULID for time-ordering).
    pub id: EntryId,

    /// The user whose karma changed.
    pub user_id: UserId,

    /// What happened.
    pub action: KarmaAction,

    /// Point value at the time of the award.
    pub points: i64,

    /// The item the action concerns.
    pub target_id: ItemId,

    /// When the entry was appended.
    pub timestamp: DateTime<Utc>,
}

impl KarmaHistoryEntry {
    /// Create a new entry stamped with the current time.
    ///
    /// Points are looked up from the static table.
    #[must_use]
    pub fn new(user_id: UserId, action: KarmaAction, target_id: ItemId) -> Self {
        Self {
            id: EntryId::generate(),
            user_id,
            action,
            points: action.points(),
            target_id,
            timestamp: Utc::now(),
        }
    }
}

/// A user's running karma total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserKarma {
    /// The user this row belongs to.
    pub user_id: UserId,

    /// Running total: `STARTING_KARMA` plus the sum of the user's ledger
    /// points.
    pub total_karma: i64,

    /// When the total last changed.
    pub last_updated: DateTime<Utc>,
}

impl UserKarma {
    /// Create a fresh row at the starting total.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            total_karma: STARTING_KARMA,
            last_updated: Utc::now(),
        }
    }
}

/// A karma action owed to a user, pending append to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KarmaAward {
    /// Who earns (or loses) the points.
    pub user_id: UserId,

    /// The action to record.
    pub action: KarmaAction,
}

/// Derive the karma actions owed for a committed vote transaction.
///
/// Owner-side actions are skipped entirely when the voter owns the item;
/// voter-side actions still apply. Comments produce owner-side actions only
/// (they carry no validation status for the voter to be judged against), and
/// have no removal variants. Voter-side actions are keyed by the item's
/// validation status at the time of the transaction, with controversial
/// treated as unvalidated.
///
/// Removals are listed before additions, matching the order the counters
/// were adjusted.
#[must_use]
pub fn vote_awards(event: &VoteApplied) -> Vec<KarmaAward> {
    if event.is_noop() {
        return Vec::new();
    }

    let mut awards = Vec::with_capacity(4);
    let self_vote = event.voter_id == event.owner_id;

    if !self_vote {
        match event.kind {
            ItemKind::FactCheck => {
                match event.old_value {
                    VoteValue::Up => awards.push(KarmaAward {
                        user_id: event.owner_id,
                        action: KarmaAction::FactUpvoteRemoved,
                    }),
                    VoteValue::Down => awards.push(KarmaAward {
                        user_id: event.owner_id,
                        action: KarmaAction::FactDownvoteRemoved,
                    }),
                    VoteValue::None => {}
                }
                match event.new_value {
                    VoteValue::Up => awards.push(KarmaAward {
                        user_id: event.owner_id,
                        action: KarmaAction::FactUpvoted,
                    }),
                    VoteValue::Down => awards.push(KarmaAward {
                        user_id: event.owner_id,
                        action: KarmaAction::FactDownvoted,
                    }),
                    VoteValue::None => {}
                }
            }
            ItemKind::Comment => match event.new_value {
                VoteValue::Up => awards.push(KarmaAward {
                    user_id: event.owner_id,
                    action: KarmaAction::CommentUpvoted,
                }),
                VoteValue::Down => awards.push(KarmaAward {
                    user_id: event.owner_id,
                    action: KarmaAction::CommentDownvoted,
                }),
                VoteValue::None => {}
            },
        }
    }

    if event.kind == ItemKind::FactCheck {
        let status = event.status.scoring();

        match event.old_value {
            VoteValue::Up => awards.push(KarmaAward {
                user_id: event.voter_id,
                action: KarmaAction::UpvoteGivenRemoved,
            }),
            VoteValue::Down => awards.push(KarmaAward {
                user_id: event.voter_id,
                action: match status {
                    ValidationStatus::ValidatedFalse => KarmaAction::DownvoteCorrectRemoved,
                    ValidationStatus::ValidatedTrue => KarmaAction::DownvoteValidatedFactRemoved,
                    _ => KarmaAction::DownvoteGivenRemoved,
                },
            }),
            VoteValue::None => {}
        }

        match event.new_value {
            VoteValue::Up => awards.push(KarmaAward {
                user_id: event.voter_id,
                action: match status {
                    ValidationStatus::ValidatedTrue => KarmaAction::UpvoteGivenValidatedTrue,
                    ValidationStatus::ValidatedFalse => KarmaAction::UpvoteGivenValidatedFalse,
                    _ => KarmaAction::UnvalidatedFactUpvoted,
                },
            }),
            VoteValue::Down => awards.push(KarmaAward {
                user_id: event.voter_id,
                action: match status {
                    ValidationStatus::ValidatedTrue => KarmaAction::DownvoteGivenValidatedTrue,
                    ValidationStatus::ValidatedFalse => KarmaAction::DownvoteGivenValidatedFalse,
                    _ => KarmaAction::UnvalidatedFactDownvoted,
                },
            }),
            VoteValue::None => {}
        }
    }

    awards
}

/// Derive the karma action owed to an item's owner for a moderation status
/// change.
///
/// Returns `None` when the status did not change or the item is a comment.
#[must_use]
pub fn status_change_award(
    kind: ItemKind,
    owner_id: UserId,
    old_status: ValidationStatus,
    new_status: ValidationStatus,
) -> Option<KarmaAward> {
    if kind != ItemKind::FactCheck || old_status == new_status {
        return None;
    }

    let action = match new_status {
        ValidationStatus::ValidatedTrue => KarmaAction::FactValidatedTrue,
        ValidationStatus::ValidatedFalse => KarmaAction::FactValidatedFalse,
        ValidationStatus::ValidatedControversial => KarmaAction::FactValidatedControversial,
        ValidationStatus::Unvalidated => return None,
    };

    Some(KarmaAward { user_id: owner_id, action })
}

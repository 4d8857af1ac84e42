//! Vote types and the vote-applied event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ItemId, ItemKind, UserId, ValidationStatus};

/// A single vote slot value.
///
/// Exactly one vote slot exists per `(item, voter)` pair. `None` means the
/// slot is empty; empty slots are stored as the absence of a record, not as
/// a zero-valued record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum VoteValue {
    /// An active downvote (-1).
    Down,

    /// No vote (0).
    None,

    /// An active upvote (+1).
    Up,
}

impl VoteValue {
    /// The signed integer representation used on the wire.
    #[must_use]
    pub const fn as_i8(self) -> i8 {
        match self {
            Self::Down => -1,
            Self::None => 0,
            Self::Up => 1,
        }
    }

    /// Whether the slot holds an active vote.
    #[must_use]
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl TryFrom<i8> for VoteValue {
    type Error = InvalidVoteValue;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Down),
            0 => Ok(Self::None),
            1 => Ok(Self::Up),
            other => Err(InvalidVoteValue(other)),
        }
    }
}

impl From<VoteValue> for i8 {
    fn from(value: VoteValue) -> Self {
        value.as_i8()
    }
}

/// Error for vote values outside {-1, 0, +1}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid vote value: {0} (expected -1, 0, or 1)")]
pub struct InvalidVoteValue(pub i8);

/// A stored vote record.
///
/// Keyed by `(item_id, voter_id)` in storage; only `Up`/`Down` values are
/// ever persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    /// The item being voted on.
    pub item_id: ItemId,

    /// The voting user.
    pub voter_id: UserId,

    /// The active vote value.
    pub value: VoteValue,

    /// When the vote was cast or last changed.
    pub timestamp: DateTime<Utc>,
}

impl Vote {
    /// Create a vote record stamped with the current time.
    #[must_use]
    pub fn new(item_id: ItemId, voter_id: UserId, value: VoteValue) -> Self {
        Self {
            item_id,
            voter_id,
            value,
            timestamp: Utc::now(),
        }
    }
}

/// The outcome of a committed vote transaction.
///
/// All karma derivation consumes this event rather than reading vote state
/// directly, so point bookkeeping stays decoupled from vote mechanics. The
/// `status` field is the item's validation status at the time of the
/// transaction, which is what voter-side karma is keyed on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteApplied {
    /// The item voted on.
    pub item_id: ItemId,

    /// The voting user.
    pub voter_id: UserId,

    /// The item's submitter.
    pub owner_id: UserId,

    /// Fact check or comment.
    pub kind: ItemKind,

    /// Validation status at the time the vote committed.
    pub status: ValidationStatus,

    /// The vote slot value before the transaction.
    pub old_value: VoteValue,

    /// The vote slot value after the transaction.
    pub new_value: VoteValue,

    /// Upvote counter after the transaction.
    pub upvotes: u32,

    /// Downvote counter after the transaction.
    pub downvotes: u32,
}

impl VoteApplied {
    /// Whether the transaction changed anything.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(
            (self.old_value, self.new_value),
            (VoteValue::Up, VoteValue::Up)
                | (VoteValue::Down, VoteValue::Down)
                | (VoteValue::None, VoteValue::None)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_value_i8_roundtrip() {
        for value in [VoteValue::Down, VoteValue::None, VoteValue::Up] {
            assert_eq!(VoteValue::try_from(value.as_i8()).unwrap(), value);
        }
    }

    #[test]
    fn vote_value_rejects_out_of_range() {
        assert_eq!(VoteValue::try_from(2), Err(InvalidVoteValue(2)));
        assert_eq!(VoteValue::try_from(-5), Err(InvalidVoteValue(-5)));
    }

    #[test]
    fn vote_value_serde_json() {
        let json = serde_json::to_string(&VoteValue::Up).unwrap();
        assert_eq!(json, "1");
        let parsed: VoteValue = serde_json::from_str("-1").unwrap();
        assert_eq!(parsed, VoteValue::Down);
        assert!(serde_json::from_str::<VoteValue>("3").is_err());
    }

    #[test]
    fn noop_detection() {
        let event = VoteApplied {
            item_id: ItemId::generate(),
            voter_id: UserId::generate(),
            owner_id: UserId::generate(),
            kind: ItemKind::FactCheck,
            status: ValidationStatus::Unvalidated,
            old_value: VoteValue::Up,
            new_value: VoteValue::Up,
            upvotes: 1,
            downvotes: 0,
        };
        assert!(event.is_noop());
    }
}

//! Core types and utilities for podcheck.
//!
//! This crate provides the foundational types used throughout the podcheck
//! vote and karma platform:
//!
//! - **Identifiers**: `UserId`, `ItemId`, `EntryId`
//! - **Items**: `Item`, `ItemKind`, `ValidationStatus`, `VoteCounts`
//! - **Votes**: `Vote`, `VoteValue`, `VoteApplied`
//! - **Karma**: `KarmaAction`, `KarmaHistoryEntry`, `UserKarma`, the point
//!   table, and the pure award derivations
//!
//! # Karma model
//!
//! Karma is an append-only ledger: every scoreable event becomes an
//! immutable [`KarmaHistoryEntry`] and bumps the user's running total, which
//! starts at [`STARTING_KARMA`]. At most one entry exists per
//! `(user, action, target)` triple, so re-processing an event is a no-op
//! rather than a double award.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod item;
pub mod karma;
pub mod vote;

pub use error::{CoreError, Result};
pub use ids::{EntryId, IdError, ItemId, UserId};
pub use item::{Item, ItemKind, ValidationStatus, VoteCounts};
pub use karma::{
    status_change_award, vote_awards, KarmaAction, KarmaAward, KarmaHistoryEntry, UserKarma,
    STARTING_KARMA,
};
pub use vote::{InvalidVoteValue, Vote, VoteApplied, VoteValue};

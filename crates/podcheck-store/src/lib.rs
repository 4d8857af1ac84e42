//! `RocksDB` storage layer for podcheck.
//!
//! This crate provides persistent storage for items, votes, and the karma
//! ledger using `RocksDB` with optimistic transactions.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `items`: Votable items, keyed by `item_id`
//! - `votes`: Vote records, keyed by `item_id || voter_id`
//! - `user_karma`: Running karma totals, keyed by `user_id`
//! - `karma_history`: Ledger entries, keyed by `entry_id` (ULID)
//! - `karma_history_by_user`: Index for listing a user's ledger entries
//! - `karma_dedup`: At-most-once markers, keyed by `(user, action, target)`
//!
//! Two transaction scopes exist and are never combined: the vote transaction
//! touches one item plus one vote record; the karma append touches one karma
//! row plus its ledger writes. Commit conflicts retry a bounded number of
//! times inside the store before surfacing as [`StoreError::Conflict`].
//!
//! # Example
//!
//! ```no_run
//! use podcheck_store::{RocksStore, Store};
//! use podcheck_core::{Item, ItemKind, UserId, VoteValue};
//!
//! let store = RocksStore::open("/tmp/podcheck-db").unwrap();
//!
//! // Create an item and vote on it
//! let owner = UserId::generate();
//! let item = Item::new(owner, ItemKind::FactCheck);
//! store.put_item(&item).unwrap();
//!
//! let voter = UserId::generate();
//! let outcome = store.apply_vote(&item.id, &voter, VoteValue::Up).unwrap();
//! assert_eq!(outcome.upvotes, 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use std::collections::HashMap;

use podcheck_core::{
    Item, ItemId, KarmaAction, KarmaHistoryEntry, UserId, ValidationStatus, VoteApplied,
    VoteCounts, VoteValue,
};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Item Operations
    // =========================================================================

    /// Insert or update an item record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_item(&self, item: &Item) -> Result<()>;

    /// Get an item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_item(&self, item_id: &ItemId) -> Result<Option<Item>>;

    /// Delete an item and all of its vote records.
    ///
    /// Returns the deleted item so callers can settle karma for its owner.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item doesn't exist.
    fn delete_item(&self, item_id: &ItemId) -> Result<Item>;

    /// Set an item's validation status.
    ///
    /// Returns the updated item and the previous status. Writing the same
    /// status twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item doesn't exist.
    fn set_validation_status(
        &self,
        item_id: &ItemId,
        status: ValidationStatus,
    ) -> Result<(Item, ValidationStatus)>;

    // =========================================================================
    // Vote Operations
    // =========================================================================

    /// Get a voter's vote on an item (`VoteValue::None` if absent).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_vote(&self, item_id: &ItemId, voter_id: &UserId) -> Result<VoteValue>;

    /// Batched vote lookup across many items for one voter.
    ///
    /// Items the voter has not voted on are omitted from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn votes_for_user(
        &self,
        voter_id: &UserId,
        item_ids: &[ItemId],
    ) -> Result<HashMap<ItemId, VoteValue>>;

    /// Recompute an item's counters by scanning its vote records.
    ///
    /// This is the repair/audit path; the hot path reads the denormalized
    /// counters on the item itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn tally_votes(&self, item_id: &ItemId) -> Result<VoteCounts>;

    /// Apply a vote atomically: adjust the item's counters and the voter's
    /// vote record in one transaction.
    ///
    /// Re-submitting the current value is an idempotent no-op. Requesting
    /// `VoteValue::None` deletes the vote record. The returned event carries
    /// the item's owner and validation status at the time of the
    /// transaction, which is everything karma derivation needs.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the item doesn't exist.
    /// - `StoreError::Conflict` if the transaction kept conflicting after
    ///   the retry budget.
    fn apply_vote(
        &self,
        item_id: &ItemId,
        voter_id: &UserId,
        requested: VoteValue,
    ) -> Result<VoteApplied>;

    // =========================================================================
    // Karma Ledger Operations
    // =========================================================================

    /// Get a user's karma total, lazily creating the row at the starting
    /// total if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn karma_total(&self, user_id: &UserId) -> Result<i64>;

    /// Append a ledger entry and bump the user's total atomically.
    ///
    /// Returns `false` without mutating anything when an entry for the same
    /// `(user, action, target)` triple already exists; this is the guard
    /// against double-awarding, and a legitimate duplicate is a correctness
    /// no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the transaction kept conflicting
    /// after the retry budget.
    fn append_karma_entry(
        &self,
        user_id: &UserId,
        action: KarmaAction,
        target_id: &ItemId,
    ) -> Result<bool>;

    /// All ledger entries for a user, in ledger (ULID-ascending) order.
    ///
    /// The presentation layer sorts newest-first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn karma_history(&self, user_id: &UserId) -> Result<Vec<KarmaHistoryEntry>>;
}

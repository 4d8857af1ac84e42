//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families. IDs encode to fixed 16-byte segments, so composite keys
//! are unambiguous without separators.

use podcheck_core::{EntryId, ItemId, KarmaAction, UserId};

/// Create an item key from an item ID.
#[must_use]
pub fn item_key(item_id: &ItemId) -> Vec<u8> {
    item_id.to_bytes().to_vec()
}

/// Create a vote key from an item ID and voter ID.
///
/// Format: `item_id (16 bytes) || voter_id (16 bytes)`
///
/// One key exists per `(item, voter)` pair, which is what enforces the
/// one-vote-per-user invariant.
#[must_use]
pub fn vote_key(item_id: &ItemId, voter_id: &UserId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(&item_id.to_bytes());
    key.extend_from_slice(voter_id.as_bytes());
    key
}

/// Create a prefix for iterating all votes on an item.
#[must_use]
pub fn item_votes_prefix(item_id: &ItemId) -> Vec<u8> {
    item_id.to_bytes().to_vec()
}

/// Create a karma total key from a user ID.
#[must_use]
pub fn user_karma_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a ledger entry key from an entry ID.
#[must_use]
pub fn entry_key(entry_id: &EntryId) -> Vec<u8> {
    entry_id.to_bytes().to_vec()
}

/// Create a user-entry index key.
///
/// Format: `user_id (16 bytes) || entry_id (16 bytes)`
///
/// Since ULIDs are time-ordered, a user's entries sort chronologically.
#[must_use]
pub fn user_entry_key(user_id: &UserId, entry_id: &EntryId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&entry_id.to_bytes());
    key
}

/// Create a prefix for iterating all ledger entries for a user.
#[must_use]
pub fn user_entries_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the entry ID from a user-entry index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_entry_id_from_user_key(key: &[u8]) -> EntryId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    EntryId::from_bytes(bytes).expect("valid ULID bytes")
}

/// Create a dedup marker key for the `(user, action, target)` triple.
///
/// Format: `user_id (16 bytes) || action name || target_id (16 bytes)`
///
/// The action name sits between two fixed-width segments, so distinct
/// triples always encode to distinct keys.
#[must_use]
pub fn karma_dedup_key(user_id: &UserId, action: KarmaAction, target_id: &ItemId) -> Vec<u8> {
    let name = action.name().as_bytes();
    let mut key = Vec::with_capacity(32 + name.len());
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(name);
    key.extend_from_slice(&target_id.to_bytes());
    key
}

//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Votable items, keyed by `item_id` (ULID).
    pub const ITEMS: &str = "items";

    /// Vote records, keyed by `item_id || voter_id`.
    pub const VOTES: &str = "votes";

    /// Running karma totals, keyed by `user_id`.
    pub const USER_KARMA: &str = "user_karma";

    /// Karma ledger entries, keyed by `entry_id` (ULID).
    pub const KARMA_HISTORY: &str = "karma_history";

    /// Index: ledger entries by user, keyed by `user_id || entry_id`.
    /// Value is empty (index only).
    pub const KARMA_HISTORY_BY_USER: &str = "karma_history_by_user";

    /// Dedup markers, keyed by `user_id || action_name || target_id`.
    /// Value is the entry ID that claimed the triple.
    pub const KARMA_DEDUP: &str = "karma_dedup";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ITEMS,
        cf::VOTES,
        cf::USER_KARMA,
        cf::KARMA_HISTORY,
        cf::KARMA_HISTORY_BY_USER,
        cf::KARMA_DEDUP,
    ]
}

//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait, built on an optimistic transaction database. Every read-check-write
//! sequence runs inside a transaction with `get_for_update` reads, so
//! concurrent writers serialize; commit conflicts retry a bounded number of
//! times before surfacing.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, MultiThreaded,
    OptimisticTransactionDB, Options,
};

use podcheck_core::{
    Item, ItemId, KarmaAction, KarmaHistoryEntry, UserId, UserKarma, ValidationStatus, Vote,
    VoteApplied, VoteCounts, VoteValue,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// How many times a conflicting transaction is re-run before giving up.
const MAX_TXN_RETRIES: u32 = 5;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<OptimisticTransactionDB<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = OptimisticTransactionDB::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Re-run `f` while it fails with a transaction conflict, up to the
    /// retry budget.
    fn with_txn_retries<T>(op: &'static str, f: impl Fn() -> Result<T>) -> Result<T> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match f() {
                Err(StoreError::Conflict { .. }) if attempt < MAX_TXN_RETRIES => {
                    tracing::debug!(op, attempt, "transaction conflict, retrying");
                }
                other => return other,
            }
        }
    }

    /// Single attempt of the vote transaction (see `Store::apply_vote`).
    fn try_apply_vote(
        &self,
        item_id: &ItemId,
        voter_id: &UserId,
        requested: VoteValue,
    ) -> Result<VoteApplied> {
        let cf_items = self.cf(cf::ITEMS)?;
        let cf_votes = self.cf(cf::VOTES)?;

        let txn = self.db.transaction();

        let item_key = keys::item_key(item_id);
        let raw = txn
            .get_for_update_cf(&cf_items, &item_key, true)
            .map_err(txn_err("apply_vote"))?
            .ok_or_else(|| StoreError::not_found("item", item_id))?;
        let mut item: Item = Self::deserialize(&raw)?;

        let vote_key = keys::vote_key(item_id, voter_id);
        let old_value = match txn
            .get_for_update_cf(&cf_votes, &vote_key, true)
            .map_err(txn_err("apply_vote"))?
        {
            Some(data) => Self::deserialize::<Vote>(&data)?.value,
            None => VoteValue::None,
        };

        // Idempotent re-vote: commit nothing.
        if old_value == requested {
            return Ok(VoteApplied {
                item_id: *item_id,
                voter_id: *voter_id,
                owner_id: item.owner_id,
                kind: item.kind,
                status: item.status,
                old_value,
                new_value: requested,
                upvotes: item.upvotes,
                downvotes: item.downvotes,
            });
        }

        // Remove the old vote's effect; the saturating floor guards against
        // counter drift from any prior inconsistency.
        match old_value {
            VoteValue::Up => item.upvotes = item.upvotes.saturating_sub(1),
            VoteValue::Down => item.downvotes = item.downvotes.saturating_sub(1),
            VoteValue::None => {}
        }
        match requested {
            VoteValue::Up => item.upvotes += 1,
            VoteValue::Down => item.downvotes += 1,
            VoteValue::None => {}
        }
        item.updated_at = chrono::Utc::now();

        if requested == VoteValue::None {
            txn.delete_cf(&cf_votes, &vote_key)
                .map_err(txn_err("apply_vote"))?;
        } else {
            let vote = Vote::new(*item_id, *voter_id, requested);
            txn.put_cf(&cf_votes, &vote_key, Self::serialize(&vote)?)
                .map_err(txn_err("apply_vote"))?;
        }
        txn.put_cf(&cf_items, &item_key, Self::serialize(&item)?)
            .map_err(txn_err("apply_vote"))?;

        txn.commit().map_err(txn_err("apply_vote"))?;

        Ok(VoteApplied {
            item_id: *item_id,
            voter_id: *voter_id,
            owner_id: item.owner_id,
            kind: item.kind,
            status: item.status,
            old_value,
            new_value: requested,
            upvotes: item.upvotes,
            downvotes: item.downvotes,
        })
    }

    /// Single attempt of the karma append transaction.
    fn try_append_karma_entry(
        &self,
        user_id: &UserId,
        action: KarmaAction,
        target_id: &ItemId,
    ) -> Result<bool> {
        let cf_dedup = self.cf(cf::KARMA_DEDUP)?;
        let cf_karma = self.cf(cf::USER_KARMA)?;
        let cf_history = self.cf(cf::KARMA_HISTORY)?;
        let cf_by_user = self.cf(cf::KARMA_HISTORY_BY_USER)?;

        let txn = self.db.transaction();

        // The existence check is part of the transaction, so concurrent
        // appends for the same triple serialize and exactly one wins.
        let dedup_key = keys::karma_dedup_key(user_id, action, target_id);
        if txn
            .get_for_update_cf(&cf_dedup, &dedup_key, true)
            .map_err(txn_err("append_karma_entry"))?
            .is_some()
        {
            return Ok(false);
        }

        let karma_key = keys::user_karma_key(user_id);
        let mut karma = match txn
            .get_for_update_cf(&cf_karma, &karma_key, true)
            .map_err(txn_err("append_karma_entry"))?
        {
            Some(data) => Self::deserialize::<UserKarma>(&data)?,
            None => UserKarma::new(*user_id),
        };
        karma.total_karma += action.points();
        karma.last_updated = chrono::Utc::now();

        let entry = KarmaHistoryEntry::new(*user_id, action, *target_id);

        txn.put_cf(&cf_history, keys::entry_key(&entry.id), Self::serialize(&entry)?)
            .map_err(txn_err("append_karma_entry"))?;
        txn.put_cf(&cf_by_user, keys::user_entry_key(user_id, &entry.id), [])
            .map_err(txn_err("append_karma_entry"))?;
        txn.put_cf(&cf_dedup, &dedup_key, entry.id.to_bytes())
            .map_err(txn_err("append_karma_entry"))?;
        txn.put_cf(&cf_karma, &karma_key, Self::serialize(&karma)?)
            .map_err(txn_err("append_karma_entry"))?;

        txn.commit().map_err(txn_err("append_karma_entry"))?;

        tracing::debug!(
            user_id = %user_id,
            action = action.name(),
            target_id = %target_id,
            points = action.points(),
            total = karma.total_karma,
            "karma entry appended"
        );

        Ok(true)
    }
}

/// Map a `RocksDB` error to a store error, treating commit contention as a
/// retryable conflict.
fn txn_err(op: &'static str) -> impl Fn(rocksdb::Error) -> StoreError {
    move |e| match e.kind() {
        rocksdb::ErrorKind::Busy | rocksdb::ErrorKind::TryAgain => StoreError::Conflict { op },
        _ => StoreError::Database(e.to_string()),
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Item Operations
    // =========================================================================

    fn put_item(&self, item: &Item) -> Result<()> {
        let cf = self.cf(cf::ITEMS)?;
        let key = keys::item_key(&item.id);
        let value = Self::serialize(item)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_item(&self, item_id: &ItemId) -> Result<Option<Item>> {
        let cf = self.cf(cf::ITEMS)?;
        let key = keys::item_key(item_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn delete_item(&self, item_id: &ItemId) -> Result<Item> {
        Self::with_txn_retries("delete_item", || {
            let cf_items = self.cf(cf::ITEMS)?;
            let cf_votes = self.cf(cf::VOTES)?;

            let txn = self.db.transaction();

            let item_key = keys::item_key(item_id);
            let raw = txn
                .get_for_update_cf(&cf_items, &item_key, true)
                .map_err(txn_err("delete_item"))?
                .ok_or_else(|| StoreError::not_found("item", item_id))?;
            let item: Item = Self::deserialize(&raw)?;

            // Drop the item's vote records in the same unit so a later
            // recount cannot resurrect counters for a dead item.
            let prefix = keys::item_votes_prefix(item_id);
            let iter = self
                .db
                .iterator_cf(&cf_votes, IteratorMode::From(&prefix, Direction::Forward));
            for entry in iter {
                let (key, _) = entry.map_err(|e| StoreError::Database(e.to_string()))?;
                if !key.starts_with(&prefix) {
                    break;
                }
                txn.delete_cf(&cf_votes, &key)
                    .map_err(txn_err("delete_item"))?;
            }

            txn.delete_cf(&cf_items, &item_key)
                .map_err(txn_err("delete_item"))?;
            txn.commit().map_err(txn_err("delete_item"))?;

            Ok(item)
        })
    }

    fn set_validation_status(
        &self,
        item_id: &ItemId,
        status: ValidationStatus,
    ) -> Result<(Item, ValidationStatus)> {
        Self::with_txn_retries("set_validation_status", || {
            let cf_items = self.cf(cf::ITEMS)?;

            let txn = self.db.transaction();

            let item_key = keys::item_key(item_id);
            let raw = txn
                .get_for_update_cf(&cf_items, &item_key, true)
                .map_err(txn_err("set_validation_status"))?
                .ok_or_else(|| StoreError::not_found("item", item_id))?;
            let mut item: Item = Self::deserialize(&raw)?;

            let previous = item.status;
            if previous == status {
                return Ok((item, previous));
            }

            item.status = status;
            item.updated_at = chrono::Utc::now();

            txn.put_cf(&cf_items, &item_key, Self::serialize(&item)?)
                .map_err(txn_err("set_validation_status"))?;
            txn.commit().map_err(txn_err("set_validation_status"))?;

            Ok((item, previous))
        })
    }

    // =========================================================================
    // Vote Operations
    // =========================================================================

    fn get_vote(&self, item_id: &ItemId, voter_id: &UserId) -> Result<VoteValue> {
        let cf = self.cf(cf::VOTES)?;
        let key = keys::vote_key(item_id, voter_id);

        let vote = self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize::<Vote>(&data))
            .transpose()?;

        Ok(vote.map_or(VoteValue::None, |v| v.value))
    }

    fn votes_for_user(
        &self,
        voter_id: &UserId,
        item_ids: &[ItemId],
    ) -> Result<HashMap<ItemId, VoteValue>> {
        let cf = self.cf(cf::VOTES)?;
        let mut votes = HashMap::new();

        for item_id in item_ids {
            let key = keys::vote_key(item_id, voter_id);
            if let Some(data) = self
                .db
                .get_cf(&cf, key)
                .map_err(|e| StoreError::Database(e.to_string()))?
            {
                let vote: Vote = Self::deserialize(&data)?;
                votes.insert(*item_id, vote.value);
            }
        }

        Ok(votes)
    }

    fn tally_votes(&self, item_id: &ItemId) -> Result<VoteCounts> {
        let cf = self.cf(cf::VOTES)?;
        let prefix = keys::item_votes_prefix(item_id);

        let mut counts = VoteCounts {
            upvotes: 0,
            downvotes: 0,
        };

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));
        for entry in iter {
            let (key, value) = entry.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }

            let vote: Vote = Self::deserialize(&value)?;
            match vote.value {
                VoteValue::Up => counts.upvotes += 1,
                VoteValue::Down => counts.downvotes += 1,
                VoteValue::None => {}
            }
        }

        Ok(counts)
    }

    fn apply_vote(
        &self,
        item_id: &ItemId,
        voter_id: &UserId,
        requested: VoteValue,
    ) -> Result<VoteApplied> {
        Self::with_txn_retries("apply_vote", || {
            self.try_apply_vote(item_id, voter_id, requested)
        })
    }

    // =========================================================================
    // Karma Ledger Operations
    // =========================================================================

    fn karma_total(&self, user_id: &UserId) -> Result<i64> {
        let cf_karma = self.cf(cf::USER_KARMA)?;
        let karma_key = keys::user_karma_key(user_id);

        // Hot path: the row already exists.
        if let Some(data) = self
            .db
            .get_cf(&cf_karma, &karma_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
        {
            let karma: UserKarma = Self::deserialize(&data)?;
            return Ok(karma.total_karma);
        }

        // Lazily create the row; a concurrent creator may win the race.
        Self::with_txn_retries("karma_total", || {
            let txn = self.db.transaction();
            match txn
                .get_for_update_cf(&cf_karma, &karma_key, true)
                .map_err(txn_err("karma_total"))?
            {
                Some(data) => {
                    let karma: UserKarma = Self::deserialize(&data)?;
                    Ok(karma.total_karma)
                }
                None => {
                    let karma = UserKarma::new(*user_id);
                    txn.put_cf(&cf_karma, &karma_key, Self::serialize(&karma)?)
                        .map_err(txn_err("karma_total"))?;
                    txn.commit().map_err(txn_err("karma_total"))?;
                    Ok(karma.total_karma)
                }
            }
        })
    }

    fn append_karma_entry(
        &self,
        user_id: &UserId,
        action: KarmaAction,
        target_id: &ItemId,
    ) -> Result<bool> {
        Self::with_txn_retries("append_karma_entry", || {
            self.try_append_karma_entry(user_id, action, target_id)
        })
    }

    fn karma_history(&self, user_id: &UserId) -> Result<Vec<KarmaHistoryEntry>> {
        let cf_by_user = self.cf(cf::KARMA_HISTORY_BY_USER)?;
        let cf_history = self.cf(cf::KARMA_HISTORY)?;
        let prefix = keys::user_entries_prefix(user_id);

        let mut entries = Vec::new();

        let iter = self
            .db
            .iterator_cf(&cf_by_user, IteratorMode::From(&prefix, Direction::Forward));
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }

            let entry_id = keys::extract_entry_id_from_user_key(&key);
            if let Some(data) = self
                .db
                .get_cf(&cf_history, keys::entry_key(&entry_id))
                .map_err(|e| StoreError::Database(e.to_string()))?
            {
                entries.push(Self::deserialize(&data)?);
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcheck_core::{ItemKind, STARTING_KARMA};
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn create_fact(store: &RocksStore) -> Item {
        let item = Item::new(UserId::generate(), ItemKind::FactCheck);
        store.put_item(&item).unwrap();
        item
    }

    #[test]
    fn item_crud() {
        let (store, _dir) = create_test_store();
        let item = create_fact(&store);

        let retrieved = store.get_item(&item.id).unwrap().unwrap();
        assert_eq!(retrieved.owner_id, item.owner_id);
        assert_eq!(retrieved.upvotes, 0);

        let deleted = store.delete_item(&item.id).unwrap();
        assert_eq!(deleted.id, item.id);
        assert!(store.get_item(&item.id).unwrap().is_none());
    }

    #[test]
    fn delete_missing_item_fails() {
        let (store, _dir) = create_test_store();
        let result = store.delete_item(&ItemId::generate());
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn apply_vote_new_upvote() {
        let (store, _dir) = create_test_store();
        let item = create_fact(&store);
        let voter = UserId::generate();

        let outcome = store.apply_vote(&item.id, &voter, VoteValue::Up).unwrap();
        assert_eq!(outcome.old_value, VoteValue::None);
        assert_eq!(outcome.new_value, VoteValue::Up);
        assert_eq!(outcome.upvotes, 1);
        assert_eq!(outcome.downvotes, 0);
        assert_eq!(outcome.owner_id, item.owner_id);

        assert_eq!(store.get_vote(&item.id, &voter).unwrap(), VoteValue::Up);
        let stored = store.get_item(&item.id).unwrap().unwrap();
        assert_eq!(stored.upvotes, 1);
    }

    #[test]
    fn apply_vote_idempotent_re_vote() {
        let (store, _dir) = create_test_store();
        let item = create_fact(&store);
        let voter = UserId::generate();

        store.apply_vote(&item.id, &voter, VoteValue::Up).unwrap();
        let outcome = store.apply_vote(&item.id, &voter, VoteValue::Up).unwrap();

        assert!(outcome.is_noop());
        assert_eq!(outcome.upvotes, 1);

        let stored = store.get_item(&item.id).unwrap().unwrap();
        assert_eq!(stored.upvotes, 1);
        assert_eq!(stored.downvotes, 0);
    }

    #[test]
    fn apply_vote_switch_direction() {
        let (store, _dir) = create_test_store();
        let item = create_fact(&store);
        let voter = UserId::generate();

        store.apply_vote(&item.id, &voter, VoteValue::Up).unwrap();
        let outcome = store.apply_vote(&item.id, &voter, VoteValue::Down).unwrap();

        assert_eq!(outcome.old_value, VoteValue::Up);
        assert_eq!(outcome.new_value, VoteValue::Down);
        assert_eq!(outcome.upvotes, 0);
        assert_eq!(outcome.downvotes, 1);
        assert_eq!(store.get_vote(&item.id, &voter).unwrap(), VoteValue::Down);
    }

    #[test]
    fn apply_vote_clear_deletes_record() {
        let (store, _dir) = create_test_store();
        let item = create_fact(&store);
        let voter = UserId::generate();

        store.apply_vote(&item.id, &voter, VoteValue::Down).unwrap();
        let outcome = store.apply_vote(&item.id, &voter, VoteValue::None).unwrap();

        assert_eq!(outcome.upvotes, 0);
        assert_eq!(outcome.downvotes, 0);
        assert_eq!(store.get_vote(&item.id, &voter).unwrap(), VoteValue::None);

        let tally = store.tally_votes(&item.id).unwrap();
        assert_eq!(tally.upvotes, 0);
        assert_eq!(tally.downvotes, 0);
    }

    #[test]
    fn apply_vote_missing_item_fails() {
        let (store, _dir) = create_test_store();
        let result = store.apply_vote(&ItemId::generate(), &UserId::generate(), VoteValue::Up);
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn counters_never_go_negative() {
        let (store, _dir) = create_test_store();
        let item = create_fact(&store);
        let voter = UserId::generate();

        store.apply_vote(&item.id, &voter, VoteValue::Up).unwrap();

        // Simulate prior counter drift: zero the counters behind the vote's
        // back, then remove the vote. The floor must hold at zero.
        let mut drifted = store.get_item(&item.id).unwrap().unwrap();
        drifted.upvotes = 0;
        store.put_item(&drifted).unwrap();

        let outcome = store.apply_vote(&item.id, &voter, VoteValue::None).unwrap();
        assert_eq!(outcome.upvotes, 0);
        assert_eq!(outcome.downvotes, 0);
    }

    #[test]
    fn counters_match_tally_after_settlement() {
        let (store, _dir) = create_test_store();
        let item = create_fact(&store);

        let voters: Vec<UserId> = (0..5).map(|_| UserId::generate()).collect();
        store.apply_vote(&item.id, &voters[0], VoteValue::Up).unwrap();
        store.apply_vote(&item.id, &voters[1], VoteValue::Up).unwrap();
        store.apply_vote(&item.id, &voters[2], VoteValue::Down).unwrap();
        store.apply_vote(&item.id, &voters[3], VoteValue::Up).unwrap();
        store.apply_vote(&item.id, &voters[4], VoteValue::Down).unwrap();
        // Two voters change their minds.
        store.apply_vote(&item.id, &voters[1], VoteValue::Down).unwrap();
        store.apply_vote(&item.id, &voters[4], VoteValue::None).unwrap();

        let stored = store.get_item(&item.id).unwrap().unwrap();
        let tally = store.tally_votes(&item.id).unwrap();
        assert_eq!(stored.counts(), tally);
        assert_eq!(tally.upvotes, 2);
        assert_eq!(tally.downvotes, 2);
    }

    #[test]
    fn votes_for_user_omits_absent() {
        let (store, _dir) = create_test_store();
        let voter = UserId::generate();
        let voted = create_fact(&store);
        let unvoted = create_fact(&store);

        store.apply_vote(&voted.id, &voter, VoteValue::Up).unwrap();

        let votes = store
            .votes_for_user(&voter, &[voted.id, unvoted.id])
            .unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes.get(&voted.id), Some(&VoteValue::Up));
        assert!(!votes.contains_key(&unvoted.id));
    }

    #[test]
    fn set_validation_status_reports_previous() {
        let (store, _dir) = create_test_store();
        let item = create_fact(&store);

        let (updated, previous) = store
            .set_validation_status(&item.id, ValidationStatus::ValidatedTrue)
            .unwrap();
        assert_eq!(previous, ValidationStatus::Unvalidated);
        assert_eq!(updated.status, ValidationStatus::ValidatedTrue);

        // Writing the same status again is a no-op.
        let (again, previous) = store
            .set_validation_status(&item.id, ValidationStatus::ValidatedTrue)
            .unwrap();
        assert_eq!(previous, ValidationStatus::ValidatedTrue);
        assert_eq!(again.status, ValidationStatus::ValidatedTrue);
    }

    #[test]
    fn delete_item_removes_votes() {
        let (store, _dir) = create_test_store();
        let item = create_fact(&store);
        let voter = UserId::generate();

        store.apply_vote(&item.id, &voter, VoteValue::Up).unwrap();
        store.delete_item(&item.id).unwrap();

        assert_eq!(store.get_vote(&item.id, &voter).unwrap(), VoteValue::None);
        let tally = store.tally_votes(&item.id).unwrap();
        assert_eq!(tally.upvotes, 0);
    }

    #[test]
    fn karma_total_lazily_initializes() {
        let (store, _dir) = create_test_store();
        let user = UserId::generate();

        assert_eq!(store.karma_total(&user).unwrap(), STARTING_KARMA);
        // Second read hits the persisted row.
        assert_eq!(store.karma_total(&user).unwrap(), STARTING_KARMA);
    }

    #[test]
    fn append_karma_entry_awards_once() {
        let (store, _dir) = create_test_store();
        let user = UserId::generate();
        let target = ItemId::generate();

        let first = store
            .append_karma_entry(&user, KarmaAction::FactUpvoted, &target)
            .unwrap();
        let second = store
            .append_karma_entry(&user, KarmaAction::FactUpvoted, &target)
            .unwrap();

        assert!(first);
        assert!(!second);

        assert_eq!(
            store.karma_total(&user).unwrap(),
            STARTING_KARMA + KarmaAction::FactUpvoted.points()
        );
        assert_eq!(store.karma_history(&user).unwrap().len(), 1);
    }

    #[test]
    fn append_karma_entry_accumulates_across_actions() {
        let (store, _dir) = create_test_store();
        let user = UserId::generate();
        let target = ItemId::generate();

        // Spaced out so the entry ULIDs land in different milliseconds and
        // the ledger order assertion below is deterministic.
        store
            .append_karma_entry(&user, KarmaAction::SubmitFact, &target)
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        store
            .append_karma_entry(&user, KarmaAction::FactValidatedTrue, &target)
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        store
            .append_karma_entry(&user, KarmaAction::FactDownvoted, &target)
            .unwrap();

        assert_eq!(
            store.karma_total(&user).unwrap(),
            STARTING_KARMA + 10 + 20 - 1
        );

        let history = store.karma_history(&user).unwrap();
        assert_eq!(history.len(), 3);
        // Ledger order is ULID-ascending, i.e. oldest first.
        assert_eq!(history[0].action, KarmaAction::SubmitFact);

        // Total equals the starting karma plus the sum of ledger points.
        let sum: i64 = history.iter().map(|e| e.points).sum();
        assert_eq!(store.karma_total(&user).unwrap(), STARTING_KARMA + sum);
    }

    #[test]
    fn same_action_different_targets_both_award() {
        let (store, _dir) = create_test_store();
        let user = UserId::generate();

        let first = store
            .append_karma_entry(&user, KarmaAction::FactUpvoted, &ItemId::generate())
            .unwrap();
        let second = store
            .append_karma_entry(&user, KarmaAction::FactUpvoted, &ItemId::generate())
            .unwrap();

        assert!(first);
        assert!(second);
        assert_eq!(
            store.karma_total(&user).unwrap(),
            STARTING_KARMA + 2 * KarmaAction::FactUpvoted.points()
        );
    }

    #[test]
    fn karma_history_isolated_per_user() {
        let (store, _dir) = create_test_store();
        let alice = UserId::generate();
        let bob = UserId::generate();
        let target = ItemId::generate();

        store
            .append_karma_entry(&alice, KarmaAction::SubmitFact, &target)
            .unwrap();
        store
            .append_karma_entry(&bob, KarmaAction::CommentUpvoted, &target)
            .unwrap();

        let alice_history = store.karma_history(&alice).unwrap();
        assert_eq!(alice_history.len(), 1);
        assert_eq!(alice_history[0].action, KarmaAction::SubmitFact);

        let bob_history = store.karma_history(&bob).unwrap();
        assert_eq!(bob_history.len(), 1);
        assert_eq!(bob_history[0].user_id, bob);
    }
}

//! Karma posting after committed vote and moderation transactions.
//!
//! Karma appends run outside the vote transaction: they touch the voter's or
//! owner's karma row, not the item, and the `(user, action, target)` dedup
//! makes re-posting safe. A failed append does not fail the operation that
//! produced it; it is logged with the full triple so it can be replayed.

use podcheck_core::{ItemId, KarmaAward};
use podcheck_store::{RocksStore, Store};

/// Post a batch of karma awards for one target item.
pub fn post_awards(store: &RocksStore, awards: &[KarmaAward], target_id: &ItemId) {
    for award in awards {
        post_award(store, *award, target_id);
    }
}

/// Post a single karma award for a target item.
pub fn post_award(store: &RocksStore, award: KarmaAward, target_id: &ItemId) {
    match store.append_karma_entry(&award.user_id, award.action, target_id) {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!(
                user_id = %award.user_id,
                action = award.action.name(),
                target_id = %target_id,
                "karma action already recorded"
            );
        }
        Err(e) => {
            tracing::warn!(
                user_id = %award.user_id,
                action = award.action.name(),
                target_id = %target_id,
                error = %e,
                "failed to post karma entry; append is idempotent and safe to replay"
            );
        }
    }
}

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use readstreak_domain::shared::UserKey;

/// One async mutex per user key. Holders of the guard for a key are the
/// only writers of that key's streak record.
///
/// An entry lives only while some caller holds or waits on its mutex, so the
/// map stays as large as the set of keys in flight.
#[derive(Default)]
pub struct UserLocks {
    locks: DashMap<UserKey, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user_key: &UserKey) -> UserLockGuard<'_> {
        // Clone the Arc out so the map shard is released before awaiting
        let lock = self.locks.entry(user_key.clone()).or_default().clone();
        let guard = lock.lock_owned().await;

        UserLockGuard {
            locks: &self.locks,
            user_key: user_key.clone(),
            guard: Some(guard),
        }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held lock for one user key. Dropping it unlocks and, when no other caller
/// references the mutex, removes the key from the map.
pub struct UserLockGuard<'a> {
    locks: &'a DashMap<UserKey, Arc<Mutex<()>>>,
    user_key: UserKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserLockGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // The shard lock serializes this check against `entry` in `acquire`,
        // so a count of one means only the map refers to the mutex
        self.locks
            .remove_if(&self.user_key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

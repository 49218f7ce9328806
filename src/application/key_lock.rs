//! Per-key async locks.
//!
//! Serializes work on one ledger key inside this process while leaving other
//! keys free to proceed. Entries are removed once no task holds or waits on
//! them, so the table only grows with in-flight keys.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Table of async mutexes keyed by string.
#[derive(Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Holds the lock for one key until dropped.
pub struct KeyGuard<'a> {
    owner: &'a KeyedLocks,
    key: String,
    lock: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until `key` is free and takes it.
    pub async fn lock(&self, key: impl Into<String>) -> KeyGuard<'_> {
        let key = key.into();
        let lock = self
            .table()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();

        let mut held = KeyGuard {
            owner: self,
            key,
            lock: lock.clone(),
            guard: None,
        };
        held.guard = Some(lock.lock_owned().await);
        held
    }

    /// Number of keys currently held or awaited.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The table is only touched in short non-async sections, so a poisoned
    // map is still consistent.
    fn table(&self) -> MutexGuard<'_, HashMap<String, Arc<AsyncMutex<()>>>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyGuard<'_> {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();

        let mut locks = self.owner.table();
        // One reference in the table, one here: nobody else is waiting.
        if Arc::strong_count(&self.lock) == 2 {
            if let Some(existing) = locks.get(&self.key) {
                if Arc::ptr_eq(existing, &self.lock) {
                    locks.remove(&self.key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn released_keys_are_removed() {
        let locks = KeyedLocks::new();
        {
            let guard = locks.lock("T1").await;
            assert_eq!(guard.key(), "T1");
            assert_eq!(locks.len(), 1);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn different_keys_do_not_block_each_other() {
        let locks = KeyedLocks::new();
        let _a = locks.lock("T1").await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.lock("T2")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn same_key_is_exclusive() {
        let locks = Arc::new(KeyedLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let locks = locks.clone();
            let inside = inside.clone();
            let max_seen = max_seen.clone();
            tasks.push(tokio::spawn(async move {
                let _guard = locks.lock("T1").await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn waiter_keeps_entry_alive() {
        let locks = Arc::new(KeyedLocks::new());
        let first = locks.lock("T1").await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock("T1").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(first);
        assert!(locks.len() <= 1);

        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use crate::core::library::{LibraryError, LibraryResult};

pub(crate) const BOOK_SCOPE: &str = "book";
pub(crate) const PATRON_SCOPE: &str = "patron";
pub(crate) const EMAIL_SCOPE: &str = "email";

type LockMap = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

// LockRegistry hands out one async mutex per entity key so that check-then-write
// sequences on the same book or patron serialize while unrelated keys never contend.
// Callers that need both a book and a patron lock must take the book lock first.
// An entry lives only while some caller holds or waits on it.
#[derive(Debug, Default)]
pub(crate) struct LockRegistry {
    locks: LockMap,
}

// KeyGuard releases its key on drop and evicts the entry once nobody else wants it.
#[derive(Debug)]
pub(crate) struct KeyGuard {
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: LockMap,
}

impl LockRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn acquire(&self, scope: &str, id: &str) -> LibraryResult<KeyGuard> {
        let key = format!("{}:{}", scope, id);
        let lock = {
            let mut locks = self.locks.lock().map_err(|err| LibraryError::runtime(
                format!("lock registry poisoned {:?}", err).as_str(), None))?;
            locks.entry(key.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        Ok(KeyGuard {
            key,
            guard: Some(lock.lock_owned().await),
            locks: self.locks.clone(),
        })
    }

    // number of keys currently held or awaited
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // release first so the count below only sees the map and any waiters
        self.guard.take();
        if let Ok(mut locks) = self.locks.lock() {
            if locks.get(&self.key).map(|lock| Arc::strong_count(lock) == 1).unwrap_or(false) {
                locks.remove(&self.key);
            }
        }
    }
}

use num_bigint::BigUint;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Recurrence state at a boundary index `k`: the pair `(F(k), F(k+1))`.
pub type RecurrenceState = (BigUint, BigUint);

/// Thread-safe store of recurrence states keyed by segment boundary index.
///
/// Workers store the state they reach at the end of their segment so a later
/// worker starting at that index can continue without iterating from zero.
/// `store` writes unconditionally: concurrent stores to one key race and the
/// last physical write wins. Entries are never evicted, so the map grows by
/// at most one entry per computed segment.
#[derive(Debug, Default)]
pub struct MemoStore {
    entries: RwLock<HashMap<usize, RecurrenceState>>,
}

impl MemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an owned copy of the recurrence state at `key`, if present.
    pub fn load(&self, key: usize) -> Option<RecurrenceState> {
        self.entries.read().get(&key).cloned()
    }

    /// Records the recurrence state reached at boundary `key`.
    pub fn store(&self, key: usize, state: RecurrenceState) {
        self.entries.write().insert(key, state);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

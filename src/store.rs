//! Keyed Store Module
//!
//! Internally synchronized key/value map shared by the cache and the
//! dispatcher registry.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::Mutex;

// == Keyed Store ==
/// A `HashMap` behind a single mutex.
///
/// Every operation takes the lock once, so no operation can observe another
/// one half-applied. Compound steps that must be atomic go through
/// [`KeyedStore::with_map`].
#[derive(Debug)]
pub struct KeyedStore<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> KeyedStore<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.entries.lock().get(key).cloned()
    }

    // == Set ==
    /// Inserts or overwrites the value stored under `key`.
    pub fn set(&self, key: K, value: V) {
        self.entries.lock().insert(key, value);
    }

    // == Delete ==
    /// Removes `key`, returning true iff it was present.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lock().remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    // == Size ==
    /// Returns the number of stored entries.
    pub fn size(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    // == With Map ==
    /// Runs `f` with exclusive access to the underlying map.
    ///
    /// Keep `f` short: it runs inside the critical section and must not call
    /// back into this store.
    pub fn with_map<R>(&self, f: impl FnOnce(&mut HashMap<K, V>) -> R) -> R {
        let mut entries = self.entries.lock();
        f(&mut entries)
    }
}

impl<K, V> Default for KeyedStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

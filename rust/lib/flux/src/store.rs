use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::topic;
use crate::value::{StateValue, SubscriptionId};

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

/// Per-path state store with pattern-matched change notifications.
///
/// - `set(path, value)` stores a value and notifies matching subscribers.
/// - `update(path, f)` performs a read-modify-write under one write lock.
/// - `get(path)` / `get_as(path)` read the current value.
///
/// Subscribers are called after the write lock is released, on the thread
/// that performed the write.
pub struct StateStore {
    values: RwLock<BTreeMap<String, StateValue>>,
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
}

#[derive(Clone)]
struct Subscriber {
    id: SubscriptionId,
    pattern: String,
    handler: ChangeHandler,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Set a typed value at `path` and notify matching subscribers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    pub fn set_value(&self, path: &str, value: StateValue) {
        self.write_values().insert(path.to_string(), value.clone());
        self.notify(path, &value);
    }

    /// Read-modify-write the `T` stored at `path`.
    ///
    /// `f` sees the current value (or `T::default()` when nothing of type
    /// `T` is stored) and returns the replacement, or `None` to leave the
    /// store untouched. The write lock is held while `f` runs, so concurrent
    /// updates of the same path never interleave. Subscribers are notified
    /// only when a replacement was written.
    pub fn update<T, F>(&self, path: &str, f: F) -> Option<T>
    where
        T: Any + Clone + Default + Send + Sync,
        F: FnOnce(&T) -> Option<T>,
    {
        let written = {
            let mut values = self.write_values();
            let current = values
                .get(path)
                .and_then(|v| v.downcast_ref::<T>().cloned())
                .unwrap_or_default();
            let next = f(&current)?;
            let value = StateValue::new(next.clone());
            values.insert(path.to_string(), value.clone());
            (next, value)
        };
        self.notify(path, &written.1);
        Some(written.0)
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        self.read_values().get(path).cloned()
    }

    /// Clone out the value at `path` if it is a `T`.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.downcast_ref::<T>().cloned())
    }

    /// Remove the value at `path`. Does NOT notify subscribers.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        self.write_values().remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.read_values().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.read_values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All paths and values, ordered by path.
    pub fn snapshot(&self) -> Vec<(String, StateValue)> {
        self.read_values()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Subscribe to changes of every path matching `pattern`.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        if !topic::is_valid(pattern) {
            warn!("subscription pattern {:?} is malformed and may never match", pattern);
        }
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Subscriber {
                id,
                pattern: pattern.to_string(),
                handler: Arc::new(handler),
            });
        id
    }

    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) {
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|s| !(s.id == id && s.pattern == pattern));
    }

    fn notify(&self, path: &str, value: &StateValue) {
        // Clone the matching handlers out so a handler may subscribe or
        // write without deadlocking.
        let matched: Vec<Subscriber> = self
            .subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|s| topic::matches(&s.pattern, path))
            .cloned()
            .collect();
        for sub in matched {
            (sub.handler)(path, value);
        }
    }

    fn read_values(&self) -> RwLockReadGuard<'_, BTreeMap<String, StateValue>> {
        self.values.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_values(&self) -> RwLockWriteGuard<'_, BTreeMap<String, StateValue>> {
        self.values.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        hits: u32,
    }

    // ========================================================================
    // get / set
    // ========================================================================

    #[test]
    fn set_then_get_as() {
        let store = StateStore::new();
        store.set("counter", Counter { hits: 3 });

        assert_eq!(store.get_as::<Counter>("counter"), Some(Counter { hits: 3 }));
        assert_eq!(store.get_as::<u32>("counter"), None);
        assert!(store.contains("counter"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_path_is_none() {
        let store = StateStore::new();
        assert!(store.get("nothing").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_does_not_notify() {
        let store = StateStore::new();
        let seen = Arc::new(Mutex::new(0u32));
        let s = seen.clone();
        store.subscribe("#", move |_, _| *s.lock().unwrap() += 1);

        store.set("a", 1u32);
        store.remove("a");
        assert_eq!(*seen.lock().unwrap(), 1);
        assert!(!store.contains("a"));
    }

    #[test]
    fn snapshot_is_ordered() {
        let store = StateStore::new();
        store.set("b", 2u32);
        store.set("a", 1u32);

        let paths: Vec<String> = store.snapshot().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a".to_string(), "b".to_string()]);
    }

    // ========================================================================
    // update
    // ========================================================================

    #[test]
    fn update_starts_from_default() {
        let store = StateStore::new();
        let next = store.update::<Counter, _>("counter", |c| {
            Some(Counter { hits: c.hits + 1 })
        });
        assert_eq!(next, Some(Counter { hits: 1 }));
        assert_eq!(store.get_as::<Counter>("counter"), Some(Counter { hits: 1 }));
    }

    #[test]
    fn update_none_leaves_store_and_subscribers_alone() {
        let store = StateStore::new();
        store.set("counter", Counter { hits: 7 });

        let seen = Arc::new(Mutex::new(0u32));
        let s = seen.clone();
        store.subscribe("counter", move |_, _| *s.lock().unwrap() += 1);

        let next = store.update::<Counter, _>("counter", |_| None);
        assert_eq!(next, None);
        assert_eq!(store.get_as::<Counter>("counter"), Some(Counter { hits: 7 }));
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn concurrent_updates_do_not_lose_writes() {
        let store = Arc::new(StateStore::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.update::<Counter, _>("counter", |c| {
                            Some(Counter { hits: c.hits + 1 })
                        });
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(store.get_as::<Counter>("counter").unwrap().hits, 800);
    }

    // ========================================================================
    // subscribe / unsubscribe
    // ========================================================================

    #[test]
    fn subscribers_receive_matching_paths_only() {
        let store = StateStore::new();
        let paths = Arc::new(Mutex::new(Vec::<String>::new()));
        let p = paths.clone();
        store.subscribe("pickup/#", move |path, _| p.lock().unwrap().push(path.to_string()));

        store.set("pickup/transfer", true);
        store.set("progress/state", 1u8);
        store.set("pickup", false);

        assert_eq!(
            *paths.lock().unwrap(),
            vec!["pickup/transfer".to_string(), "pickup".to_string()]
        );
    }

    #[test]
    fn subscriber_sees_written_value() {
        let store = StateStore::new();
        let got = Arc::new(Mutex::new(None::<Counter>));
        let g = got.clone();
        store.subscribe("counter", move |_, v| {
            *g.lock().unwrap() = v.downcast_ref::<Counter>().cloned();
        });

        store.update::<Counter, _>("counter", |_| Some(Counter { hits: 9 }));
        assert_eq!(*got.lock().unwrap(), Some(Counter { hits: 9 }));
    }

    #[test]
    fn handler_may_write_back_without_deadlock() {
        let store = Arc::new(StateStore::new());
        let inner = store.clone();
        store.subscribe("source", move |_, v| {
            let n = v.downcast_ref::<u32>().copied().unwrap_or(0);
            inner.set("mirror", n * 2);
        });

        store.set("source", 21u32);
        assert_eq!(store.get_as::<u32>("mirror"), Some(42));
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = StateStore::new();
        let seen = Arc::new(Mutex::new(0u32));
        let s = seen.clone();
        let id = store.subscribe("a", move |_, _| *s.lock().unwrap() += 1);

        store.set("a", 1u32);
        store.unsubscribe("a", id);
        store.set("a", 2u32);
        assert_eq!(*seen.lock().unwrap(), 1);
    }
}

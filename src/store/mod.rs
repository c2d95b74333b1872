pub mod entry;

use crate::types::Value;
use entry::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The single shared keyspace.
///
/// Every accessor takes `now` (milliseconds) from the caller's clock, so the
/// store itself never reads wall time. Reads go through the lazy-expiry
/// paths: an entry past its deadline is removed on sight and reported as
/// absent.
#[derive(Debug, Default)]
pub struct Store {
    data: HashMap<String, Entry>,
    /// Keys reclaimed by lazy expiry on read.
    pub lazy_expired: u64,
    /// Keys reclaimed by the background sweeper.
    pub swept: u64,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// Get an entry, lazily reclaiming it if expired.
    pub fn get(&mut self, key: &str, now: u64) -> Option<&Entry> {
        if self.expire_if_due(key, now) {
            return None;
        }
        self.data.get(key)
    }

    /// Mutable variant of [`Store::get`].
    pub fn get_mut(&mut self, key: &str, now: u64) -> Option<&mut Entry> {
        if self.expire_if_due(key, now) {
            return None;
        }
        self.data.get_mut(key)
    }

    pub fn set(&mut self, key: String, entry: Entry) {
        self.data.insert(key, entry);
    }

    /// Fetch the entry at `key`, creating it with `default` if absent.
    /// The existing entry keeps its expiry; a fresh one has none.
    pub fn get_or_insert_with(
        &mut self,
        key: &str,
        now: u64,
        default: impl FnOnce() -> Value,
    ) -> &mut Entry {
        self.expire_if_due(key, now);
        self.data
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(default()))
    }

    pub fn del(&mut self, key: &str) -> bool {
        self.data.remove(key).is_some()
    }

    pub fn exists(&mut self, key: &str, now: u64) -> bool {
        self.get(key, now).is_some()
    }

    pub fn type_name(&mut self, key: &str, now: u64) -> Option<&'static str> {
        self.get(key, now).map(|e| e.value.type_name())
    }

    /// Set an absolute expiry. Returns false if the key does not exist.
    pub fn set_expiry(&mut self, key: &str, now: u64, expires_at: u64) -> bool {
        match self.get_mut(key, now) {
            Some(entry) => {
                entry.expires_at = Some(expires_at);
                true
            }
            None => false,
        }
    }

    /// Drop any expiry. Returns true if the key existed with an expiry.
    pub fn clear_expiry(&mut self, key: &str, now: u64) -> bool {
        match self.get_mut(key, now) {
            Some(entry) => entry.expires_at.take().is_some(),
            None => false,
        }
    }

    pub fn ttl_millis(&mut self, key: &str, now: u64) -> i64 {
        match self.get(key, now) {
            Some(entry) => entry.ttl_millis(now),
            None => -2,
        }
    }

    /// Live keys, sorted. Expired-but-unswept entries are skipped, not removed.
    pub fn keys(&self, now: u64) -> Vec<String> {
        let mut keys: Vec<String> = self
            .data
            .iter()
            .filter(|(_, e)| !e.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn random_key(&self, now: u64) -> Option<String> {
        use rand::seq::IteratorRandom;
        let mut rng = rand::thread_rng();
        self.data
            .iter()
            .filter(|(_, e)| !e.is_expired(now))
            .map(|(k, _)| k.clone())
            .choose(&mut rng)
    }

    /// Number of keys physically present, expired stragglers included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn flush(&mut self) {
        self.data.clear();
    }

    /// One background sweep step: sample up to `sample` random keys that
    /// carry an expiry and reclaim the expired ones. Returns the count
    /// reclaimed.
    pub fn active_expire(&mut self, now: u64, sample: usize) -> usize {
        use rand::seq::IteratorRandom;
        let mut rng = rand::thread_rng();
        let candidates: Vec<String> = self
            .data
            .iter()
            .filter(|(_, e)| e.expires_at.is_some())
            .map(|(k, _)| k.clone())
            .choose_multiple(&mut rng, sample);

        let mut reclaimed = 0;
        for key in candidates {
            if self.data.get(&key).is_some_and(|e| e.is_expired(now)) {
                self.data.remove(&key);
                reclaimed += 1;
            }
        }
        self.swept += reclaimed as u64;
        reclaimed
    }

    fn expire_if_due(&mut self, key: &str, now: u64) -> bool {
        if self.data.get(key).is_some_and(|e| e.is_expired(now)) {
            self.data.remove(key);
            self.lazy_expired += 1;
            true
        } else {
            false
        }
    }
}

pub type SharedStore = Arc<RwLock<Store>>;

#[cfg(test)]
mod tests {
    use super::*;

    fn string_entry(s: &str) -> Entry {
        Entry::new(Value::String(s.to_string()))
    }

    #[test]
    fn get_reclaims_expired_entries() {
        let mut store = Store::new();
        store.set(
            "k".into(),
            Entry::with_expiry(Value::String("v".into()), 1_000),
        );

        assert!(store.get("k", 999).is_some());
        assert!(store.get("k", 1_000).is_none());
        assert_eq!(store.lazy_expired, 1);
        // gone for good, even if the clock were to go backwards
        assert!(store.get("k", 0).is_none());
    }

    #[test]
    fn set_without_ttl_clears_expiry() {
        let mut store = Store::new();
        store.set(
            "k".into(),
            Entry::with_expiry(Value::String("v".into()), 1_000),
        );
        store.set("k".into(), string_entry("w"));
        assert_eq!(store.ttl_millis("k", 500), -1);
        assert!(store.get("k", 5_000).is_some());
    }

    #[test]
    fn ttl_reports_remaining_time() {
        let mut store = Store::new();
        store.set("k".into(), string_entry("v"));
        assert_eq!(store.ttl_millis("k", 0), -1);
        assert!(store.set_expiry("k", 0, 2_500));
        assert_eq!(store.ttl_millis("k", 1_000), 1_500);
        assert_eq!(store.ttl_millis("missing", 0), -2);
    }

    #[test]
    fn active_expire_reclaims_sampled_keys() {
        let mut store = Store::new();
        for i in 0..10 {
            store.set(
                format!("dead-{i}"),
                Entry::with_expiry(Value::String("x".into()), 100),
            );
        }
        store.set("alive".into(), string_entry("y"));

        let mut total = 0;
        // sampling is random, so loop until the sweep drains them
        for _ in 0..50 {
            total += store.active_expire(200, 4);
            if total == 10 {
                break;
            }
        }
        assert_eq!(total, 10);
        assert_eq!(store.len(), 1);
        assert!(store.get("alive", 200).is_some());
    }

    #[test]
    fn keys_skips_expired_without_removing() {
        let mut store = Store::new();
        store.set("a".into(), string_entry("1"));
        store.set(
            "b".into(),
            Entry::with_expiry(Value::String("2".into()), 10),
        );
        assert_eq!(store.keys(100), vec!["a".to_string()]);
        // still physically present until a read or sweep touches it
        assert_eq!(store.len(), 2);
    }
}

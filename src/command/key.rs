use crate::error::{EngineError, EngineResult};
use crate::store::Store;
use std::time::Duration;

pub fn del(store: &mut Store, key: &str) -> bool {
    store.del(key)
}

pub fn exists(store: &mut Store, now: u64, key: &str) -> bool {
    store.exists(key, now)
}

/// Schedule expiry `ttl` from now. False if the key does not exist.
pub fn expire(store: &mut Store, now: u64, key: &str, ttl: Duration) -> EngineResult<bool> {
    let ttl_ms = ttl.as_millis() as u64;
    if ttl_ms == 0 {
        return Err(EngineError::invalid("ttl must be at least one millisecond"));
    }
    Ok(store.set_expiry(key, now, now + ttl_ms))
}

/// Drop a pending expiry. True only if the key existed and had one.
pub fn persist(store: &mut Store, now: u64, key: &str) -> bool {
    store.clear_expiry(key, now)
}

/// Remaining life in milliseconds; -1 for no expiry, -2 for a missing key.
pub fn ttl_millis(store: &mut Store, now: u64, key: &str) -> i64 {
    store.ttl_millis(key, now)
}

pub fn type_name(store: &mut Store, now: u64, key: &str) -> Option<&'static str> {
    store.type_name(key, now)
}

pub fn keys(store: &Store, now: u64) -> Vec<String> {
    store.keys(now)
}

use crate::error::{EngineError, EngineResult};
use crate::store::Store;
use crate::store::entry::Entry;
use crate::types::Value;
use std::time::Duration;

/// Plain write. Overwrites any prior value of any type and clears any
/// prior expiry.
pub fn set(store: &mut Store, key: &str, value: String) {
    store.set(key.to_string(), Entry::new(Value::String(value)));
}

/// Write with a time-to-live. The entry expires at `now + ttl`.
pub fn set_ex(store: &mut Store, now: u64, key: &str, value: String, ttl: Duration) -> EngineResult<()> {
    let ttl_ms = ttl.as_millis() as u64;
    if ttl_ms == 0 {
        return Err(EngineError::invalid("ttl must be at least one millisecond"));
    }
    store.set(
        key.to_string(),
        Entry::with_expiry(Value::String(value), now + ttl_ms),
    );
    Ok(())
}

pub fn get(store: &mut Store, now: u64, key: &str) -> EngineResult<Option<String>> {
    match store.get(key, now) {
        Some(entry) => Ok(Some(entry.value.as_string()?.clone())),
        None => Ok(None),
    }
}

/// Append to the string at `key`, creating it if absent. Returns the new length.
pub fn append(store: &mut Store, now: u64, key: &str, suffix: &str) -> EngineResult<usize> {
    let entry = store.get_or_insert_with(key, now, || Value::String(String::new()));
    let s = entry.value.as_string_mut()?;
    s.push_str(suffix);
    Ok(s.len())
}

pub fn strlen(store: &mut Store, now: u64, key: &str) -> EngineResult<usize> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_string()?.len()),
        None => Ok(0),
    }
}

/// Add `delta` to the integer stored at `key` (absent counts as 0).
/// Returns the new value.
pub fn incr_by(store: &mut Store, now: u64, key: &str, delta: i64) -> EngineResult<i64> {
    let entry = store.get_or_insert_with(key, now, || Value::String("0".to_string()));
    let s = entry.value.as_string_mut()?;
    let current: i64 = s
        .parse()
        .map_err(|_| EngineError::invalid("value is not an integer"))?;
    let next = current
        .checked_add(delta)
        .ok_or_else(|| EngineError::invalid("increment overflows"))?;
    *s = next.to_string();
    Ok(next)
}

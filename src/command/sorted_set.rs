use crate::error::{EngineError, EngineResult};
use crate::store::Store;
use crate::types::Value;
use crate::types::sorted_set::SortedSetValue;

fn open_zset<'a>(store: &'a mut Store, now: u64, key: &str) -> EngineResult<&'a mut SortedSetValue> {
    let entry = store.get_or_insert_with(key, now, || Value::SortedSet(SortedSetValue::new()));
    entry.value.as_sorted_set_mut()
}

/// Add or re-score a member. True only when the member was new.
pub fn add(store: &mut Store, now: u64, key: &str, member: String, score: f64) -> EngineResult<bool> {
    if score.is_nan() {
        return Err(EngineError::invalid("score is not a number"));
    }
    Ok(open_zset(store, now, key)?.add(member, score))
}

pub fn score(store: &mut Store, now: u64, key: &str, member: &str) -> EngineResult<Option<f64>> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_sorted_set()?.score(member)),
        None => Ok(None),
    }
}

pub fn remove(store: &mut Store, now: u64, key: &str, member: &str) -> EngineResult<bool> {
    let Some(entry) = store.get_mut(key, now) else {
        return Ok(false);
    };
    let zset = entry.value.as_sorted_set_mut()?;
    let removed = zset.remove(member);
    if zset.is_empty() {
        store.del(key);
    }
    Ok(removed)
}

pub fn cardinality(store: &mut Store, now: u64, key: &str) -> EngineResult<usize> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_sorted_set()?.len()),
        None => Ok(0),
    }
}

/// Ascending-score rank slice, inclusive bounds, negative ranks from the end.
pub fn range(
    store: &mut Store,
    now: u64,
    key: &str,
    start: i64,
    stop: i64,
) -> EngineResult<Vec<(String, f64)>> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_sorted_set()?.range(start, stop)),
        None => Ok(vec![]),
    }
}

pub fn pop_max(store: &mut Store, now: u64, key: &str) -> EngineResult<Option<(String, f64)>> {
    let Some(entry) = store.get_mut(key, now) else {
        return Ok(None);
    };
    let zset = entry.value.as_sorted_set_mut()?;
    let popped = zset.pop_max();
    if zset.is_empty() {
        store.del(key);
    }
    Ok(popped)
}

pub fn pop_min(store: &mut Store, now: u64, key: &str) -> EngineResult<Option<(String, f64)>> {
    let Some(entry) = store.get_mut(key, now) else {
        return Ok(None);
    };
    let zset = entry.value.as_sorted_set_mut()?;
    let popped = zset.pop_min();
    if zset.is_empty() {
        store.del(key);
    }
    Ok(popped)
}

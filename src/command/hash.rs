use crate::error::EngineResult;
use crate::store::Store;
use crate::types::Value;
use crate::types::hash::HashValue;
use std::collections::BTreeMap;

fn open_hash<'a>(store: &'a mut Store, now: u64, key: &str) -> EngineResult<&'a mut HashValue> {
    let entry = store.get_or_insert_with(key, now, || Value::Hash(HashValue::new()));
    entry.value.as_hash_mut()
}

/// Set one field, overwriting in place. True only when the field was new.
pub fn set_field(
    store: &mut Store,
    now: u64,
    key: &str,
    field: String,
    value: String,
) -> EngineResult<bool> {
    Ok(open_hash(store, now, key)?.set(field, value))
}

pub fn get_field(store: &mut Store, now: u64, key: &str, field: &str) -> EngineResult<Option<String>> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_hash()?.get(field).cloned()),
        None => Ok(None),
    }
}

/// Snapshot of every field-value pair, sorted by field name.
pub fn get_all(store: &mut Store, now: u64, key: &str) -> EngineResult<BTreeMap<String, String>> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_hash()?.entries()),
        None => Ok(BTreeMap::new()),
    }
}

pub fn del_field(store: &mut Store, now: u64, key: &str, field: &str) -> EngineResult<bool> {
    let Some(entry) = store.get_mut(key, now) else {
        return Ok(false);
    };
    let hash = entry.value.as_hash_mut()?;
    let removed = hash.del(field);
    if hash.is_empty() {
        store.del(key);
    }
    Ok(removed)
}

pub fn len(store: &mut Store, now: u64, key: &str) -> EngineResult<usize> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_hash()?.len()),
        None => Ok(0),
    }
}

pub fn field_exists(store: &mut Store, now: u64, key: &str, field: &str) -> EngineResult<bool> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_hash()?.exists(field)),
        None => Ok(false),
    }
}

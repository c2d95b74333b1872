use crate::error::EngineResult;
use crate::store::Store;
use crate::types::Value;
use crate::types::set::SetValue;

fn open_set<'a>(store: &'a mut Store, now: u64, key: &str) -> EngineResult<&'a mut SetValue> {
    let entry = store.get_or_insert_with(key, now, || Value::Set(SetValue::new()));
    entry.value.as_set_mut()
}

/// Idempotent insert. True only when the member was actually new.
pub fn add(store: &mut Store, now: u64, key: &str, member: String) -> EngineResult<bool> {
    Ok(open_set(store, now, key)?.add(member))
}

pub fn remove(store: &mut Store, now: u64, key: &str, member: &str) -> EngineResult<bool> {
    let Some(entry) = store.get_mut(key, now) else {
        return Ok(false);
    };
    let set = entry.value.as_set_mut()?;
    let removed = set.remove(member);
    if set.is_empty() {
        store.del(key);
    }
    Ok(removed)
}

/// Distinct member count; 0 for an absent key.
pub fn cardinality(store: &mut Store, now: u64, key: &str) -> EngineResult<usize> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_set()?.len()),
        None => Ok(0),
    }
}

/// All members, alphabetically.
pub fn members(store: &mut Store, now: u64, key: &str) -> EngineResult<Vec<String>> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_set()?.members()),
        None => Ok(vec![]),
    }
}

pub fn is_member(store: &mut Store, now: u64, key: &str, member: &str) -> EngineResult<bool> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_set()?.contains(member)),
        None => Ok(false),
    }
}

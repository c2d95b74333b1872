use crate::error::EngineResult;
use crate::store::Store;
use crate::types::Value;
use crate::types::list::ListValue;

fn open_list<'a>(store: &'a mut Store, now: u64, key: &str) -> EngineResult<&'a mut ListValue> {
    let entry = store.get_or_insert_with(key, now, || Value::List(ListValue::new()));
    entry.value.as_list_mut()
}

/// Returns the list length after the push.
pub fn push_right(store: &mut Store, now: u64, key: &str, value: String) -> EngineResult<usize> {
    let list = open_list(store, now, key)?;
    list.push_right(value);
    Ok(list.len())
}

pub fn push_left(store: &mut Store, now: u64, key: &str, value: String) -> EngineResult<usize> {
    let list = open_list(store, now, key)?;
    list.push_left(value);
    Ok(list.len())
}

/// Pop from the head. Absent or drained lists are a miss, not an error.
pub fn pop_left(store: &mut Store, now: u64, key: &str) -> EngineResult<Option<String>> {
    let Some(entry) = store.get_mut(key, now) else {
        return Ok(None);
    };
    let list = entry.value.as_list_mut()?;
    let popped = list.pop_left();
    if list.is_empty() {
        store.del(key);
    }
    Ok(popped)
}

pub fn pop_right(store: &mut Store, now: u64, key: &str) -> EngineResult<Option<String>> {
    let Some(entry) = store.get_mut(key, now) else {
        return Ok(None);
    };
    let list = entry.value.as_list_mut()?;
    let popped = list.pop_right();
    if list.is_empty() {
        store.del(key);
    }
    Ok(popped)
}

pub fn len(store: &mut Store, now: u64, key: &str) -> EngineResult<usize> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_list()?.len()),
        None => Ok(0),
    }
}

pub fn range(store: &mut Store, now: u64, key: &str, start: i64, stop: i64) -> EngineResult<Vec<String>> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_list()?.range(start, stop)),
        None => Ok(vec![]),
    }
}

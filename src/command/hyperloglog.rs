use crate::error::EngineResult;
use crate::store::Store;
use crate::types::Value;
use crate::types::hyperloglog::HyperLogLog;

fn open_hll<'a>(store: &'a mut Store, now: u64, key: &str) -> EngineResult<&'a mut HyperLogLog> {
    let entry = store.get_or_insert_with(key, now, || Value::HyperLogLog(HyperLogLog::new()));
    entry.value.as_hll_mut()
}

/// Fold elements into the sketch at `key`, creating it if absent.
/// True if any register moved.
pub fn add(store: &mut Store, now: u64, key: &str, elements: &[String]) -> EngineResult<bool> {
    let hll = open_hll(store, now, key)?;
    let mut changed = false;
    for element in elements {
        changed |= hll.add(element);
    }
    Ok(changed)
}

/// Approximate distinct count; 0 for an absent key.
pub fn count(store: &mut Store, now: u64, key: &str) -> EngineResult<u64> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_hll()?.count()),
        None => Ok(0),
    }
}

/// Union the source sketches into `dest` (register-wise max), creating
/// `dest` if absent. Absent sources contribute nothing.
pub fn merge(store: &mut Store, now: u64, dest: &str, sources: &[String]) -> EngineResult<()> {
    let mut merged = match store.get(dest, now) {
        Some(entry) => entry.value.as_hll()?.clone(),
        None => HyperLogLog::new(),
    };
    for source in sources {
        if let Some(entry) = store.get(source, now) {
            merged.merge(entry.value.as_hll()?);
        }
    }
    *open_hll(store, now, dest)? = merged;
    Ok(())
}

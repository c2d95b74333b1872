use std::collections::{BTreeMap, HashMap};

/// Field-value map, fields unique per key.
#[derive(Debug, Clone, Default)]
pub struct HashValue {
    data: HashMap<String, String>,
}

impl HashValue {
    pub fn new() -> Self {
        HashValue {
            data: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&String> {
        self.data.get(field)
    }

    /// Set a field, overwriting in place. Returns true if the field was new.
    pub fn set(&mut self, field: String, value: String) -> bool {
        self.data.insert(field, value).is_none()
    }

    pub fn del(&mut self, field: &str) -> bool {
        self.data.remove(field).is_some()
    }

    pub fn exists(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }

    /// Snapshot of every field-value pair, sorted by field name.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

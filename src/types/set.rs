use std::collections::HashSet;

/// Unordered set of unique members.
#[derive(Debug, Clone, Default)]
pub struct SetValue {
    data: HashSet<String>,
}

impl SetValue {
    pub fn new() -> Self {
        SetValue {
            data: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Add a member. Returns true if the member was new.
    pub fn add(&mut self, member: String) -> bool {
        self.data.insert(member)
    }

    pub fn remove(&mut self, member: &str) -> bool {
        self.data.remove(member)
    }

    pub fn contains(&self, member: &str) -> bool {
        self.data.contains(member)
    }

    /// All members, sorted alphabetically so callers see a stable order.
    pub fn members(&self) -> Vec<String> {
        let mut out: Vec<String> = self.data.iter().cloned().collect();
        out.sort();
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.data.iter()
    }
}

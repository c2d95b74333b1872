use std::collections::VecDeque;

/// List type backed by a VecDeque so push/pop are cheap at both ends.
#[derive(Debug, Clone, Default)]
pub struct ListValue {
    data: VecDeque<String>,
}

impl ListValue {
    pub fn new() -> Self {
        ListValue {
            data: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push_left(&mut self, value: String) {
        self.data.push_front(value);
    }

    pub fn push_right(&mut self, value: String) {
        self.data.push_back(value);
    }

    pub fn pop_left(&mut self) -> Option<String> {
        self.data.pop_front()
    }

    pub fn pop_right(&mut self) -> Option<String> {
        self.data.pop_back()
    }

    /// Inclusive rank range, negative indices counted from the end.
    pub fn range(&self, start: i64, stop: i64) -> Vec<String> {
        let len = self.data.len() as i64;
        let start = if start < 0 {
            (len + start).max(0)
        } else {
            start
        } as usize;
        let stop = if stop < 0 { (len + stop).max(0) } else { stop } as usize;

        if start > stop || start >= self.data.len() {
            return vec![];
        }

        let stop = stop.min(self.data.len() - 1);
        (start..=stop)
            .filter_map(|i| self.data.get(i).cloned())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.data.iter()
    }
}

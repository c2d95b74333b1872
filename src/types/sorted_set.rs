use std::collections::{BTreeMap, HashMap};

/// Sorted set: a HashMap for O(1) score lookup by member, plus a BTreeMap
/// keyed by (score, member) for ordered iteration. Both structures are kept
/// in step on every mutation.
#[derive(Debug, Clone, Default)]
pub struct SortedSetValue {
    /// member -> score
    scores: HashMap<String, f64>,
    /// Ordered by score ascending, ties by member lexical order.
    tree: BTreeMap<RankKey, ()>,
}

/// BTreeMap key ordering: score first, then member.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
struct RankKey {
    /// IEEE 754 bits transformed so u64 ordering matches f64 ordering.
    score_bits: u64,
    member: String,
}

impl RankKey {
    fn new(score: f64, member: String) -> Self {
        RankKey {
            score_bits: orderable_bits(score),
            member,
        }
    }
}

/// Map f64 bits to u64 such that unsigned comparison agrees with numeric order.
fn orderable_bits(score: f64) -> u64 {
    let bits = score.to_bits();
    if bits >> 63 == 1 {
        // negative: flip everything
        !bits
    } else {
        // positive: flip the sign bit only
        bits ^ (1 << 63)
    }
}

impl SortedSetValue {
    pub fn new() -> Self {
        SortedSetValue::default()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Add or update a member. A re-add replaces the score and re-ranks the
    /// member rather than inserting a duplicate. Returns true if new.
    pub fn add(&mut self, member: String, score: f64) -> bool {
        if let Some(&old) = self.scores.get(&member) {
            self.tree.remove(&RankKey::new(old, member.clone()));
            self.scores.insert(member.clone(), score);
            self.tree.insert(RankKey::new(score, member), ());
            false
        } else {
            self.scores.insert(member.clone(), score);
            self.tree.insert(RankKey::new(score, member), ());
            true
        }
    }

    pub fn remove(&mut self, member: &str) -> bool {
        if let Some(score) = self.scores.remove(member) {
            self.tree.remove(&RankKey::new(score, member.to_string()));
            true
        } else {
            false
        }
    }

    pub fn score(&self, member: &str) -> Option<f64> {
        self.scores.get(member).copied()
    }

    pub fn contains(&self, member: &str) -> bool {
        self.scores.contains_key(member)
    }

    /// Members in ascending score order over an inclusive rank range.
    /// Negative ranks count from the end (-1 is the highest-score member).
    pub fn range(&self, start: i64, stop: i64) -> Vec<(String, f64)> {
        let len = self.len() as i64;
        let start = normalize_rank(start, len);
        let stop = normalize_rank(stop, len);

        if start > stop || start >= self.len() {
            return vec![];
        }

        let stop = stop.min(self.len() - 1);
        self.tree
            .keys()
            .skip(start)
            .take(stop - start + 1)
            .map(|k| (k.member.clone(), self.score_of(k)))
            .collect()
    }

    /// Remove and return the highest-score member; ties go to the
    /// lexically greatest member.
    pub fn pop_max(&mut self) -> Option<(String, f64)> {
        let key = self.tree.keys().next_back()?.clone();
        let score = self.score_of(&key);
        self.remove(&key.member);
        Some((key.member, score))
    }

    /// Remove and return the lowest-score member.
    pub fn pop_min(&mut self) -> Option<(String, f64)> {
        let key = self.tree.keys().next()?.clone();
        let score = self.score_of(&key);
        self.remove(&key.member);
        Some((key.member, score))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.tree
            .keys()
            .map(|k| (k.member.as_str(), self.score_of(k)))
    }

    fn score_of(&self, key: &RankKey) -> f64 {
        // tree and scores are mutated together, so the member is present
        self.scores.get(&key.member).copied().unwrap_or(f64::NAN)
    }
}

fn normalize_rank(rank: i64, len: i64) -> usize {
    if rank < 0 {
        (len + rank).max(0) as usize
    } else {
        rank as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_score_ascending() {
        let mut z = SortedSetValue::new();
        z.add("Eko".into(), 100.0);
        z.add("Jhon".into(), 85.0);
        z.add("Santy".into(), 95.0);

        let members: Vec<String> = z.range(0, -1).into_iter().map(|(m, _)| m).collect();
        assert_eq!(members, vec!["Jhon", "Santy", "Eko"]);
    }

    #[test]
    fn re_add_updates_score_and_rank() {
        let mut z = SortedSetValue::new();
        assert!(z.add("a".into(), 1.0));
        assert!(z.add("b".into(), 2.0));
        assert!(!z.add("a".into(), 3.0));
        assert_eq!(z.len(), 2);
        assert_eq!(z.score("a"), Some(3.0));
        assert_eq!(z.pop_max(), Some(("a".to_string(), 3.0)));
    }

    #[test]
    fn pop_max_breaks_ties_lexically() {
        let mut z = SortedSetValue::new();
        z.add("apple".into(), 5.0);
        z.add("banana".into(), 5.0);
        assert_eq!(z.pop_max(), Some(("banana".to_string(), 5.0)));
        assert_eq!(z.pop_max(), Some(("apple".to_string(), 5.0)));
        assert_eq!(z.pop_max(), None);
    }

    #[test]
    fn negative_scores_order_correctly() {
        let mut z = SortedSetValue::new();
        z.add("neg".into(), -1.5);
        z.add("zero".into(), 0.0);
        z.add("pos".into(), 1.5);
        let members: Vec<String> = z.range(0, -1).into_iter().map(|(m, _)| m).collect();
        assert_eq!(members, vec!["neg", "zero", "pos"]);
    }

    #[test]
    fn negative_ranks_slice_from_end() {
        let mut z = SortedSetValue::new();
        for (m, s) in [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)] {
            z.add(m.into(), s);
        }
        let members: Vec<String> = z.range(-2, -1).into_iter().map(|(m, _)| m).collect();
        assert_eq!(members, vec!["c", "d"]);
        assert!(z.range(2, 1).is_empty());
    }
}

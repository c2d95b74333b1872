use crate::types::Value;

/// A keyspace entry: a value plus expiry metadata.
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: Value,
    /// Expiry as milliseconds since the UNIX epoch. None = lives forever.
    pub expires_at: Option<u64>,
}

impl Entry {
    pub fn new(value: Value) -> Self {
        Entry {
            value,
            expires_at: None,
        }
    }

    pub fn with_expiry(value: Value, expires_at: u64) -> Self {
        Entry {
            value,
            expires_at: Some(expires_at),
        }
    }

    /// An entry whose deadline has passed is logically absent.
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }

    /// Remaining life in milliseconds; -1 if no expiry, -2 if already expired.
    pub fn ttl_millis(&self, now: u64) -> i64 {
        match self.expires_at {
            None => -1,
            Some(exp) if now >= exp => -2,
            Some(exp) => (exp - now) as i64,
        }
    }
}

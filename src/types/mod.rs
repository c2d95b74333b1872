pub mod geo;
pub mod hash;
pub mod hyperloglog;
pub mod list;
pub mod set;
pub mod sorted_set;

use crate::error::{EngineError, EngineResult};

/// The tagged value type stored at each key.
///
/// Exactly one variant lives at a key at a time; a command that expects a
/// different variant fails with [`EngineError::WrongType`] and leaves the
/// entry untouched.
#[derive(Debug, Clone)]
pub enum Value {
    String(String),
    List(list::ListValue),
    Set(set::SetValue),
    SortedSet(sorted_set::SortedSetValue),
    Hash(hash::HashValue),
    Geo(geo::GeoValue),
    HyperLogLog(hyperloglog::HyperLogLog),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::SortedSet(_) => "zset",
            Value::Hash(_) => "hash",
            Value::Geo(_) => "geo",
            Value::HyperLogLog(_) => "hyperloglog",
        }
    }

    pub fn as_string(&self) -> EngineResult<&String> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_string_mut(&mut self) -> EngineResult<&mut String> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_list(&self) -> EngineResult<&list::ListValue> {
        match self {
            Value::List(l) => Ok(l),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_list_mut(&mut self) -> EngineResult<&mut list::ListValue> {
        match self {
            Value::List(l) => Ok(l),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_set(&self) -> EngineResult<&set::SetValue> {
        match self {
            Value::Set(s) => Ok(s),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_set_mut(&mut self) -> EngineResult<&mut set::SetValue> {
        match self {
            Value::Set(s) => Ok(s),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_sorted_set(&self) -> EngineResult<&sorted_set::SortedSetValue> {
        match self {
            Value::SortedSet(z) => Ok(z),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_sorted_set_mut(&mut self) -> EngineResult<&mut sorted_set::SortedSetValue> {
        match self {
            Value::SortedSet(z) => Ok(z),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_hash(&self) -> EngineResult<&hash::HashValue> {
        match self {
            Value::Hash(h) => Ok(h),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_hash_mut(&mut self) -> EngineResult<&mut hash::HashValue> {
        match self {
            Value::Hash(h) => Ok(h),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_geo(&self) -> EngineResult<&geo::GeoValue> {
        match self {
            Value::Geo(g) => Ok(g),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_geo_mut(&mut self) -> EngineResult<&mut geo::GeoValue> {
        match self {
            Value::Geo(g) => Ok(g),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_hll(&self) -> EngineResult<&hyperloglog::HyperLogLog> {
        match self {
            Value::HyperLogLog(h) => Ok(h),
            _ => Err(EngineError::WrongType),
        }
    }

    pub fn as_hll_mut(&mut self) -> EngineResult<&mut hyperloglog::HyperLogLog> {
        match self {
            Value::HyperLogLog(h) => Ok(h),
            _ => Err(EngineError::WrongType),
        }
    }
}

pub mod batch;
pub mod geo;
pub mod hash;
pub mod hyperloglog;
pub mod key;
pub mod list;
pub mod set;
pub mod sorted_set;
pub mod string;

use crate::error::EngineResult;
use crate::store::Store;
use crate::types::geo::{GeoResult, Unit};
use std::collections::BTreeMap;
use std::time::Duration;

/// One engine operation, ready to be applied against the store.
///
/// The typed methods on [`crate::Engine`] cover interactive use; this enum
/// exists so callers can queue operations: the batch executor replays a
/// `Vec<Command>` under a single store guard.
#[derive(Debug, Clone)]
pub enum Command {
    // strings & keys
    Set { key: String, value: String },
    SetEx { key: String, value: String, ttl: Duration },
    Get { key: String },
    Del { key: String },
    Exists { key: String },
    Expire { key: String, ttl: Duration },
    Persist { key: String },
    Ttl { key: String },
    Append { key: String, value: String },
    Strlen { key: String },
    IncrBy { key: String, delta: i64 },
    // lists
    PushLeft { key: String, value: String },
    PushRight { key: String, value: String },
    PopLeft { key: String },
    PopRight { key: String },
    ListLen { key: String },
    ListRange { key: String, start: i64, stop: i64 },
    // sets
    SetAdd { key: String, member: String },
    SetRemove { key: String, member: String },
    SetCard { key: String },
    SetMembers { key: String },
    SetIsMember { key: String, member: String },
    // sorted sets
    ZAdd { key: String, member: String, score: f64 },
    ZScore { key: String, member: String },
    ZRem { key: String, member: String },
    ZCard { key: String },
    ZRange { key: String, start: i64, stop: i64 },
    ZPopMax { key: String },
    ZPopMin { key: String },
    // hashes
    HSet { key: String, field: String, value: String },
    HGet { key: String, field: String },
    HGetAll { key: String },
    HDel { key: String, field: String },
    HLen { key: String },
    HExists { key: String, field: String },
    // geo
    GeoAdd { key: String, member: String, longitude: f64, latitude: f64 },
    GeoPos { key: String, member: String },
    GeoDist { key: String, member_a: String, member_b: String, unit: Unit },
    GeoSearch { key: String, longitude: f64, latitude: f64, radius: f64, unit: Unit },
    // cardinality estimator
    PfAdd { key: String, elements: Vec<String> },
    PfCount { key: String },
    PfMerge { dest: String, sources: Vec<String> },
}

/// Typed result of one [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Unit,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    /// A value that may be a miss.
    MaybeValue(Option<String>),
    Values(Vec<String>),
    Scored(Vec<(String, f64)>),
    MaybeScored(Option<(String, f64)>),
    Fields(BTreeMap<String, String>),
    MaybePosition(Option<(f64, f64)>),
    GeoHits(Vec<GeoResult>),
}

/// Apply one command against the store at time `now`.
///
/// This is the single dispatch point: interactive engine methods and the
/// batch executor both end up here, so semantics cannot drift between the
/// two paths.
pub fn apply(store: &mut Store, now: u64, cmd: &Command) -> EngineResult<Output> {
    match cmd {
        Command::Set { key, value } => {
            string::set(store, key, value.clone());
            Ok(Output::Unit)
        }
        Command::SetEx { key, value, ttl } => {
            string::set_ex(store, now, key, value.clone(), *ttl)?;
            Ok(Output::Unit)
        }
        Command::Get { key } => Ok(Output::MaybeValue(string::get(store, now, key)?)),
        Command::Del { key } => Ok(Output::Bool(key::del(store, key))),
        Command::Exists { key } => Ok(Output::Bool(key::exists(store, now, key))),
        Command::Expire { key, ttl } => Ok(Output::Bool(key::expire(store, now, key, *ttl)?)),
        Command::Persist { key } => Ok(Output::Bool(key::persist(store, now, key))),
        Command::Ttl { key } => Ok(Output::Int(key::ttl_millis(store, now, key))),
        Command::Append { key, value } => {
            Ok(Output::Uint(string::append(store, now, key, value)? as u64))
        }
        Command::Strlen { key } => Ok(Output::Uint(string::strlen(store, now, key)? as u64)),
        Command::IncrBy { key, delta } => Ok(Output::Int(string::incr_by(store, now, key, *delta)?)),

        Command::PushLeft { key, value } => Ok(Output::Uint(
            list::push_left(store, now, key, value.clone())? as u64,
        )),
        Command::PushRight { key, value } => Ok(Output::Uint(
            list::push_right(store, now, key, value.clone())? as u64,
        )),
        Command::PopLeft { key } => Ok(Output::MaybeValue(list::pop_left(store, now, key)?)),
        Command::PopRight { key } => Ok(Output::MaybeValue(list::pop_right(store, now, key)?)),
        Command::ListLen { key } => Ok(Output::Uint(list::len(store, now, key)? as u64)),
        Command::ListRange { key, start, stop } => {
            Ok(Output::Values(list::range(store, now, key, *start, *stop)?))
        }

        Command::SetAdd { key, member } => {
            Ok(Output::Bool(set::add(store, now, key, member.clone())?))
        }
        Command::SetRemove { key, member } => Ok(Output::Bool(set::remove(store, now, key, member)?)),
        Command::SetCard { key } => Ok(Output::Uint(set::cardinality(store, now, key)? as u64)),
        Command::SetMembers { key } => Ok(Output::Values(set::members(store, now, key)?)),
        Command::SetIsMember { key, member } => {
            Ok(Output::Bool(set::is_member(store, now, key, member)?))
        }

        Command::ZAdd { key, member, score } => Ok(Output::Bool(sorted_set::add(
            store,
            now,
            key,
            member.clone(),
            *score,
        )?)),
        Command::ZScore { key, member } => {
            let found = sorted_set::score(store, now, key, member)?;
            Ok(Output::MaybeScored(found.map(|s| (member.clone(), s))))
        }
        Command::ZRem { key, member } => {
            Ok(Output::Bool(sorted_set::remove(store, now, key, member)?))
        }
        Command::ZCard { key } => Ok(Output::Uint(sorted_set::cardinality(store, now, key)? as u64)),
        Command::ZRange { key, start, stop } => Ok(Output::Scored(sorted_set::range(
            store, now, key, *start, *stop,
        )?)),
        Command::ZPopMax { key } => Ok(Output::MaybeScored(sorted_set::pop_max(store, now, key)?)),
        Command::ZPopMin { key } => Ok(Output::MaybeScored(sorted_set::pop_min(store, now, key)?)),

        Command::HSet { key, field, value } => Ok(Output::Bool(hash::set_field(
            store,
            now,
            key,
            field.clone(),
            value.clone(),
        )?)),
        Command::HGet { key, field } => {
            Ok(Output::MaybeValue(hash::get_field(store, now, key, field)?))
        }
        Command::HGetAll { key } => Ok(Output::Fields(hash::get_all(store, now, key)?)),
        Command::HDel { key, field } => Ok(Output::Bool(hash::del_field(store, now, key, field)?)),
        Command::HLen { key } => Ok(Output::Uint(hash::len(store, now, key)? as u64)),
        Command::HExists { key, field } => {
            Ok(Output::Bool(hash::field_exists(store, now, key, field)?))
        }

        Command::GeoAdd {
            key,
            member,
            longitude,
            latitude,
        } => Ok(Output::Bool(geo::add_point(
            store,
            now,
            key,
            member.clone(),
            *longitude,
            *latitude,
        )?)),
        Command::GeoPos { key, member } => {
            Ok(Output::MaybePosition(geo::position(store, now, key, member)?))
        }
        Command::GeoDist {
            key,
            member_a,
            member_b,
            unit,
        } => Ok(Output::Float(geo::distance(
            store, now, key, member_a, member_b, *unit,
        )?)),
        Command::GeoSearch {
            key,
            longitude,
            latitude,
            radius,
            unit,
        } => Ok(Output::GeoHits(geo::search_radius(
            store, now, key, *longitude, *latitude, *radius, *unit,
        )?)),

        Command::PfAdd { key, elements } => {
            Ok(Output::Bool(hyperloglog::add(store, now, key, elements)?))
        }
        Command::PfCount { key } => Ok(Output::Uint(hyperloglog::count(store, now, key)?)),
        Command::PfMerge { dest, sources } => {
            hyperloglog::merge(store, now, dest, sources)?;
            Ok(Output::Unit)
        }
    }
}

use crate::error::{EngineError, EngineResult};
use crate::store::Store;
use crate::types::Value;
use crate::types::geo::{GeoResult, GeoValue, Unit};

fn open_geo<'a>(store: &'a mut Store, now: u64, key: &str) -> EngineResult<&'a mut GeoValue> {
    let entry = store.get_or_insert_with(key, now, || Value::Geo(GeoValue::new()));
    entry.value.as_geo_mut()
}

/// Add or move a named point. True only when the member was new.
pub fn add_point(
    store: &mut Store,
    now: u64,
    key: &str,
    member: String,
    longitude: f64,
    latitude: f64,
) -> EngineResult<bool> {
    open_geo(store, now, key)?.add(member, longitude, latitude)
}

pub fn position(store: &mut Store, now: u64, key: &str, member: &str) -> EngineResult<Option<(f64, f64)>> {
    match store.get(key, now) {
        Some(entry) => Ok(entry.value.as_geo()?.position(member)),
        None => Ok(None),
    }
}

/// Great-circle distance between two members in the requested unit.
/// Unknown members are an error, an absent key too.
pub fn distance(
    store: &mut Store,
    now: u64,
    key: &str,
    member_a: &str,
    member_b: &str,
    unit: Unit,
) -> EngineResult<f64> {
    match store.get(key, now) {
        Some(entry) => entry.value.as_geo()?.dist(member_a, member_b, unit),
        None => Err(EngineError::MemberNotFound(member_a.to_string())),
    }
}

/// Members within `radius` of the center, closest first.
pub fn search_radius(
    store: &mut Store,
    now: u64,
    key: &str,
    center_lon: f64,
    center_lat: f64,
    radius: f64,
    unit: Unit,
) -> EngineResult<Vec<GeoResult>> {
    match store.get(key, now) {
        Some(entry) => entry
            .value
            .as_geo()?
            .search_radius(center_lon, center_lat, radius, unit),
        None => Ok(vec![]),
    }
}

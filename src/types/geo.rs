use crate::error::{EngineError, EngineResult};
use std::collections::HashMap;
use std::str::FromStr;

/// Earth's radius in meters, the same spherical approximation Redis uses.
const EARTH_RADIUS_M: f64 = 6372797.560856;

/// Latitude limits of the web-Mercator projection; poles are not indexable.
pub const LAT_MIN: f64 = -85.05112878;
pub const LAT_MAX: f64 = 85.05112878;
pub const LON_MIN: f64 = -180.0;
pub const LON_MAX: f64 = 180.0;

/// Distance unit accepted by the geo commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Meters,
    Kilometers,
    Miles,
    Feet,
}

impl Unit {
    /// Meters per one of this unit.
    pub fn to_meters(self) -> f64 {
        match self {
            Unit::Meters => 1.0,
            Unit::Kilometers => 1000.0,
            Unit::Miles => 1609.34,
            Unit::Feet => 0.3048,
        }
    }
}

impl FromStr for Unit {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" => Ok(Unit::Meters),
            "km" => Ok(Unit::Kilometers),
            "mi" => Ok(Unit::Miles),
            "ft" => Ok(Unit::Feet),
            other => Err(EngineError::invalid(format!("unknown unit '{other}'"))),
        }
    }
}

/// Named geographic points with radius search.
#[derive(Debug, Clone, Default)]
pub struct GeoValue {
    /// member -> (longitude, latitude)
    members: HashMap<String, (f64, f64)>,
}

/// One radius-search hit, distance in the unit the caller asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResult {
    pub member: String,
    pub longitude: f64,
    pub latitude: f64,
    pub distance: f64,
}

impl GeoValue {
    pub fn new() -> Self {
        GeoValue::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Add or move a member. Returns true if the member is new.
    pub fn add(&mut self, member: String, longitude: f64, latitude: f64) -> EngineResult<bool> {
        validate_coordinates(longitude, latitude)?;
        Ok(self.members.insert(member, (longitude, latitude)).is_none())
    }

    pub fn position(&self, member: &str) -> Option<(f64, f64)> {
        self.members.get(member).copied()
    }

    /// Great-circle distance between two members, in `unit`.
    pub fn dist(&self, a: &str, b: &str, unit: Unit) -> EngineResult<f64> {
        let &(lon1, lat1) = self
            .members
            .get(a)
            .ok_or_else(|| EngineError::MemberNotFound(a.to_string()))?;
        let &(lon2, lat2) = self
            .members
            .get(b)
            .ok_or_else(|| EngineError::MemberNotFound(b.to_string()))?;
        Ok(haversine(lat1, lon1, lat2, lon2) / unit.to_meters())
    }

    /// All members within `radius` (in `unit`) of a center point, closest
    /// first. Reported distances are in the same unit.
    pub fn search_radius(
        &self,
        center_lon: f64,
        center_lat: f64,
        radius: f64,
        unit: Unit,
    ) -> EngineResult<Vec<GeoResult>> {
        validate_coordinates(center_lon, center_lat)?;
        if !radius.is_finite() || radius < 0.0 {
            return Err(EngineError::invalid("radius must be non-negative"));
        }

        let radius_m = radius * unit.to_meters();
        let mut hits: Vec<GeoResult> = self
            .members
            .iter()
            .filter_map(|(member, &(lon, lat))| {
                let d = haversine(center_lat, center_lon, lat, lon);
                (d <= radius_m).then(|| GeoResult {
                    member: member.clone(),
                    longitude: lon,
                    latitude: lat,
                    distance: d / unit.to_meters(),
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.member.cmp(&b.member))
        });
        Ok(hits)
    }
}

fn validate_coordinates(longitude: f64, latitude: f64) -> EngineResult<()> {
    if !longitude.is_finite() || !(LON_MIN..=LON_MAX).contains(&longitude) {
        return Err(EngineError::invalid(format!(
            "longitude {longitude} out of range"
        )));
    }
    if !latitude.is_finite() || !(LAT_MIN..=LAT_MAX).contains(&latitude) {
        return Err(EngineError::invalid(format!(
            "latitude {latitude} out of range"
        )));
    }
    Ok(())
}

/// Haversine distance between two points, in meters.
fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a =
        (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    EARTH_RADIUS_M * 2.0 * a.sqrt().asin()
}

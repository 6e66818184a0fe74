//! Route and waypoint records.
//!
//! Plain values: a route owns its points, and nothing in the physics crates
//! refers to them.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sail_core::constants::EARTH_RADIUS_NM;

/// One waypoint. Angles in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleRoutePoint {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub guid: String,
    pub created: DateTime<Utc>,
    /// Planned departure from this point, if scheduled.
    pub etd: Option<DateTime<Utc>>,
    /// Speed made good on the leg ending at this point (knots).
    pub segment_vmg: f64,
}

impl SimpleRoutePoint {
    /// New waypoint created now. An empty `guid` gets a fresh identifier.
    pub fn new(lat: f64, lon: f64, icon: &str, name: &str, guid: &str) -> Self {
        let guid = if guid.is_empty() {
            new_guid()
        } else {
            guid.to_string()
        };
        Self {
            lat,
            lon,
            name: name.to_string(),
            description: String::new(),
            icon: icon.to_string(),
            guid,
            created: Utc::now(),
            etd: None,
            segment_vmg: 0.0,
        }
    }

    /// Great-circle distance to `other` in nautical miles.
    pub fn distance_nm(&self, other: &SimpleRoutePoint) -> f64 {
        great_circle_nm(self.lat, self.lon, other.lat, other.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleRoute {
    pub guid: String,
    pub name: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub planned_departure: Option<DateTime<Utc>>,
    /// Knots.
    pub planned_speed: f64,
    pub points: Vec<SimpleRoutePoint>,
}

impl SimpleRoute {
    pub fn new(name: &str) -> Self {
        Self {
            guid: new_guid(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn add_point(&mut self, point: SimpleRoutePoint) {
        self.points.push(point);
    }

    /// Length of each leg in nautical miles.
    pub fn leg_distances_nm(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_nm(&pair[1]))
            .collect()
    }

    pub fn total_distance_nm(&self) -> f64 {
        self.leg_distances_nm().iter().sum()
    }

    /// Time to sail the whole route at the planned speed.
    pub fn planned_duration(&self) -> Option<Duration> {
        if !(self.planned_speed > 0.0) {
            return None;
        }
        let hours = self.total_distance_nm() / self.planned_speed;
        Some(Duration::milliseconds((hours * 3_600_000.0).round() as i64))
    }

    /// Planned departure plus [`Self::planned_duration`].
    pub fn planned_arrival(&self) -> Option<DateTime<Utc>> {
        Some(self.planned_departure? + self.planned_duration()?)
    }
}

/// Haversine distance between two positions in degrees.
pub fn great_circle_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = phi2 - phi1;
    let d_lambda = (lon2 - lon1).to_radians();
    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_NM * h.sqrt().min(1.0).asin()
}

/// RFC 4122 version 4 identifier, lower-case hyphenated.
pub fn new_guid() -> String {
    new_guid_with(&mut rand::rng())
}

pub fn new_guid_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Uniform integer in `min..=max`; the bounds may come in either order.
pub fn random_in_range(min: i32, max: i32) -> i32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rand::rng().random_range(lo..=hi)
}

//! Day/night estimate for switch rules that only apply by day or by night.

use std::cell::OnceCell;
use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Maximum solar declination (degrees).
const OBLIQUITY_DEG: f64 = 23.45;
const DAYS_PER_YEAR: f64 = 365.24;

/// Time and position for one switch query.
///
/// The day/night flag is computed on first use and reused afterwards, so a
/// scan over many rules pays for at most one estimate.
#[derive(Debug, Clone)]
pub struct DaylightContext {
    pub time: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    is_day: OnceCell<bool>,
}

impl DaylightContext {
    pub fn new(time: DateTime<Utc>, lat: f64, lon: f64) -> Self {
        Self {
            time,
            lat,
            lon,
            is_day: OnceCell::new(),
        }
    }

    /// A context whose answer is already known.
    pub fn known(time: DateTime<Utc>, lat: f64, lon: f64, is_day: bool) -> Self {
        let ctx = Self::new(time, lat, lon);
        let _ = ctx.is_day.set(is_day);
        ctx
    }

    /// Whether the sun is above the horizon, computed at most once.
    pub fn is_day(&self) -> bool {
        *self
            .is_day
            .get_or_init(|| sun_above_horizon(self.time, self.lat, self.lon))
    }

    /// Whether the estimate has been made (or preset).
    pub fn is_resolved(&self) -> bool {
        self.is_day.get().is_some()
    }
}

/// Sine of the solar elevation.
///
/// Not astronomically precise: no refraction, no equation of time, circular
/// orbit. Good enough to tell day from night for plan selection.
pub fn solar_elevation_sine(time: DateTime<Utc>, lat: f64, lon: f64) -> f64 {
    let day_of_year = time.ordinal() as f64;
    let declination =
        (-OBLIQUITY_DEG * (2.0 * PI * (day_of_year + 10.0) / DAYS_PER_YEAR).cos()).to_radians();

    let utc_hours = time.hour() as f64 + time.minute() as f64 / 60.0;
    let hour_angle = (15.0 * (utc_hours + lon / 15.0 - 12.0)).to_radians();

    let lat = lat.to_radians();
    lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos()
}

pub fn sun_above_horizon(time: DateTime<Utc>, lat: f64, lon: f64) -> bool {
    solar_elevation_sine(time, lat, lon) > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn equator_noon_and_midnight() {
        assert!(sun_above_horizon(at(2024, 3, 20, 12), 0.0, 0.0));
        assert!(!sun_above_horizon(at(2024, 3, 20, 0), 0.0, 0.0));
    }

    #[test]
    fn longitude_shifts_local_time() {
        // Noon UTC is local midnight on the antimeridian.
        assert!(!sun_above_horizon(at(2024, 3, 20, 12), 0.0, 180.0));
        // 18:00 UTC is local noon at 90°W.
        assert!(sun_above_horizon(at(2024, 3, 20, 18), 0.0, -90.0));
    }

    #[test]
    fn polar_day_and_night() {
        assert!(sun_above_horizon(at(2024, 6, 21, 0), 80.0, 0.0));
        assert!(!sun_above_horizon(at(2024, 12, 21, 12), 80.0, 0.0));
        assert!(sun_above_horizon(at(2024, 12, 21, 0), -80.0, 0.0));
    }

    #[test]
    fn context_resolves_lazily_once() {
        let ctx = DaylightContext::new(at(2024, 3, 20, 12), 0.0, 0.0);
        assert!(!ctx.is_resolved());
        assert!(ctx.is_day());
        assert!(ctx.is_resolved());
        assert!(ctx.is_day());
    }

    #[test]
    fn preset_context_skips_the_estimate() {
        let ctx = DaylightContext::known(at(2024, 3, 20, 12), 0.0, 0.0, false);
        assert!(ctx.is_resolved());
        assert!(!ctx.is_day());
    }
}

//! Core constants and shared angle helpers for the Sail Performance Calculator workspace.

/// Physical constants and conversion factors.
pub mod constants {
    /// Pounds per (short) ton, the unit displacement is stored in.
    pub const POUNDS_PER_SHORT_TON: f64 = 2_000.0;
    /// Pounds per long ton, the unit of the displacement/length ratio.
    pub const POUNDS_PER_LONG_TON: f64 = 2_240.0;
    /// Speed/length ratio of a classic displacement hull (knots / sqrt(ft)).
    pub const HULL_SPEED_SL_RATIO: f64 = 1.34;
    /// Mean earth radius in nautical miles.
    pub const EARTH_RADIUS_NM: f64 = 3_440.065;
}

/// Angle helpers shared by the wind, plan, and polar crates.
pub mod angle {
    /// Wrap a heading in degrees into (-180, 180].
    ///
    /// Taking the absolute value of the result folds port and starboard tacks
    /// onto the same 0..=180 range.
    pub fn heading_resolve(degrees: f64) -> f64 {
        if !degrees.is_finite() {
            return degrees;
        }
        let wrapped = degrees.rem_euclid(360.0);
        if wrapped > 180.0 {
            wrapped - 360.0
        } else {
            wrapped
        }
    }

    /// Tack-symmetric angle off the wind in degrees, 0..=180.
    #[inline]
    pub fn off_wind(degrees: f64) -> f64 {
        heading_resolve(degrees).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::angle::*;

    #[test]
    fn heading_resolve_folds_into_half_turns() {
        assert_eq!(heading_resolve(0.0), 0.0);
        assert_eq!(heading_resolve(180.0), 180.0);
        assert_eq!(heading_resolve(190.0), -170.0);
        assert_eq!(heading_resolve(-190.0), 170.0);
        assert_eq!(heading_resolve(720.0 + 45.0), 45.0);
        assert_eq!(off_wind(-135.0), 135.0);
        assert_eq!(off_wind(225.0), 135.0);
    }

    #[test]
    fn non_finite_headings_pass_through() {
        assert!(heading_resolve(f64::NAN).is_nan());
        assert!(off_wind(f64::NAN).is_nan());
        assert_eq!(off_wind(f64::NEG_INFINITY), f64::INFINITY);
    }
}

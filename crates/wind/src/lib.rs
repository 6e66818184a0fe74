//! Wind triangle relations (law of cosines / law of sines) between the true
//! wind, the apparent wind, and the boat's speed through water.
//!
//! Angles are radians measured off the bow, 0 dead upwind and π dead
//! downwind. Speeds share one unit (knots throughout the workspace).

use std::f64::consts::PI;

/// Apparent wind seen aboard, speed and angle off the bow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApparentWind {
    pub speed: f64,
    pub angle: f64,
}

/// Apparent wind speed for a boat at `stw` in true wind `vw` from angle `w`.
///
/// `aws² = vw² + stw² + 2·vw·stw·cos(w)`
pub fn apparent_wind_speed(stw: f64, w: f64, vw: f64) -> f64 {
    let d = vw * vw + stw * stw + 2.0 * vw * stw * w.cos();
    d.max(0.0).sqrt()
}

/// Apparent wind angle from the triangle sides.
///
/// A calm apparent wind yields 0 and a stationary boat sees the true wind angle.
pub fn apparent_wind_direction(aws: f64, stw: f64, w: f64, vw: f64) -> f64 {
    if aws == 0.0 {
        return 0.0;
    }
    if stw == 0.0 {
        return w;
    }
    let d = (aws * aws + stw * stw - vw * vw) / (2.0 * aws * stw);
    d.clamp(-1.0, 1.0).acos()
}

/// Both apparent wind quantities in one call.
pub fn apparent_wind(stw: f64, w: f64, vw: f64) -> ApparentWind {
    let speed = apparent_wind_speed(stw, w, vw);
    ApparentWind {
        speed,
        angle: apparent_wind_direction(speed, stw, w, vw),
    }
}

/// True wind speed recovered from the apparent wind and boat speed.
///
/// `vw² = aws² + stw² - 2·aws·stw·cos(a)`
pub fn true_wind_speed(aws: f64, stw: f64, a: f64) -> f64 {
    let d = aws * aws + stw * stw - 2.0 * aws * stw * a.cos();
    d.max(0.0).sqrt()
}

/// True wind angle recovered from the apparent wind and boat speed.
pub fn true_wind_direction(aws: f64, stw: f64, a: f64) -> f64 {
    let vw = true_wind_speed(aws, stw, a);
    if vw == 0.0 {
        return 0.0;
    }
    if stw == 0.0 {
        return a;
    }
    let d = (aws * aws - vw * vw - stw * stw) / (2.0 * vw * stw);
    d.clamp(-1.0, 1.0).acos()
}

/// Fold any angle in radians onto 0..=π, treating both tacks alike.
pub fn fold_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(2.0 * PI);
    if wrapped > PI { 2.0 * PI - wrapped } else { wrapped }
}

/// Tack of a true wind angle: `1.0` for starboard (wind off the right side,
/// 0..=π after wrapping) and `-1.0` for port.
pub fn tack_sign(angle: f64) -> f64 {
    if angle.rem_euclid(2.0 * PI) > PI { -1.0 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    // Boat heads +y; wind blowing from angle w off the bow arrives as (-sin w, -cos w).
    fn apparent_by_vectors(stw: f64, w: f64, vw: f64) -> (f64, f64) {
        let x = -vw * w.sin();
        let y = -vw * w.cos() - stw;
        let speed = (x * x + y * y).sqrt();
        let angle = (-x).atan2(-y).abs();
        (speed, angle)
    }

    #[test]
    fn beam_reach_matches_vector_sum() {
        let w = 90f64.to_radians();
        let aws = apparent_wind_speed(5.0, w, 10.0);
        assert!((aws - 125f64.sqrt()).abs() < EPS);
        let a = apparent_wind_direction(aws, 5.0, w, 10.0);
        assert!((a - (10.0f64 / 5.0).atan()).abs() < 1e-9, "a = {a}");
    }

    #[test]
    fn law_of_cosines_agrees_with_vectors_across_angles() {
        for deg in (0..=180).step_by(5) {
            let w = (deg as f64).to_radians();
            for stw in [0.5, 3.0, 7.0, 12.0] {
                let wind = apparent_wind(stw, w, 12.0);
                let (speed, angle) = apparent_by_vectors(stw, w, 12.0);
                assert!((wind.speed - speed).abs() < 1e-6, "deg {deg} stw {stw}");
                assert!((wind.angle - angle).abs() < 1e-6, "deg {deg} stw {stw}");
            }
        }
    }

    #[test]
    fn degenerate_cases() {
        assert_eq!(apparent_wind_direction(0.0, 4.0, 1.0, 4.0), 0.0);
        assert_eq!(apparent_wind_direction(10.0, 0.0, 1.2, 10.0), 1.2);
        // Head to wind: the apparent wind is dead ahead.
        let head = apparent_wind(4.0, 0.0, 10.0);
        assert!((head.speed - 14.0).abs() < EPS);
        assert!(head.angle.abs() < 1e-6);
        // Running slower than the wind: dead astern.
        let run = apparent_wind(4.0, PI, 10.0);
        assert!((run.speed - 6.0).abs() < EPS);
        assert!((run.angle - PI).abs() < 1e-6);
    }

    #[test]
    fn inverse_relations_recover_true_wind() {
        for deg in [30.0f64, 60.0, 90.0, 120.0, 150.0] {
            let w = deg.to_radians();
            let wind = apparent_wind(6.0, w, 15.0);
            let vw = true_wind_speed(wind.speed, 6.0, wind.angle);
            let tw = true_wind_direction(wind.speed, 6.0, wind.angle);
            assert!((vw - 15.0).abs() < 1e-6, "deg {deg}: vw = {vw}");
            assert!((tw - w).abs() < 1e-6, "deg {deg}: tw = {tw}");
        }
    }

    #[test]
    fn fold_angle_is_tack_symmetric() {
        assert!((fold_angle(-PI / 2.0) - PI / 2.0).abs() < EPS);
        assert!((fold_angle(3.0 * PI / 2.0) - PI / 2.0).abs() < EPS);
        assert!((fold_angle(PI) - PI).abs() < EPS);
    }

    #[test]
    fn tack_sign_follows_wrapped_side() {
        assert_eq!(tack_sign(PI / 3.0), 1.0);
        assert_eq!(tack_sign(-PI / 3.0), -1.0);
        assert_eq!(tack_sign(5.0 * PI / 3.0), -1.0);
        assert_eq!(tack_sign(PI), 1.0);
        assert_eq!(tack_sign(0.0), 1.0);
    }
}

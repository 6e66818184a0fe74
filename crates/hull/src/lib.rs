//! Hull geometry ratios and drag models.
//!
//! A [`Boat`] carries the static hull parameters plus the frictional and wake
//! drag coefficients derived from them. The coefficients are cached: any
//! mutation through a setter clears the cache, and [`Boat::recompute_drag`]
//! must run before the boat is used for drag evaluation again.

use sail_core::constants::{HULL_SPEED_SL_RATIO, POUNDS_PER_LONG_TON, POUNDS_PER_SHORT_TON};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hull configuration. Drives hull count and the drag recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HullType {
    #[default]
    Monohull,
    Catamaran,
    Trimaran,
    Proa,
    Submarine,
}

impl HullType {
    /// Number of hulls sharing the displacement.
    pub fn hulls(self) -> f64 {
        match self {
            Self::Catamaran => 2.0,
            Self::Trimaran => 3.0,
            Self::Proa => 2.0,
            Self::Monohull | Self::Submarine => 1.0,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Monohull => "monohull",
            Self::Catamaran => "catamaran",
            Self::Trimaran => "trimaran",
            Self::Proa => "proa",
            Self::Submarine => "submarine",
        }
    }
}

/// Static hull parameters in feet, short tons and square feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullDimensions {
    #[serde(default)]
    pub hull_type: HullType,
    pub lwl_ft: f64,
    pub loa_ft: f64,
    pub beam_ft: f64,
    pub displacement_tons: f64,
    pub sail_area_ft2: f64,
}

impl HullDimensions {
    /// Reject values the ratio formulas cannot digest.
    pub fn validate(&self) -> Result<(), HullError> {
        let positive = [
            ("lwl_ft", self.lwl_ft),
            ("loa_ft", self.loa_ft),
            ("beam_ft", self.beam_ft),
            ("displacement_tons", self.displacement_tons),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(HullError::NonFinite(field));
            }
            if value <= 0.0 {
                return Err(HullError::NonPositive(field, value));
            }
        }
        if !self.sail_area_ft2.is_finite() {
            return Err(HullError::NonFinite("sail_area_ft2"));
        }
        if self.sail_area_ft2 < 0.0 {
            return Err(HullError::NonPositive("sail_area_ft2", self.sail_area_ft2));
        }
        if self.lwl_ft > self.loa_ft {
            return Err(HullError::WaterlineExceedsOverall {
                lwl_ft: self.lwl_ft,
                loa_ft: self.loa_ft,
            });
        }
        Ok(())
    }
}

/// Errors raised when validating hull parameters.
#[derive(Debug, Error, PartialEq)]
pub enum HullError {
    #[error("{0} must be finite")]
    NonFinite(&'static str),
    #[error("{0} must be positive (got {1})")]
    NonPositive(&'static str, f64),
    #[error("waterline length {lwl_ft} ft exceeds overall length {loa_ft} ft")]
    WaterlineExceedsOverall { lwl_ft: f64, loa_ft: f64 },
}

/// Drag coefficients derived from hull geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DragCoefficients {
    pub frictional: f64,
    pub wake: f64,
}

/// Informational ratios, bundled for reports.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HullSummary {
    pub hulls: f64,
    pub displacement_pounds: f64,
    pub displacement_long_tons: f64,
    pub displacement_length_ratio: f64,
    pub hull_sl_ratio: f64,
    pub hull_speed_kn: f64,
    pub capsize_risk: f64,
    pub sail_area_displacement_ratio: f64,
    pub comfort_factor: f64,
}

/// A vessel's hull with its cached drag coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct Boat {
    dimensions: HullDimensions,
    drag: Option<DragCoefficients>,
}

impl Boat {
    /// Create a boat and compute its drag coefficients.
    pub fn new(dimensions: HullDimensions) -> Self {
        let mut boat = Self {
            dimensions,
            drag: None,
        };
        boat.recompute_drag();
        boat
    }

    pub fn dimensions(&self) -> &HullDimensions {
        &self.dimensions
    }

    pub fn hull_type(&self) -> HullType {
        self.dimensions.hull_type
    }

    /// Cached drag coefficients, `None` after a mutation until recomputed.
    pub fn drag_coefficients(&self) -> Option<DragCoefficients> {
        self.drag
    }

    pub fn is_drag_stale(&self) -> bool {
        self.drag.is_none()
    }

    pub fn set_dimensions(&mut self, dimensions: HullDimensions) {
        self.dimensions = dimensions;
        self.drag = None;
    }

    pub fn set_hull_type(&mut self, hull_type: HullType) {
        self.dimensions.hull_type = hull_type;
        self.drag = None;
    }

    pub fn set_lwl_ft(&mut self, lwl_ft: f64) {
        self.dimensions.lwl_ft = lwl_ft;
        self.drag = None;
    }

    pub fn set_loa_ft(&mut self, loa_ft: f64) {
        self.dimensions.loa_ft = loa_ft;
        self.drag = None;
    }

    pub fn set_beam_ft(&mut self, beam_ft: f64) {
        self.dimensions.beam_ft = beam_ft;
        self.drag = None;
    }

    pub fn set_displacement_tons(&mut self, displacement_tons: f64) {
        self.dimensions.displacement_tons = displacement_tons;
        self.drag = None;
    }

    pub fn set_sail_area_ft2(&mut self, sail_area_ft2: f64) {
        self.dimensions.sail_area_ft2 = sail_area_ft2;
        self.drag = None;
    }

    pub fn hulls(&self) -> f64 {
        self.dimensions.hull_type.hulls()
    }

    pub fn displacement_pounds(&self) -> f64 {
        self.dimensions.displacement_tons * POUNDS_PER_SHORT_TON
    }

    pub fn displacement_long_tons(&self) -> f64 {
        self.displacement_pounds() / POUNDS_PER_LONG_TON
    }

    /// Displacement/length ratio per hull. Infinite for a zero waterline.
    pub fn displacement_length_ratio(&self) -> f64 {
        let scaled_lwl = 0.01 * self.dimensions.lwl_ft;
        self.displacement_long_tons() / (scaled_lwl * scaled_lwl * scaled_lwl) / self.hulls()
    }

    /// Empirical speed/length ratio, never below the classic 1.34.
    pub fn hull_sl_ratio(&self) -> f64 {
        let sl = 8.26 / self.displacement_length_ratio().powf(0.311);
        // NaN compares false and falls through to the floor as well.
        if sl >= HULL_SPEED_SL_RATIO {
            sl
        } else {
            HULL_SPEED_SL_RATIO
        }
    }

    /// Hull speed in knots.
    pub fn hull_speed(&self) -> f64 {
        self.hull_sl_ratio() * self.dimensions.lwl_ft.sqrt()
    }

    /// Values greater than 2 are a danger.
    pub fn capsize_risk(&self) -> f64 {
        self.dimensions.beam_ft / (1.1 * self.displacement_pounds() / 64.0).cbrt()
    }

    pub fn sail_area_displacement_ratio(&self) -> f64 {
        self.dimensions.sail_area_ft2 / (self.displacement_pounds() / 64.0).powf(2.0 / 3.0)
    }

    /// 20 or less for racers, 30-40 for cruisers, higher for heavy boats.
    pub fn comfort_factor(&self) -> f64 {
        let d = &self.dimensions;
        self.displacement_pounds() / (0.65 * (0.7 * d.lwl_ft + 0.3 * d.loa_ft) * d.beam_ft.powf(1.33))
    }

    pub fn summary(&self) -> HullSummary {
        HullSummary {
            hulls: self.hulls(),
            displacement_pounds: self.displacement_pounds(),
            displacement_long_tons: self.displacement_long_tons(),
            displacement_length_ratio: self.displacement_length_ratio(),
            hull_sl_ratio: self.hull_sl_ratio(),
            hull_speed_kn: self.hull_speed(),
            capsize_risk: self.capsize_risk(),
            sail_area_displacement_ratio: self.sail_area_displacement_ratio(),
            comfort_factor: self.comfort_factor(),
        }
    }

    /// Frictional drag at `stw` knots, proportional to speed squared.
    ///
    /// NaN while the drag cache is stale.
    pub fn friction_drag(&self, stw: f64) -> f64 {
        match self.drag {
            Some(drag) => 10.0 * drag.frictional * stw * stw,
            None => f64::NAN,
        }
    }

    /// Wave-making drag at `stw` knots.
    ///
    /// Zero below hull speed (1.34 sqrt(lwl)), exponential above it and never
    /// more than `stw` itself. NaN while the drag cache is stale.
    pub fn wake_drag(&self, stw: f64) -> f64 {
        let Some(drag) = self.drag else {
            return f64::NAN;
        };
        let coeff = stw / HULL_SPEED_SL_RATIO / self.dimensions.lwl_ft.sqrt();
        if coeff < 1.0 {
            return 0.0;
        }
        let wake = (32f64.powf(coeff - 1.0) - 1.0) * drag.wake * 10.0;
        wake.min(stw)
    }

    /// Total hull drag at `stw` knots.
    pub fn total_drag(&self, stw: f64) -> f64 {
        self.friction_drag(stw) + self.wake_drag(stw)
    }

    /// Derive drag coefficients from the current geometry and cache them.
    pub fn recompute_drag(&mut self) -> DragCoefficients {
        let mut frictional = 0.001 * self.displacement_length_ratio().sqrt();

        let wake = match self.dimensions.hull_type {
            HullType::Submarine => {
                // Fully submerged: more wetted surface, no surface wave.
                frictional *= 2.5;
                0.0
            }
            HullType::Monohull | HullType::Catamaran | HullType::Trimaran | HullType::Proa => {
                let froude = self.hull_sl_ratio() * 0.4 / HULL_SPEED_SL_RATIO;
                let max_drag = 1.2;
                let wake = (max_drag - froude) / (max_drag - 0.4);
                (wake * wake).clamp(0.0, 1.0)
            }
        };

        let drag = DragCoefficients { frictional, wake };
        self.drag = Some(drag);
        drag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cruiser() -> HullDimensions {
        HullDimensions {
            hull_type: HullType::Monohull,
            lwl_ft: 30.0,
            loa_ft: 34.0,
            beam_ft: 10.5,
            displacement_tons: 5.0,
            sail_area_ft2: 520.0,
        }
    }

    #[test]
    fn hull_counts() {
        assert_eq!(HullType::Catamaran.hulls(), 2.0);
        assert_eq!(HullType::Monohull.hulls(), 1.0);
        assert_eq!(HullType::Trimaran.hulls(), 3.0);
        assert_eq!(HullType::Proa.hulls(), 2.0);
        assert_eq!(HullType::Submarine.hulls(), 1.0);
    }

    #[test]
    fn displacement_conversions() {
        let boat = Boat::new(cruiser());
        assert_eq!(boat.displacement_pounds(), 10_000.0);
        assert!((boat.displacement_long_tons() - 10_000.0 / 2_240.0).abs() < 1e-12);
    }

    #[test]
    fn cruiser_ratios_match_hand_calculation() {
        let boat = Boat::new(cruiser());
        let dlr = boat.displacement_length_ratio();
        assert!((dlr - 165.34).abs() < 0.05, "dlr = {dlr}");
        let sl = boat.hull_sl_ratio();
        assert!((sl - 1.687).abs() < 0.01, "sl = {sl}");
        let speed = boat.hull_speed();
        assert!((speed - 9.24).abs() < 0.05, "hull speed = {speed}");
    }

    #[test]
    fn heavy_hull_sl_ratio_is_floored() {
        let mut dims = cruiser();
        dims.displacement_tons = 60.0;
        let boat = Boat::new(dims);
        assert_eq!(boat.hull_sl_ratio(), HULL_SPEED_SL_RATIO);
    }

    #[test]
    fn catamaran_splits_displacement() {
        let mono = Boat::new(cruiser());
        let mut dims = cruiser();
        dims.hull_type = HullType::Catamaran;
        let cat = Boat::new(dims);
        let ratio = mono.displacement_length_ratio() / cat.displacement_length_ratio();
        assert!((ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn zero_waterline_degrades_without_panicking() {
        let mut dims = cruiser();
        dims.lwl_ft = 0.0;
        let boat = Boat::new(dims);
        assert!(boat.displacement_length_ratio().is_infinite());
        assert_eq!(boat.hull_sl_ratio(), HULL_SPEED_SL_RATIO);
        assert!(boat.friction_drag(0.0).is_nan());
    }

    #[test]
    fn friction_drag_is_zero_at_rest_and_monotonic() {
        let boat = Boat::new(cruiser());
        assert_eq!(boat.friction_drag(0.0), 0.0);
        let mut last = 0.0;
        for i in 0..200 {
            let d = boat.friction_drag(i as f64 * 0.1);
            assert!(d >= last);
            last = d;
        }
    }

    #[test]
    fn wake_drag_respects_threshold_and_clamp() {
        let boat = Boat::new(cruiser());
        let threshold = HULL_SPEED_SL_RATIO * 30f64.sqrt();
        let mut last = 0.0;
        for i in 0..400 {
            let stw = i as f64 * 0.05;
            let d = boat.wake_drag(stw);
            if stw < threshold {
                assert_eq!(d, 0.0, "stw = {stw}");
            }
            assert!(d <= stw, "stw = {stw}, drag = {d}");
            assert!(d >= last, "stw = {stw}");
            last = d;
        }
        assert!(boat.wake_drag(threshold * 1.2) > 0.0);
    }

    #[test]
    fn recompute_drag_for_surface_hull() {
        let boat = Boat::new(cruiser());
        let drag = boat.drag_coefficients().unwrap();
        assert!((drag.frictional - 0.012_858).abs() < 1e-5, "{drag:?}");
        assert!((drag.wake - 0.758).abs() < 0.01, "{drag:?}");
        assert!((0.0..=1.0).contains(&drag.wake));
    }

    #[test]
    fn submarine_has_no_wake_and_more_friction() {
        let surface = Boat::new(cruiser());
        let mut dims = cruiser();
        dims.hull_type = HullType::Submarine;
        let sub = Boat::new(dims);
        let s = surface.drag_coefficients().unwrap();
        let u = sub.drag_coefficients().unwrap();
        assert_eq!(u.wake, 0.0);
        assert!((u.frictional - 2.5 * s.frictional).abs() < 1e-12);
        assert_eq!(sub.wake_drag(50.0), 0.0);
    }

    #[test]
    fn mutation_invalidates_drag_until_recompute() {
        let mut boat = Boat::new(cruiser());
        boat.set_lwl_ft(28.0);
        assert!(boat.is_drag_stale());
        assert!(boat.friction_drag(3.0).is_nan());
        assert!(boat.wake_drag(30.0).is_nan());
        boat.recompute_drag();
        assert!(!boat.is_drag_stale());
        assert!(boat.friction_drag(3.0).is_finite());
    }

    #[test]
    fn validate_rejects_bad_dimensions() {
        assert!(cruiser().validate().is_ok());
        let mut dims = cruiser();
        dims.lwl_ft = 0.0;
        assert_eq!(dims.validate(), Err(HullError::NonPositive("lwl_ft", 0.0)));
        let mut dims = cruiser();
        dims.beam_ft = f64::NAN;
        assert_eq!(dims.validate(), Err(HullError::NonFinite("beam_ft")));
        let mut dims = cruiser();
        dims.lwl_ft = 40.0;
        assert!(matches!(
            dims.validate(),
            Err(HullError::WaterlineExceedsOverall { .. })
        ));
    }

    #[test]
    fn informational_ratios_are_plausible() {
        let summary = Boat::new(cruiser()).summary();
        assert!(summary.capsize_risk > 1.0 && summary.capsize_risk < 3.0);
        assert!(summary.sail_area_displacement_ratio > 10.0);
        assert!(summary.comfort_factor > 10.0 && summary.comfort_factor < 60.0);
    }
}

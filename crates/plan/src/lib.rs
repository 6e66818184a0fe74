//! Boat plans: one sail/rig configuration of a vessel.
//!
//! A [`BoatPlan`] turns the apparent wind into a candidate speed through
//! water (the sail force model) and carries the ordered switch rules that
//! recommend a different plan for other conditions.

pub mod daylight;
pub mod switch;

use std::f64::consts::FRAC_PI_2;

use sail_core::angle::off_wind;
use thiserror::Error;

pub use daylight::DaylightContext;
pub use switch::{SwitchMatching, SwitchPlan};

/// Errors raised when validating a plan against its vessel.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("plan '{plan}': switch rule {rule} targets plan {target}, but only {count} plans exist")]
    SwitchTargetOutOfRange {
        plan: String,
        rule: usize,
        target: usize,
        count: usize,
    },
    #[error("plan '{plan}': {field} must be finite")]
    NonFinite { plan: String, field: &'static str },
    #[error("plan '{plan}': luff angle {angle} is outside 0..=180 degrees")]
    LuffAngleOutOfRange { plan: String, angle: f64 },
}

/// One operating configuration of a boat.
#[derive(Debug, Clone, PartialEq)]
pub struct BoatPlan {
    pub name: String,
    /// Sail efficiency coefficient; 1.0 sails at true wind speed in ideal conditions.
    pub eta: f64,
    /// Apparent wind angle (degrees) below which the sails luff.
    pub luff_angle_deg: f64,
    pub wing_wing_running: bool,
    /// Keel slip relative to forward drive; 0 means no leeway.
    pub leeway_coefficient: f64,
    pub switch_matching: SwitchMatching,
    pub switch_plans: Vec<SwitchPlan>,
}

impl BoatPlan {
    pub fn new(name: impl Into<String>, eta: f64, luff_angle_deg: f64) -> Self {
        Self {
            name: name.into(),
            eta,
            luff_angle_deg,
            wing_wing_running: false,
            leeway_coefficient: 0.0,
            switch_matching: SwitchMatching::default(),
            switch_plans: Vec::new(),
        }
    }

    /// Speed through water the sails can drive at apparent wind angle `a`
    /// (radians off the bow) and apparent wind speed `aws`.
    ///
    /// Zero when luffing or when `eta` is not positive.
    pub fn velocity_boat(&self, a: f64, aws: f64) -> f64 {
        if a < self.luff_angle_deg.to_radians() {
            return 0.0;
        }
        if self.eta <= 0.0 {
            return 0.0;
        }

        let mut v = (a / 2.0).sin() * (aws.max(0.0) / self.eta).sqrt();

        // Sails set on both sides: up to 50% more drive dead downwind.
        if self.wing_wing_running && a > FRAC_PI_2 {
            v += v * (a - FRAC_PI_2).sin() / 2.0;
        }

        v
    }

    /// Angle between the heading and the track through water (radians).
    ///
    /// `atan2(slip, forward)` where slip scales with `cos(a/2)` by the leeway
    /// coefficient. Zero when the boat cannot sail or has no leeway.
    pub fn angle_of_attack(&self, a: f64, aws: f64) -> f64 {
        if self.leeway_coefficient == 0.0 {
            return 0.0;
        }
        let forward = self.velocity_boat(a, aws);
        if forward == 0.0 {
            return 0.0;
        }
        let slip = self.leeway_coefficient * (a / 2.0).cos() * (aws.max(0.0) / self.eta).sqrt();
        slip.atan2(forward)
    }

    /// Index of the first switch rule admitting the conditions.
    ///
    /// `heading` is in degrees and folded so both tacks behave alike. `None`
    /// means keep the current plan.
    pub fn try_switch_boat_plan(
        &self,
        vw: f64,
        heading: f64,
        wave_height: f64,
        daylight: &DaylightContext,
    ) -> Option<usize> {
        let heading = off_wind(heading);
        let found = self
            .switch_plans
            .iter()
            .position(|rule| rule.admits(self.switch_matching, vw, heading, wave_height, daylight));
        log::trace!(
            "plan '{}': switch scan vw={vw:.2} heading={heading:.1} waves={wave_height:.2} -> {found:?}",
            self.name
        );
        found
    }

    /// [`Self::try_switch_boat_plan`] with the `-1` sentinel for no match.
    pub fn try_switch_boat_plan_index(
        &self,
        vw: f64,
        heading: f64,
        wave_height: f64,
        daylight: &DaylightContext,
    ) -> i32 {
        self.try_switch_boat_plan(vw, heading, wave_height, daylight)
            .map_or(-1, |i| i as i32)
    }

    /// Check coefficients and that every switch rule points at an existing plan.
    pub fn validate(&self, plan_count: usize) -> Result<(), PlanError> {
        for (field, value) in [
            ("eta", self.eta),
            ("luff_angle_deg", self.luff_angle_deg),
            ("leeway_coefficient", self.leeway_coefficient),
        ] {
            if !value.is_finite() {
                return Err(PlanError::NonFinite {
                    plan: self.name.clone(),
                    field,
                });
            }
        }
        if !(0.0..=180.0).contains(&self.luff_angle_deg) {
            return Err(PlanError::LuffAngleOutOfRange {
                plan: self.name.clone(),
                angle: self.luff_angle_deg,
            });
        }
        for (rule, switch) in self.switch_plans.iter().enumerate() {
            if switch.plan_index >= plan_count {
                return Err(PlanError::SwitchTargetOutOfRange {
                    plan: self.name.clone(),
                    rule,
                    target: switch.plan_index,
                    count: plan_count,
                });
            }
        }
        Ok(())
    }
}

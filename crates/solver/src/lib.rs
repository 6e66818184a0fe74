//! Steady-state boat speed for a given true wind.
//!
//! The boat starts at rest facing the true wind angle. Each iteration asks the
//! sail model for the speed the apparent wind can drive, subtracts hull drag,
//! and low-pass filters the resulting acceleration into the speed estimate.
//! The apparent wind is then recomputed from the new speed and the loop
//! repeats until the acceleration vanishes.
//!
//! Oscillation is damped by a bucket: speed samples taken while decelerating
//! are accumulated, and once the bucket is full its average is the answer.

use sail_hull::Boat;
use sail_plan::BoatPlan;
use sail_wind::{apparent_wind_direction, apparent_wind_speed, fold_angle, tack_sign};
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_TOLERANCE: f64 = 1e-2;
pub const DEFAULT_BUCKET_SIZE: usize = 128;
pub const DEFAULT_MAX_ITERATIONS: usize = DEFAULT_BUCKET_SIZE * 64;

/// Iteration controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    /// Low-pass factor applied to each acceleration step.
    pub learning_rate: f64,
    /// Acceleration (and learning rate) below which the speed is settled.
    pub tolerance: f64,
    /// Decelerating samples averaged before convergence is forced.
    pub bucket_size: usize,
    /// Hard bound on iterations.
    pub max_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            tolerance: DEFAULT_TOLERANCE,
            bucket_size: DEFAULT_BUCKET_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("learning rate must lie in (0, 1] (got {0})")]
    LearningRate(f64),
    #[error("tolerance must be positive and finite (got {0})")]
    Tolerance(f64),
    #[error("bucket size must be at least 1")]
    EmptyBucket,
    #[error("iteration limit must be at least the bucket size ({bucket_size})")]
    IterationLimit { bucket_size: usize },
}

impl SolverSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(SettingsError::LearningRate(self.learning_rate));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(SettingsError::Tolerance(self.tolerance));
        }
        if self.bucket_size == 0 {
            return Err(SettingsError::EmptyBucket);
        }
        if self.max_iterations < self.bucket_size {
            return Err(SettingsError::IterationLimit {
                bucket_size: self.bucket_size,
            });
        }
        Ok(())
    }
}

/// How the solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SteadyStateOutcome {
    /// Acceleration fell below tolerance.
    Converged,
    /// The deceleration bucket filled; speed is the bucket average.
    Averaged,
    /// Iteration bound hit; speed is the bucket average or the last estimate.
    IterationLimit,
    /// No true wind.
    Calm,
    /// The sails cannot drive on this heading (luffing or degenerate plan).
    CannotSail,
    /// Drag or sail force evaluated to NaN, e.g. stale drag coefficients.
    NumericalFailure,
}

impl SteadyStateOutcome {
    /// Whether the boat actually sails in this state.
    pub fn is_sailing(self) -> bool {
        matches!(self, Self::Converged | Self::Averaged | Self::IterationLimit)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::Averaged => "averaged",
            Self::IterationLimit => "iteration_limit",
            Self::Calm => "calm",
            Self::CannotSail => "cannot_sail",
            Self::NumericalFailure => "numerical_failure",
        }
    }
}

/// Result of a steady-state solve. Angles in radians, speeds in knots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyState {
    /// Speed through water, never negative.
    pub stw: f64,
    /// True wind angle of the track through water (heading angle plus leeway),
    /// signed like the input angle: negative on port tack.
    pub ctw: f64,
    /// Apparent wind angle off the bow.
    pub awa: f64,
    /// Apparent wind speed.
    pub aws: f64,
    /// Angle between heading and track through water.
    pub leeway: f64,
    pub iterations: usize,
    pub outcome: SteadyStateOutcome,
}

impl SteadyState {
    fn stopped(awa: f64, aws: f64, iterations: usize, outcome: SteadyStateOutcome) -> Self {
        Self {
            stw: 0.0,
            ctw: 0.0,
            awa,
            aws,
            leeway: 0.0,
            iterations,
            outcome,
        }
    }
}

/// Solve for the steady-state speed with the default settings.
pub fn boat_steady_state(plan: &BoatPlan, boat: &Boat, w: f64, vw: f64) -> SteadyState {
    steady_state(plan, boat, w, vw, &SolverSettings::default())
}

/// Solve for the steady-state speed through water.
///
/// `w` is the true wind angle off the bow in radians (either tack) and `vw`
/// the true wind speed in knots. The solve runs on the folded angle, so both
/// tacks give the same speed; only `ctw` carries the tack's sign. The boat's
/// drag coefficients are read as cached; a stale boat ends in
/// [`SteadyStateOutcome::NumericalFailure`].
///
/// The loop stops after `settings.max_iterations`. The result is then tagged
/// [`SteadyStateOutcome::IterationLimit`] and its speed is a partial average
/// of the decelerating samples seen so far, or the last estimate if there
/// were none.
pub fn steady_state(
    plan: &BoatPlan,
    boat: &Boat,
    w: f64,
    vw: f64,
    settings: &SolverSettings,
) -> SteadyState {
    if !w.is_finite() || !vw.is_finite() {
        log::warn!("plan '{}': non-finite true wind (w={w}, vw={vw})", plan.name);
        return SteadyState::stopped(0.0, 0.0, 0, SteadyStateOutcome::NumericalFailure);
    }
    let tack = tack_sign(w);
    let w = fold_angle(w);
    if vw <= 0.0 {
        return SteadyState::stopped(w, 0.0, 0, SteadyStateOutcome::Calm);
    }

    let lp = settings.learning_rate;
    let tolerance = settings.tolerance;
    let bucket_size = settings.bucket_size.max(1);

    // Start at rest: the apparent wind is the true wind.
    let mut stw = 0.0;
    let mut a = w;
    let mut aws = vw;

    let mut bucket = 0.0;
    let mut bucket_count = 0usize;

    for iteration in 1..=settings.max_iterations {
        let v = plan.velocity_boat(a, aws);
        if v == 0.0 {
            log::debug!(
                "plan '{}': cannot sail at w={:.1}° (awa={:.1}°)",
                plan.name,
                w.to_degrees(),
                a.to_degrees()
            );
            return SteadyState::stopped(a, aws, iteration, SteadyStateOutcome::CannotSail);
        }

        let drag = boat.friction_drag(stw) + boat.wake_drag(stw);
        if drag.is_nan() || !v.is_finite() {
            log::warn!(
                "plan '{}': numerical failure at stw={stw:.3} (drag={drag}, v={v}); stale drag coefficients?",
                plan.name
            );
            return SteadyState::stopped(a, aws, iteration, SteadyStateOutcome::NumericalFailure);
        }
        let mut accel = v - stw - drag;

        let mut outcome = SteadyStateOutcome::Converged;
        if bucket_count == bucket_size {
            stw = bucket / bucket_size as f64;
            accel = 0.0;
            outcome = SteadyStateOutcome::Averaged;
        }

        if accel.abs() < tolerance || lp < tolerance {
            return settle(plan, tack, w, stw, a, aws, iteration, outcome);
        }

        if accel < 0.0 {
            bucket += stw;
            bucket_count += 1;
        }

        stw = (1.0 - lp) * stw + lp * (stw + accel);
        aws = apparent_wind_speed(stw, w, vw);
        a = apparent_wind_direction(aws, stw, w, vw);

        log::trace!(
            "iteration {iteration}: stw={stw:.4} accel={accel:.4} awa={:.2}° aws={aws:.3}",
            a.to_degrees()
        );
    }

    let estimate = if bucket_count > 0 {
        bucket / bucket_count as f64
    } else {
        stw
    };
    log::warn!(
        "plan '{}': no steady state after {} iterations at w={:.1}°, vw={vw:.1}",
        plan.name,
        settings.max_iterations,
        w.to_degrees()
    );
    settle(
        plan,
        tack,
        w,
        estimate,
        a,
        aws,
        settings.max_iterations,
        SteadyStateOutcome::IterationLimit,
    )
}

#[allow(clippy::too_many_arguments)]
fn settle(
    plan: &BoatPlan,
    tack: f64,
    w: f64,
    stw: f64,
    a: f64,
    aws: f64,
    iterations: usize,
    outcome: SteadyStateOutcome,
) -> SteadyState {
    // No sailing backwards.
    let stw = stw.max(0.0);
    let leeway = plan.angle_of_attack(a, aws);
    log::debug!(
        "plan '{}': {} after {iterations} iterations, stw={stw:.3} awa={:.1}° aws={aws:.2}",
        plan.name,
        outcome.label(),
        a.to_degrees()
    );
    SteadyState {
        stw,
        ctw: tack * (w + leeway),
        awa: a,
        aws,
        leeway,
        iterations,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sail_hull::{HullDimensions, HullType};

    fn boat() -> Boat {
        Boat::new(HullDimensions {
            hull_type: HullType::Monohull,
            lwl_ft: 30.0,
            loa_ft: 34.0,
            beam_ft: 10.5,
            displacement_tons: 5.0,
            sail_area_ft2: 520.0,
        })
    }

    fn plan() -> BoatPlan {
        BoatPlan::new("main and genoa", 1.0, 30.0)
    }

    #[test]
    fn beam_reach_converges_below_wind_speed() {
        let w = 90f64.to_radians();
        let state = boat_steady_state(&plan(), &boat(), w, 15.0);
        assert_eq!(state.outcome, SteadyStateOutcome::Converged);
        assert!(state.stw > 0.5 && state.stw < 15.0, "stw = {}", state.stw);
        assert!((state.stw - 2.03).abs() < 0.1, "stw = {}", state.stw);
        assert_eq!(state.leeway, 0.0);
        assert_eq!(state.ctw, w);
        assert!(state.awa < w && state.aws > 15.0);
    }

    #[test]
    fn head_to_wind_cannot_sail() {
        let state = boat_steady_state(&plan(), &boat(), 10f64.to_radians(), 15.0);
        assert_eq!(state.outcome, SteadyStateOutcome::CannotSail);
        assert_eq!(state.stw, 0.0);
        assert_eq!(state.ctw, 0.0);
        assert_eq!(state.iterations, 1);
    }

    #[test]
    fn calm_is_distinguished_from_cannot_sail() {
        let state = boat_steady_state(&plan(), &boat(), 90f64.to_radians(), 0.0);
        assert_eq!(state.outcome, SteadyStateOutcome::Calm);
        assert_eq!(state.stw, 0.0);
    }

    #[test]
    fn stale_drag_is_a_numerical_failure() {
        let mut b = boat();
        b.set_displacement_tons(6.0);
        let state = boat_steady_state(&plan(), &b, 90f64.to_radians(), 15.0);
        assert_eq!(state.outcome, SteadyStateOutcome::NumericalFailure);
        assert_eq!(state.stw, 0.0);

        b.recompute_drag();
        let state = boat_steady_state(&plan(), &b, 90f64.to_radians(), 15.0);
        assert!(state.outcome.is_sailing());
    }

    #[test]
    fn port_tack_mirrors_starboard() {
        let stbd = boat_steady_state(&plan(), &boat(), 120f64.to_radians(), 12.0);
        let port = boat_steady_state(&plan(), &boat(), -120f64.to_radians(), 12.0);
        assert!((stbd.stw - port.stw).abs() < 1e-9);
    }

    #[test]
    fn port_tack_course_keeps_its_sign() {
        let w = 60f64.to_radians();
        let port = boat_steady_state(&plan(), &boat(), -w, 15.0);
        assert!(port.outcome.is_sailing());
        assert!((port.ctw + w).abs() < 1e-12, "ctw = {}", port.ctw);

        let mut p = plan();
        p.leeway_coefficient = 0.15;
        let stbd = boat_steady_state(&p, &boat(), w, 15.0);
        let port = boat_steady_state(&p, &boat(), -w, 15.0);
        assert!(port.ctw < 0.0, "ctw = {}", port.ctw);
        assert!((port.ctw + stbd.ctw).abs() < 1e-9);
        assert!((port.ctw + w + port.leeway).abs() < 1e-12);

        // Past a full turn still counts as port.
        let wrapped = boat_steady_state(&p, &boat(), 2.0 * std::f64::consts::PI - w, 15.0);
        assert!((wrapped.ctw - port.ctw).abs() < 1e-9);
    }

    #[test]
    fn forced_average_after_full_bucket() {
        // A single-sample bucket fills on the first overshoot.
        let settings = SolverSettings {
            learning_rate: 1.0,
            tolerance: 1e-9,
            bucket_size: 1,
            max_iterations: 1_000,
        };
        let state = steady_state(&plan(), &boat(), 90f64.to_radians(), 15.0, &settings);
        assert_eq!(state.outcome, SteadyStateOutcome::Averaged);
        assert!(state.stw >= 0.0);
    }

    #[test]
    fn iteration_cap_reports_partial_result() {
        // Five steps are still accelerating from rest, so the bucket is empty.
        let settings = SolverSettings {
            learning_rate: 0.1,
            tolerance: 1e-2,
            bucket_size: 1,
            max_iterations: 5,
        };
        let w = 90f64.to_radians();
        let state = steady_state(&plan(), &boat(), w, 15.0, &settings);
        assert_eq!(state.outcome, SteadyStateOutcome::IterationLimit);
        assert!(state.outcome.is_sailing());
        assert_eq!(state.iterations, 5);
        assert!(state.stw > 0.0);
        let full = boat_steady_state(&plan(), &boat(), w, 15.0);
        assert!(state.stw < full.stw);
    }

    #[test]
    fn settings_validation() {
        assert!(SolverSettings::default().validate().is_ok());
        let mut s = SolverSettings::default();
        s.learning_rate = 0.0;
        assert_eq!(s.validate(), Err(SettingsError::LearningRate(0.0)));
        let mut s = SolverSettings::default();
        s.bucket_size = 0;
        assert_eq!(s.validate(), Err(SettingsError::EmptyBucket));
        let mut s = SolverSettings::default();
        s.max_iterations = 10;
        assert!(matches!(s.validate(), Err(SettingsError::IterationLimit { .. })));
    }

    #[test]
    fn leeway_shifts_course_through_water() {
        let mut p = plan();
        p.leeway_coefficient = 0.15;
        let w = 60f64.to_radians();
        let state = boat_steady_state(&p, &boat(), w, 15.0);
        assert!(state.outcome.is_sailing());
        assert!(state.leeway > 0.0);
        assert!((state.ctw - (w + state.leeway)).abs() < 1e-12);
    }
}

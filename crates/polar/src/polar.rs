//! Polar tables: steady-state speed swept over true wind angle and speed.

use std::cmp::Ordering;

use sail_solver::SteadyStateOutcome;
use serde::Serialize;
use thiserror::Error;

use crate::facade::vessel::{Vessel, VesselError};

/// Wind speeds (knots) of the standard polar grid.
pub const STANDARD_WIND_SPEEDS_KN: [f64; 9] = [4.0, 6.0, 8.0, 10.0, 12.0, 15.0, 20.0, 25.0, 30.0];
/// Angle step (degrees) of the standard polar grid.
pub const STANDARD_ANGLE_STEP_DEG: f64 = 5.0;

#[derive(Debug, Error)]
pub enum PolarError {
    #[error("polar grid has no {0}")]
    EmptyGrid(&'static str),
    #[error("polar grid value {value} for {field} is not finite")]
    NonFinite { field: &'static str, value: f64 },
    #[error("angle step must be positive and at most 180 degrees (got {0})")]
    InvalidStep(f64),
    #[error(transparent)]
    Vessel(#[from] VesselError),
}

/// Grid of true wind angles (degrees off the bow) and speeds (knots).
#[derive(Debug, Clone, PartialEq)]
pub struct PolarRequest {
    pub wind_angles_deg: Vec<f64>,
    pub wind_speeds_kn: Vec<f64>,
}

impl PolarRequest {
    /// 0..=180 degrees every 5 degrees, over the standard wind speeds.
    pub fn standard() -> Self {
        Self {
            wind_angles_deg: angle_sweep(STANDARD_ANGLE_STEP_DEG),
            wind_speeds_kn: STANDARD_WIND_SPEEDS_KN.to_vec(),
        }
    }

    /// Standard wind speeds with a custom angle step. 180 is always included.
    pub fn with_angle_step(step_deg: f64) -> Result<Self, PolarError> {
        if !(step_deg > 0.0 && step_deg <= 180.0) {
            return Err(PolarError::InvalidStep(step_deg));
        }
        Ok(Self {
            wind_angles_deg: angle_sweep(step_deg),
            wind_speeds_kn: STANDARD_WIND_SPEEDS_KN.to_vec(),
        })
    }

    fn validate(&self) -> Result<(), PolarError> {
        if self.wind_angles_deg.is_empty() {
            return Err(PolarError::EmptyGrid("wind angles"));
        }
        if self.wind_speeds_kn.is_empty() {
            return Err(PolarError::EmptyGrid("wind speeds"));
        }
        let values = self
            .wind_angles_deg
            .iter()
            .map(|v| ("wind angle", *v))
            .chain(self.wind_speeds_kn.iter().map(|v| ("wind speed", *v)));
        for (field, value) in values {
            if !value.is_finite() {
                return Err(PolarError::NonFinite { field, value });
            }
        }
        Ok(())
    }
}

fn angle_sweep(step_deg: f64) -> Vec<f64> {
    let mut angles = Vec::new();
    let mut index = 0u32;
    loop {
        let angle = f64::from(index) * step_deg;
        if angle >= 180.0 - 1e-9 {
            break;
        }
        angles.push(angle);
        index += 1;
    }
    angles.push(180.0);
    angles
}

/// One solved grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarPoint {
    pub wind_angle_deg: f64,
    pub wind_speed_kn: f64,
    pub stw_kn: f64,
    pub ctw_deg: f64,
    pub awa_deg: f64,
    pub aws_kn: f64,
    /// Speed made good toward (positive) or away from (negative) the wind.
    pub vmg_kn: f64,
    pub outcome: SteadyStateOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolarTable {
    pub vessel: String,
    pub plan: String,
    pub points: Vec<PolarPoint>,
}

impl PolarTable {
    /// Speed through water at an exact grid point.
    pub fn speed(&self, wind_angle_deg: f64, wind_speed_kn: f64) -> Option<f64> {
        self.points
            .iter()
            .find(|p| {
                (p.wind_angle_deg - wind_angle_deg).abs() < 1e-9
                    && (p.wind_speed_kn - wind_speed_kn).abs() < 1e-9
            })
            .map(|p| p.stw_kn)
    }

    /// Grid points at one wind speed, in sweep order.
    pub fn at_wind_speed(&self, wind_speed_kn: f64) -> impl Iterator<Item = &PolarPoint> {
        self.points
            .iter()
            .filter(move |p| (p.wind_speed_kn - wind_speed_kn).abs() < 1e-9)
    }

    /// Distinct wind speeds in first-seen order.
    pub fn wind_speeds(&self) -> Vec<f64> {
        let mut speeds: Vec<f64> = Vec::new();
        for point in &self.points {
            if !speeds.iter().any(|s| (s - point.wind_speed_kn).abs() < 1e-9) {
                speeds.push(point.wind_speed_kn);
            }
        }
        speeds
    }

    /// Sailing point with the largest positive VMG at this wind speed.
    pub fn best_upwind_vmg(&self, wind_speed_kn: f64) -> Option<&PolarPoint> {
        self.at_wind_speed(wind_speed_kn)
            .filter(|p| p.outcome.is_sailing() && p.vmg_kn > 0.0)
            .max_by(|a, b| a.vmg_kn.partial_cmp(&b.vmg_kn).unwrap_or(Ordering::Equal))
    }

    /// Sailing point with the most negative VMG at this wind speed.
    pub fn best_downwind_vmg(&self, wind_speed_kn: f64) -> Option<&PolarPoint> {
        self.at_wind_speed(wind_speed_kn)
            .filter(|p| p.outcome.is_sailing() && p.vmg_kn < 0.0)
            .min_by(|a, b| a.vmg_kn.partial_cmp(&b.vmg_kn).unwrap_or(Ordering::Equal))
    }
}

/// Solve every grid point of `request` with plan `plan_index` of `vessel`.
///
/// Points are ordered by wind speed, then angle.
pub fn generate_polar(
    vessel: &Vessel,
    plan_index: usize,
    request: &PolarRequest,
) -> Result<PolarTable, PolarError> {
    request.validate()?;
    let plan = vessel.plan(plan_index)?;

    let mut points = Vec::with_capacity(request.wind_angles_deg.len() * request.wind_speeds_kn.len());
    for &vw in &request.wind_speeds_kn {
        for &angle in &request.wind_angles_deg {
            let w = angle.to_radians();
            let state = vessel.solve(plan_index, w, vw)?;
            // Made good along the track through water, not the heading.
            let vmg = if state.outcome.is_sailing() {
                state.stw * state.ctw.cos()
            } else {
                0.0
            };
            points.push(PolarPoint {
                wind_angle_deg: angle,
                wind_speed_kn: vw,
                stw_kn: state.stw,
                ctw_deg: state.ctw.to_degrees(),
                awa_deg: state.awa.to_degrees(),
                aws_kn: state.aws,
                vmg_kn: vmg,
                outcome: state.outcome,
            });
        }
    }

    let sailing = points.iter().filter(|p| p.outcome.is_sailing()).count();
    log::info!(
        "polar for '{}' / '{}': {} points, {sailing} sailing",
        vessel.name,
        plan.name,
        points.len()
    );

    Ok(PolarTable {
        vessel: vessel.name.clone(),
        plan: plan.name.clone(),
        points,
    })
}

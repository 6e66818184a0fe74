//! Switch rules: conditions under which another boat plan takes over.

use serde::{Deserialize, Serialize};

use crate::daylight::DaylightContext;

/// How a rule's min/max bounds are compared against the conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchMatching {
    /// A rule admits conditions inside its inclusive `[min, max]` windows.
    #[default]
    Window,
    /// Historical comparisons: a rule is skipped when `max >= x` or `min <= x`,
    /// so it only admits values above its max and below its min.
    Legacy,
}

/// One conditional rule pointing at an alternate plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchPlan {
    /// Index of the plan to activate, within the owning vessel's plans.
    pub plan_index: usize,
    #[serde(default)]
    pub min_wind_speed: f64,
    #[serde(default = "unbounded")]
    pub max_wind_speed: f64,
    /// Degrees off the bow, tack-symmetric (0..=180).
    #[serde(default)]
    pub min_wind_direction: f64,
    #[serde(default = "half_turn")]
    pub max_wind_direction: f64,
    #[serde(default)]
    pub min_wave_height: f64,
    #[serde(default = "unbounded")]
    pub max_wave_height: f64,
    #[serde(default = "yes")]
    pub day_time: bool,
    #[serde(default = "yes")]
    pub night_time: bool,
}

fn unbounded() -> f64 {
    f64::INFINITY
}

fn half_turn() -> f64 {
    180.0
}

fn yes() -> bool {
    true
}

impl SwitchPlan {
    /// A rule admitting every condition, day and night.
    pub fn always(plan_index: usize) -> Self {
        Self {
            plan_index,
            min_wind_speed: 0.0,
            max_wind_speed: unbounded(),
            min_wind_direction: 0.0,
            max_wind_direction: half_turn(),
            min_wave_height: 0.0,
            max_wave_height: unbounded(),
            day_time: true,
            night_time: true,
        }
    }

    /// Whether this rule admits the conditions.
    ///
    /// `heading` must already be folded onto 0..=180. Daylight is only
    /// consulted when the rule excludes day or night.
    pub fn admits(
        &self,
        matching: SwitchMatching,
        vw: f64,
        heading: f64,
        wave_height: f64,
        daylight: &DaylightContext,
    ) -> bool {
        let inside = match matching {
            SwitchMatching::Window => {
                within(vw, self.min_wind_speed, self.max_wind_speed)
                    && within(heading, self.min_wind_direction, self.max_wind_direction)
                    && within(wave_height, self.min_wave_height, self.max_wave_height)
            }
            SwitchMatching::Legacy => {
                legacy_admits(vw, self.min_wind_speed, self.max_wind_speed)
                    && legacy_admits(heading, self.min_wind_direction, self.max_wind_direction)
                    && legacy_admits(wave_height, self.min_wave_height, self.max_wave_height)
            }
        };
        if !inside {
            return false;
        }

        if !self.day_time {
            !daylight.is_day()
        } else if !self.night_time {
            daylight.is_day()
        } else {
            true
        }
    }
}

// Both comparisons are written so that NaN is never admitted.
fn within(x: f64, min: f64, max: f64) -> bool {
    x >= min && x <= max
}

fn legacy_admits(x: f64, min: f64, max: f64) -> bool {
    x > max && x < min
}

//! Re-exported APIs for consumers of the polar crate.

pub use crate::polar::{PolarError, PolarPoint, PolarRequest, PolarTable, generate_polar};
pub use self::vessel::{Vessel, VesselError};
pub use sail_hull::{Boat, HullDimensions, HullType};
pub use sail_plan::{BoatPlan, DaylightContext, SwitchMatching, SwitchPlan};
pub use sail_solver::{SolverSettings, SteadyState, SteadyStateOutcome};

pub mod vessel {
    use sail_config::{PlanConfig, SolverConfig, VesselConfig};
    use sail_hull::{Boat, HullError};
    use sail_plan::{BoatPlan, DaylightContext, PlanError, SwitchMatching};
    use sail_solver::{SettingsError, SolverSettings, SteadyState, steady_state};
    use thiserror::Error;

    /// Errors surfaced when converting or using vessels.
    #[derive(Debug, Error)]
    pub enum VesselError {
        #[error("vessel '{0}' has no sail plans")]
        NoPlans(String),
        #[error("plan index {index} out of range ({count} plans)")]
        PlanOutOfRange { index: usize, count: usize },
        #[error("invalid hull: {0}")]
        Hull(#[from] HullError),
        #[error("invalid plan: {0}")]
        Plan(#[from] PlanError),
        #[error("invalid solver settings: {0}")]
        Settings(#[from] SettingsError),
        #[error("vessel '{0}' not found in catalog")]
        NotFound(String),
        #[error("vessel catalog is empty")]
        EmptyCatalog,
    }

    /// A boat with its sail plans and solver settings.
    #[derive(Debug, Clone)]
    pub struct Vessel {
        pub name: String,
        pub boat: Boat,
        pub plans: Vec<BoatPlan>,
        pub settings: SolverSettings,
    }

    impl Vessel {
        pub fn plan(&self, index: usize) -> Result<&BoatPlan, VesselError> {
            self.plans.get(index).ok_or(VesselError::PlanOutOfRange {
                index,
                count: self.plans.len(),
            })
        }

        /// Solve the steady state for plan `plan_index`.
        ///
        /// `w` is the true wind angle off the bow in radians, `vw` in knots.
        pub fn solve(&self, plan_index: usize, w: f64, vw: f64) -> Result<SteadyState, VesselError> {
            let plan = self.plan(plan_index)?;
            Ok(steady_state(plan, &self.boat, w, vw, &self.settings))
        }

        /// Plan to use under the given conditions, starting from `current`.
        ///
        /// Follows the first admitting switch rule of the current plan, or
        /// keeps the current plan when none admits.
        pub fn select_plan(
            &self,
            current: usize,
            vw: f64,
            heading: f64,
            wave_height: f64,
            daylight: &DaylightContext,
        ) -> Result<usize, VesselError> {
            let plan = self.plan(current)?;
            match plan.try_switch_boat_plan(vw, heading, wave_height, daylight) {
                Some(rule) => {
                    let target = plan.switch_plans[rule].plan_index;
                    self.plan(target)?;
                    log::debug!(
                        "vessel '{}': rule {rule} of '{}' selects '{}'",
                        self.name,
                        plan.name,
                        self.plans[target].name
                    );
                    Ok(target)
                }
                None => Ok(current),
            }
        }
    }

    /// Convert a `VesselConfig` into the runtime `Vessel`, validating it on the way.
    pub fn from_config(config: &VesselConfig) -> Result<Vessel, VesselError> {
        config.boat.validate()?;
        if config.plans.is_empty() {
            return Err(VesselError::NoPlans(config.name.clone()));
        }

        let plans: Vec<BoatPlan> = config
            .plans
            .iter()
            .map(|plan| plan_from_config(plan, config.switch_matching))
            .collect();
        for plan in &plans {
            plan.validate(plans.len())?;
        }

        let settings = settings_from_config(&config.solver);
        settings.validate()?;

        Ok(Vessel {
            name: config.name.clone(),
            boat: Boat::new(config.boat),
            plans,
            settings,
        })
    }

    /// Select a vessel from the catalog by optional name, defaulting to the first entry.
    pub fn select(configs: &[VesselConfig], requested: Option<&str>) -> Result<Vessel, VesselError> {
        if configs.is_empty() {
            return Err(VesselError::EmptyCatalog);
        }

        let chosen = if let Some(name) = requested {
            sail_config::find_vessel(configs, name)
                .ok_or_else(|| VesselError::NotFound(name.to_string()))?
        } else {
            &configs[0]
        };

        from_config(chosen)
    }

    fn plan_from_config(config: &PlanConfig, default_matching: SwitchMatching) -> BoatPlan {
        BoatPlan {
            name: config.name.clone(),
            eta: config.eta,
            luff_angle_deg: config.luff_angle_deg,
            wing_wing_running: config.wing_wing_running,
            leeway_coefficient: config.leeway_coefficient,
            switch_matching: config.switch_matching.unwrap_or(default_matching),
            switch_plans: config.switch_plans.clone(),
        }
    }

    fn settings_from_config(config: &SolverConfig) -> SolverSettings {
        SolverSettings {
            learning_rate: config.learning_rate,
            tolerance: config.tolerance,
            bucket_size: config.bucket_size,
            max_iterations: config.max_iterations,
        }
    }
}

//! Polar façade crate: vessels, polar generation, and the physics crates behind them.

pub mod polar;

pub use facade::*;
pub use sail_hull as hull;
pub use sail_plan as plan;
pub use sail_solver as solver;
pub use sail_wind as wind;

mod facade;

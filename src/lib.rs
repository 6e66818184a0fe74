//! Sailing performance physics: hull drag, sail force, the wind triangle and
//! a steady-state speed solver, plus polar generation on top of them.
//!
//! The library crates stay independent of any front-end; this crate gathers
//! them under one name for the CLI and for integration tests.

pub use sail_config as config;
pub use sail_core::{angle, constants};
pub use sail_export as export;
pub use sail_polar as polar;
pub use sail_polar::{hull, plan, solver, wind};
pub use sail_route as route;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

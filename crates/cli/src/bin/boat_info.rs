use std::path::PathBuf;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use clap::Parser;
use sail_performance_calculator::config::load_vessel_configs;
use sail_performance_calculator::polar::{DaylightContext, vessel};

/// Report hull figures and the recommended sail plan for given conditions.
#[derive(Parser, Debug)]
#[command(author, version, about = "Hull ratios, drag and sail plan recommendation")]
struct Cli {
    /// Vessel file (TOML, YAML list) or directory of TOML files
    #[arg(long, default_value = "configs/vessels")]
    config: PathBuf,

    /// Vessel name (case-insensitive, defaults to the first in the catalog)
    #[arg(long)]
    vessel: Option<String>,

    /// Sail plan currently set
    #[arg(long, default_value_t = 0)]
    plan: usize,

    /// True wind speed in knots
    #[arg(long, default_value_t = 12.0)]
    wind: f64,

    /// True wind angle off the bow in degrees (either tack)
    #[arg(long, default_value_t = 90.0, allow_negative_numbers = true)]
    heading: f64,

    /// Significant wave height in metres
    #[arg(long, default_value_t = 0.0)]
    waves: f64,

    /// Time of the observation (RFC 3339, defaults to now)
    #[arg(long)]
    time: Option<String>,

    /// Latitude in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    lon: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let catalog = load_vessel_configs(&cli.config)?;
    let vessel = vessel::select(&catalog, cli.vessel.as_deref())?;

    let time = match &cli.time {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map_err(|err| anyhow!("invalid --time '{text}': {err}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let daylight = DaylightContext::new(time, cli.lat, cli.lon);

    let hull = vessel.boat.summary();
    println!("=== {} ===", vessel.name);
    println!("Hull type      : {}", vessel.boat.hull_type().label());
    println!(
        "Displacement   : {:.0} lb ({:.2} long tons)",
        hull.displacement_pounds, hull.displacement_long_tons
    );
    println!("D/L ratio      : {:.1}", hull.displacement_length_ratio);
    println!(
        "Hull speed     : {:.2} kn (S/L {:.3})",
        hull.hull_speed_kn, hull.hull_sl_ratio
    );
    println!(
        "Capsize risk   : {:.2}{}",
        hull.capsize_risk,
        if hull.capsize_risk > 2.0 { " (danger)" } else { "" }
    );
    println!("SA/D ratio     : {:.1}", hull.sail_area_displacement_ratio);
    println!("Comfort factor : {:.1}", hull.comfort_factor);
    match vessel.boat.drag_coefficients() {
        Some(drag) => println!(
            "Drag coeffs    : frictional = {:.6}, wake = {:.4}",
            drag.frictional, drag.wake
        ),
        None => eprintln!("[warn] drag coefficients are stale"),
    }

    let current = vessel.plan(cli.plan)?;
    let selected = vessel.select_plan(cli.plan, cli.wind, cli.heading, cli.waves, &daylight)?;
    println!();
    println!(
        "Conditions     : {:.1} kn at {:.0}°, waves {:.1} m, {} ({})",
        cli.wind,
        cli.heading,
        cli.waves,
        time.format("%Y-%m-%d %H:%M UTC"),
        if daylight.is_resolved() {
            if daylight.is_day() { "day" } else { "night" }
        } else {
            "daylight not needed"
        }
    );
    if selected == cli.plan {
        println!("Sail plan      : keep '{}'", current.name);
    } else {
        println!(
            "Sail plan      : switch '{}' -> '{}'",
            current.name, vessel.plans[selected].name
        );
    }

    let state = vessel.solve(selected, cli.heading.to_radians(), cli.wind)?;
    if state.outcome.is_sailing() {
        println!(
            "Steady state   : {:.2} kn through water, AWA {:.1}°, AWS {:.2} kn, leeway {:.1}° ({})",
            state.stw,
            state.awa.to_degrees(),
            state.aws,
            state.leeway.to_degrees(),
            state.outcome.label()
        );
    } else {
        println!("Steady state   : not sailing ({})", state.outcome.label());
    }

    Ok(())
}

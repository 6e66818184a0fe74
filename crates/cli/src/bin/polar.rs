use std::io::Write;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use sail_performance_calculator::config::load_vessel_configs;
use sail_performance_calculator::export::polar as export_polar;
use sail_performance_calculator::export::summary::{self, HullFigures, PolarSummary, VmgEntry};
use sail_performance_calculator::polar::{
    PolarRequest, PolarTable, SteadyStateOutcome, Vessel, generate_polar, vessel,
};

/// Sweep the steady-state solver over true wind angle and speed for one sail plan.
#[derive(Parser, Debug)]
#[command(author, version, about = "Polar table generator")]
struct Cli {
    /// Vessel file (TOML, YAML list) or directory of TOML files
    #[arg(long, default_value = "configs/vessels")]
    config: PathBuf,

    /// Vessel name (case-insensitive, defaults to the first in the catalog)
    #[arg(long)]
    vessel: Option<String>,

    /// Sail plan index within the vessel
    #[arg(long, default_value_t = 0)]
    plan: usize,

    /// True wind angle step in degrees
    #[arg(long, default_value_t = 5.0)]
    angle_step: f64,

    /// Comma-separated true wind speeds in knots (defaults to the standard set)
    #[arg(long, value_delimiter = ',')]
    speeds: Option<Vec<f64>>,

    /// Output CSV file (use '-' for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Output JSON summary file
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let catalog = load_vessel_configs(&cli.config)?;
    let vessel = vessel::select(&catalog, cli.vessel.as_deref())?;

    let mut request = PolarRequest::with_angle_step(cli.angle_step)?;
    if let Some(speeds) = &cli.speeds {
        if speeds.is_empty() {
            return Err(anyhow!("--speeds needs at least one value"));
        }
        request.wind_speeds_kn = speeds.clone();
    }

    let table = generate_polar(&vessel, cli.plan, &request)?;
    let csv_to_stdout = cli.csv.as_deref().is_some_and(|p| p.as_os_str() == "-");

    if let Some(path) = &cli.csv {
        let mut writer = export_polar::writer_for_path(path)?;
        export_polar::write_header(writer.as_mut())?;
        for point in &table.points {
            let record = export_polar::Record {
                vessel: &table.vessel,
                plan: &table.plan,
                wind_speed_kn: point.wind_speed_kn,
                wind_angle_deg: point.wind_angle_deg,
                stw_kn: point.stw_kn,
                ctw_deg: point.ctw_deg,
                awa_deg: point.awa_deg,
                aws_kn: point.aws_kn,
                vmg_kn: point.vmg_kn,
                outcome: point.outcome.label(),
            };
            record.write_to(writer.as_mut())?;
        }
        writer.flush()?;
    }

    if let Some(path) = &cli.json {
        summary::write_json(path, &build_summary(&vessel, &table))?;
    }

    if !csv_to_stdout {
        print_table(&table, &request);
    }

    let stalled = table
        .points
        .iter()
        .filter(|p| p.outcome == SteadyStateOutcome::IterationLimit)
        .count();
    if stalled > 0 {
        eprintln!("[warn] {stalled} grid points hit the iteration limit");
    }

    Ok(())
}

fn print_table(table: &PolarTable, request: &PolarRequest) {
    println!("=== Polar: {} / {} ===", table.vessel, table.plan);
    print!("TWA \\ TWS");
    for speed in &request.wind_speeds_kn {
        print!("{:>7.1}", speed);
    }
    println!();

    for angle in &request.wind_angles_deg {
        print!("{:>9.1}", angle);
        for speed in &request.wind_speeds_kn {
            match table.speed(*angle, *speed) {
                Some(stw) if stw > 0.0 => print!("{:>7.2}", stw),
                _ => print!("{:>7}", "-"),
            }
        }
        println!();
    }

    println!();
    for speed in &request.wind_speeds_kn {
        let up = table.best_upwind_vmg(*speed);
        let down = table.best_downwind_vmg(*speed);
        println!(
            "TWS {:>5.1} kn : upwind {} | downwind {}",
            speed,
            describe_vmg(up.map(|p| (p.wind_angle_deg, p.vmg_kn))),
            describe_vmg(down.map(|p| (p.wind_angle_deg, p.vmg_kn))),
        );
    }
}

fn describe_vmg(best: Option<(f64, f64)>) -> String {
    match best {
        Some((angle, vmg)) => format!("{:.2} kn @ {:.0}°", vmg.abs(), angle),
        None => "n/a".to_string(),
    }
}

fn build_summary(vessel: &Vessel, table: &PolarTable) -> PolarSummary {
    let hull = vessel.boat.summary();
    let drag = vessel.boat.drag_coefficients();
    let vmg = table
        .wind_speeds()
        .into_iter()
        .map(|speed| {
            let up = table.best_upwind_vmg(speed);
            let down = table.best_downwind_vmg(speed);
            let max_stw = table
                .at_wind_speed(speed)
                .map(|p| p.stw_kn)
                .fold(0.0, f64::max);
            VmgEntry {
                wind_speed_kn: speed,
                upwind_angle_deg: up.map(|p| p.wind_angle_deg),
                upwind_vmg_kn: up.map(|p| p.vmg_kn),
                downwind_angle_deg: down.map(|p| p.wind_angle_deg),
                downwind_vmg_kn: down.map(|p| p.vmg_kn),
                max_stw_kn: max_stw,
            }
        })
        .collect();

    PolarSummary {
        vessel: table.vessel.clone(),
        plan: table.plan.clone(),
        hull: HullFigures {
            hull_type: vessel.boat.hull_type().label().to_string(),
            hull_speed_kn: hull.hull_speed_kn,
            displacement_length_ratio: hull.displacement_length_ratio,
            frictional_drag: drag.map(|d| d.frictional),
            wake_drag: drag.map(|d| d.wake),
        },
        points: table.points.len(),
        sailing_points: table.points.iter().filter(|p| p.outcome.is_sailing()).count(),
        vmg,
    }
}

//! Export helpers for CSV and JSON artifacts.

pub mod polar {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    use csv::ReaderBuilder;
    use thiserror::Error;

    const HEADER: &str = "vessel,plan,wind_speed_kn,wind_angle_deg,stw_kn,ctw_deg,awa_deg,aws_kn,vmg_kn,outcome";

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write the standard polar CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// CSV row emitted by the polar exporter.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub vessel: &'a str,
        pub plan: &'a str,
        pub wind_speed_kn: f64,
        pub wind_angle_deg: f64,
        pub stw_kn: f64,
        pub ctw_deg: f64,
        pub awa_deg: f64,
        pub aws_kn: f64,
        pub vmg_kn: f64,
        pub outcome: &'a str,
    }

    impl<'a> Record<'a> {
        /// Serialize the record to CSV, matching the standard header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{},{:.2},{:.1},{:.4},{:.2},{:.2},{:.4},{:.4},{}",
                quote(self.vessel),
                quote(self.plan),
                self.wind_speed_kn,
                self.wind_angle_deg,
                self.stw_kn,
                self.ctw_deg,
                self.awa_deg,
                self.aws_kn,
                self.vmg_kn,
                self.outcome,
            )
        }
    }

    // Names are free text; everything else is numeric or a fixed label.
    fn quote(field: &str) -> String {
        if field.contains([',', '"', '\n']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    #[derive(Debug, Error)]
    pub enum ReadError {
        #[error("CSV error: {0}")]
        Csv(#[from] csv::Error),
        #[error("CSV missing '{0}' column")]
        MissingColumn(&'static str),
        #[error("row {row}: '{value}' in column '{column}' is not a number")]
        Number {
            row: usize,
            column: &'static str,
            value: String,
        },
    }

    /// One speed sample read back from a polar CSV.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Sample {
        pub wind_speed_kn: f64,
        pub wind_angle_deg: f64,
        pub stw_kn: f64,
    }

    /// Read the wind speed, wind angle and speed columns of a polar CSV.
    pub fn read_samples(path: &Path) -> Result<Vec<Sample>, ReadError> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
        let headers = rdr.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or(ReadError::MissingColumn(name))
        };
        let speed_idx = column("wind_speed_kn")?;
        let angle_idx = column("wind_angle_deg")?;
        let stw_idx = column("stw_kn")?;

        let mut samples = Vec::new();
        for (row, rec) in rdr.records().enumerate() {
            let r = rec?;
            let number = |idx: usize, name: &'static str| -> Result<f64, ReadError> {
                let raw = r.get(idx).unwrap_or_default();
                raw.trim().parse().map_err(|_| ReadError::Number {
                    row: row + 1,
                    column: name,
                    value: raw.to_string(),
                })
            };
            samples.push(Sample {
                wind_speed_kn: number(speed_idx, "wind_speed_kn")?,
                wind_angle_deg: number(angle_idx, "wind_angle_deg")?,
                stw_kn: number(stw_idx, "stw_kn")?,
            });
        }
        Ok(samples)
    }
}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    /// Best VMG angles for one wind speed.
    #[derive(Debug, Clone, Serialize)]
    pub struct VmgEntry {
        pub wind_speed_kn: f64,
        pub upwind_angle_deg: Option<f64>,
        pub upwind_vmg_kn: Option<f64>,
        pub downwind_angle_deg: Option<f64>,
        pub downwind_vmg_kn: Option<f64>,
        pub max_stw_kn: f64,
    }

    /// Hull figures reported alongside a polar.
    #[derive(Debug, Clone, Serialize)]
    pub struct HullFigures {
        pub hull_type: String,
        pub hull_speed_kn: f64,
        pub displacement_length_ratio: f64,
        pub frictional_drag: Option<f64>,
        pub wake_drag: Option<f64>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct PolarSummary {
        pub vessel: String,
        pub plan: String,
        pub hull: HullFigures,
        pub points: usize,
        pub sailing_points: usize,
        pub vmg: Vec<VmgEntry>,
    }

    /// Write a pretty-printed JSON polar summary.
    pub fn write_json(output: &Path, summary: &PolarSummary) -> io::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(File::create(output)?, summary)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::polar::{self, Record};
    use super::summary::{self, HullFigures, PolarSummary, VmgEntry};
    use std::io::Write;

    fn record<'a>(angle: f64, stw: f64) -> Record<'a> {
        Record {
            vessel: "Cruiser, 30",
            plan: "full",
            wind_speed_kn: 12.0,
            wind_angle_deg: angle,
            stw_kn: stw,
            ctw_deg: angle,
            awa_deg: angle - 5.0,
            aws_kn: 13.0,
            vmg_kn: stw * angle.to_radians().cos(),
            outcome: "converged",
        }
    }

    #[test]
    fn csv_rows_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/polar.csv");
        {
            let mut writer = polar::writer_for_path(&path).unwrap();
            polar::write_header(writer.as_mut()).unwrap();
            record(90.0, 2.03).write_to(writer.as_mut()).unwrap();
            record(135.0, 2.5).write_to(writer.as_mut()).unwrap();
            writer.flush().unwrap();
        }

        let samples = polar::read_samples(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].wind_angle_deg, 90.0);
        assert!((samples[0].stw_kn - 2.03).abs() < 1e-9);
        assert_eq!(samples[1].wind_speed_kn, 12.0);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("\"Cruiser, 30\",full,12.00,90.0,"));
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "wind_speed_kn,stw_kn\n10,2\n").unwrap();
        assert!(matches!(
            polar::read_samples(&path),
            Err(polar::ReadError::MissingColumn("wind_angle_deg"))
        ));
    }

    #[test]
    fn summary_json_has_vmg_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summary = PolarSummary {
            vessel: "Cruiser".into(),
            plan: "full".into(),
            hull: HullFigures {
                hull_type: "monohull".into(),
                hull_speed_kn: 9.24,
                displacement_length_ratio: 165.3,
                frictional_drag: Some(0.0129),
                wake_drag: Some(0.758),
            },
            points: 333,
            sailing_points: 270,
            vmg: vec![VmgEntry {
                wind_speed_kn: 12.0,
                upwind_angle_deg: Some(55.0),
                upwind_vmg_kn: Some(1.1),
                downwind_angle_deg: None,
                downwind_vmg_kn: None,
                max_stw_kn: 2.4,
            }],
        };
        summary::write_json(&path, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["vessel"], "Cruiser");
        assert_eq!(value["vmg"][0]["upwind_angle_deg"], 55.0);
        assert!(value["vmg"][0]["downwind_vmg_kn"].is_null());
    }
}

pub mod error;
pub mod export;
pub mod parser;
pub mod sheet;
pub mod view;
pub mod zones;

use crate::error::SheetError;
use crate::sheet::Spreadsheet;
use crate::zones::{group_rows, ZoneReport};
use std::path::Path;

pub const APP_TITLE: &str = "3D Vertex Visualizer for Camera Calibration";

/// Loads a file and groups its rows. A file-level error stops here, before
/// any zone is built.
pub fn load_report(path: &Path, sheet_name: Option<&str>) -> Result<(Spreadsheet, ZoneReport), SheetError> {
    let sheet = Spreadsheet::open(path, sheet_name)?;
    let report = group_rows(&sheet.rows);
    Ok((sheet, report))
}

// Report formatting for the terminal front end, exported for tests
#[cfg(feature = "cli_app")]
pub mod cli_app {
    use crate::parser::Point3;
    use crate::sheet::Spreadsheet;
    use crate::zones::{Zone, ZoneReport};
    use chrono::{DateTime, Local};
    use std::fmt::Write;

    const LINE_W: usize = 6;
    const LABEL_W: usize = 24;
    const POINT_W: usize = 24;

    pub fn format_point(p: &Point3) -> String {
        format!("({}, {}, {})", p[0], p[1], p[2])
    }

    /// Cuts `s` to `width` characters, marking the cut with `~`.
    pub fn fit(s: &str, width: usize) -> String {
        if s.chars().count() <= width {
            s.to_string()
        } else {
            let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
            out.push('~');
            out
        }
    }

    fn write_zone(out: &mut String, zone: &Zone) {
        let _ = writeln!(out, "Zone: {}", zone.name);
        match zone.wireframe() {
            Some(wire) => {
                let _ = writeln!(
                    out,
                    "  {} vertices, {} edges",
                    wire.vertices.len(),
                    wire.edges.len()
                );
                for (i, p) in wire.vertices.iter().enumerate() {
                    let _ = writeln!(out, "  {:<4} {}", i + 1, format_point(p));
                }
                let edges: Vec<String> = wire
                    .edges
                    .iter()
                    .map(|(a, b)| format!("{}-{}", a + 1, b + 1))
                    .collect();
                let _ = writeln!(out, "  edges: {}", edges.join(" "));
            }
            None => {
                if let Some(warning) = zone.warning() {
                    let _ = writeln!(out, "  warning: {}", warning);
                }
            }
        }
        if zone.invalid_count() > 0 {
            let _ = writeln!(out, "  {} invalid row(s)", zone.invalid_count());
        }
    }

    /// Renders the whole report as text.
    pub fn render_report(sheet: &Spreadsheet, report: &ZoneReport, loaded_at: DateTime<Local>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", crate::APP_TITLE);
        let _ = writeln!(
            out,
            "File uploaded successfully! {} ({} rows, {} valid points, {})",
            sheet.source,
            sheet.rows.len(),
            report.valid_point_count(),
            loaded_at.format("%Y-%m-%d %H:%M:%S")
        );

        if report.zones.is_empty() {
            let _ = writeln!(out, "\nNo zones found.");
        }
        for zone in report.zones.values() {
            out.push('\n');
            write_zone(&mut out, zone);
        }

        let invalid = report.invalid_rows();
        if !invalid.is_empty() {
            let _ = writeln!(out, "\nInvalid rows:");
            let _ = writeln!(
                out,
                "  {:<LINE_W$}{:<LABEL_W$}{:<POINT_W$}{}",
                "Row", "Zone name", "Data points", "Reason"
            );
            for row in invalid {
                let _ = writeln!(
                    out,
                    "  {:<LINE_W$}{:<LABEL_W$}{:<POINT_W$}{}",
                    row.line,
                    fit(&row.zone_label, LABEL_W - 1),
                    fit(&row.raw_point, POINT_W - 1),
                    row.reason
                );
            }
        }

        if !report.unmatched.is_empty() {
            let lines: Vec<String> = report.unmatched.iter().map(|r| r.line.to_string()).collect();
            let _ = writeln!(
                out,
                "\n{} row(s) without a '<name> Vertex' label skipped (rows {})",
                report.unmatched.len(),
                lines.join(", ")
            );
        }
        out
    }
}

//! Wavefront OBJ export of zone wireframes.

use crate::error::ExportError;
use crate::zones::ZoneReport;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes every renderable zone as an OBJ object made of one closed line.
///
/// Returns the number of zones written. OBJ indices are 1-based and global
/// across objects.
pub fn write_obj<W: Write>(report: &ZoneReport, out: &mut W) -> std::io::Result<usize> {
    writeln!(out, "# Zone wireframes")?;
    writeln!(out, "# Zones: {}", report.renderable().count())?;

    let mut next_index = 1;
    let mut written = 0;
    for zone in report.renderable() {
        let Some(wire) = zone.wireframe() else {
            continue;
        };
        writeln!(out)?;
        writeln!(out, "o {}", zone.name)?;
        for [x, y, z] in &wire.vertices {
            writeln!(out, "v {} {} {}", x, y, z)?;
        }

        let indices: Vec<String> = wire
            .polyline()
            .iter()
            .enumerate()
            .map(|(i, _)| (next_index + i % wire.vertices.len()).to_string())
            .collect();
        writeln!(out, "l {}", indices.join(" "))?;

        next_index += wire.vertices.len();
        written += 1;
    }
    Ok(written)
}

pub fn save_obj(report: &ZoneReport, path: &Path) -> Result<usize, ExportError> {
    if report.renderable().next().is_none() {
        return Err(ExportError::NothingToExport);
    }
    let write_err = |e| ExportError::Write {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    let written = write_obj(report, &mut writer).map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    info!("Wrote {} zone wireframes to {}", written, path.display());
    Ok(written)
}

//! Grouping of parsed rows into zones.
//!
//! A zone is everything whose "Zone name" label reads `<name> Vertex...`.
//! Points keep the order of the rows they came from; a zone needs at least
//! [`MIN_RENDERABLE_POINTS`] valid points before it is drawn as a closed
//! wireframe.

use crate::error::PointError;
use crate::parser::{parse_coordinates, ParsedPoint, Point3};
use crate::sheet::Row;
use std::collections::BTreeMap;
use std::fmt;

pub const MIN_RENDERABLE_POINTS: usize = 3;

const VERTEX_MARKER: &str = " Vertex";

/// Extracts the zone name from a vertex label.
///
/// `"Front Left Vertex3"` gives `Some("Front Left")`. The prefix before the
/// last `" Vertex"` is trimmed; labels without the marker, or with nothing
/// in front of it, give `None`.
pub fn zone_name(label: &str) -> Option<&str> {
    let idx = label.rfind(VERTEX_MARKER)?;
    let name = label[..idx].trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// A row whose coordinates could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidRow {
    pub line: usize,
    pub zone_label: String,
    pub raw_point: String,
    pub reason: PointError,
    pub extra: Vec<(String, String)>,
}

/// Closed polyline through a zone's points.
#[derive(Debug, Clone, PartialEq)]
pub struct Wireframe {
    pub vertices: Vec<Point3>,
    /// Index pairs into `vertices`; the last edge returns to vertex 0.
    pub edges: Vec<(usize, usize)>,
}

impl Wireframe {
    fn closed_loop(vertices: Vec<Point3>) -> Wireframe {
        let n = vertices.len();
        let edges = (0..n).map(|i| (i, (i + 1) % n)).collect();
        Wireframe { vertices, edges }
    }

    /// Vertices in drawing order with the first repeated at the end.
    pub fn polyline(&self) -> Vec<Point3> {
        let mut line = self.vertices.clone();
        if let Some(first) = self.vertices.first() {
            line.push(*first);
        }
        line
    }
}

/// Raised for a zone that has too few valid points to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneWarning {
    pub zone: String,
    pub valid_points: usize,
}

impl fmt::Display for ZoneWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Not enough valid vertices to visualize {} ({} found, {} needed)",
            self.zone, self.valid_points, MIN_RENDERABLE_POINTS
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub name: String,
    /// Valid points in row order.
    pub points: Vec<Point3>,
    pub invalid: Vec<InvalidRow>,
}

impl Zone {
    fn new(name: &str) -> Zone {
        Zone {
            name: name.to_string(),
            points: Vec::new(),
            invalid: Vec::new(),
        }
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid.len()
    }

    pub fn is_renderable(&self) -> bool {
        self.points.len() >= MIN_RENDERABLE_POINTS
    }

    /// The closed wireframe, or `None` when the zone cannot be drawn.
    pub fn wireframe(&self) -> Option<Wireframe> {
        if !self.is_renderable() {
            return None;
        }
        Some(Wireframe::closed_loop(self.points.clone()))
    }

    pub fn warning(&self) -> Option<ZoneWarning> {
        if self.is_renderable() {
            None
        } else {
            Some(ZoneWarning {
                zone: self.name.clone(),
                valid_points: self.points.len(),
            })
        }
    }
}

/// Everything derived from one loaded table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneReport {
    /// Zones in name order.
    pub zones: BTreeMap<String, Zone>,
    /// Rows whose label has no `<name> Vertex` form. They are left out of
    /// every zone and their coordinates are not parsed.
    pub unmatched: Vec<Row>,
}

impl ZoneReport {
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.get(name)
    }

    pub fn renderable(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values().filter(|z| z.is_renderable())
    }

    pub fn warnings(&self) -> Vec<ZoneWarning> {
        self.zones.values().filter_map(Zone::warning).collect()
    }

    /// Invalid rows of every zone, in input order.
    pub fn invalid_rows(&self) -> Vec<&InvalidRow> {
        let mut rows: Vec<&InvalidRow> = self.zones.values().flat_map(|z| z.invalid.iter()).collect();
        rows.sort_by_key(|r| r.line);
        rows
    }

    pub fn valid_point_count(&self) -> usize {
        self.zones.values().map(|z| z.points.len()).sum()
    }
}

/// Parses and groups rows by zone name.
pub fn group_rows(rows: &[Row]) -> ZoneReport {
    rows.iter().fold(ZoneReport::default(), |mut report, row| {
        let Some(name) = zone_name(&row.zone_label) else {
            report.unmatched.push(row.clone());
            return report;
        };
        let zone = report
            .zones
            .entry(name.to_string())
            .or_insert_with(|| Zone::new(name));
        match parse_coordinates(&row.raw_point) {
            ParsedPoint::Valid(p) => zone.points.push(p),
            ParsedPoint::Invalid { raw, reason } => zone.invalid.push(InvalidRow {
                line: row.line,
                zone_label: row.zone_label.clone(),
                raw_point: raw,
                reason,
                extra: row.extra.clone(),
            }),
        }
        report
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_name_extraction() {
        assert_eq!(zone_name("A Vertex1"), Some("A"));
        assert_eq!(zone_name("  Front Left  Vertex12"), Some("Front Left"));
        assert_eq!(zone_name("Hood Vertex"), Some("Hood"));
        assert_eq!(zone_name("Top Vertex Group Vertex2"), Some("Top Vertex Group"));
        assert_eq!(zone_name("Vertex1"), None);
        assert_eq!(zone_name(" Vertex1"), None);
        assert_eq!(zone_name("A vertex1"), None);
        assert_eq!(zone_name(""), None);
    }

    #[test]
    fn test_loop_edges() {
        let w = Wireframe::closed_loop(vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(w.edges, vec![(0, 1), (1, 2), (2, 0)]);
        assert_eq!(w.polyline().len(), 4);
        assert_eq!(w.polyline()[3], [0.0; 3]);
    }

    #[test]
    fn test_warning_text() {
        let w = ZoneWarning {
            zone: "Roof".into(),
            valid_points: 2,
        };
        assert_eq!(
            w.to_string(),
            "Not enough valid vertices to visualize Roof (2 found, 3 needed)"
        );
    }
}

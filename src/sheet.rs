use crate::error::SheetError;
use calamine::{open_workbook_auto, Data, Range, Reader};
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const ZONE_COLUMN: &str = "Zone name";
pub const POINTS_COLUMN: &str = "Data points";

/// One data row of the loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based position among data rows (the header is not counted).
    pub line: usize,
    pub zone_label: String,
    pub raw_point: String,
    /// Every other column as `(header, value)`, in column order.
    pub extra: Vec<(String, String)>,
}

impl Row {
    pub fn new(line: usize, zone_label: &str, raw_point: &str) -> Row {
        Row {
            line,
            zone_label: zone_label.to_string(),
            raw_point: raw_point.to_string(),
            extra: Vec::new(),
        }
    }
}

/// A loaded table: its headers and the rows that carry data.
#[derive(Debug, Clone)]
pub struct Spreadsheet {
    /// File name or `<stdin>`, for messages.
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Workbook,
    Csv,
}

fn detect_format(path: &Path) -> Result<Format, SheetError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(Format::Workbook),
        Some("csv") => Ok(Format::Csv),
        _ => Err(SheetError::UnsupportedFormat { extension: ext }),
    }
}

impl Spreadsheet {
    /// Loads a workbook or CSV file, choosing the reader from the extension.
    ///
    /// Workbooks read `sheet_name`, or the first worksheet when it is `None`.
    /// The name is ignored for CSV files.
    pub fn open(path: &Path, sheet_name: Option<&str>) -> Result<Spreadsheet, SheetError> {
        let source = path.display().to_string();
        let sheet = match detect_format(path)? {
            Format::Csv => {
                let file = File::open(path).map_err(|e| SheetError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                Spreadsheet::from_csv_reader(&source, file)?
            }
            Format::Workbook => {
                if !path.exists() {
                    return Err(SheetError::Io {
                        path: path.to_path_buf(),
                        source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                    });
                }
                let mut workbook = open_workbook_auto(path)?;
                let range = match sheet_name {
                    Some(name) => {
                        if !workbook.sheet_names().iter().any(|n| n == name) {
                            return Err(SheetError::WorksheetNotFound(name.to_string()));
                        }
                        workbook.worksheet_range(name)?
                    }
                    None => workbook.worksheet_range_at(0).ok_or(SheetError::NoWorksheet)??,
                };
                Spreadsheet::from_range(&source, &range)?
            }
        };
        info!("Loaded {} rows from {}", sheet.rows.len(), sheet.source);
        Ok(sheet)
    }

    /// Reads CSV text with a header row.
    ///
    /// Cells are decoded lossily, so a stray non-UTF-8 byte damages only its
    /// own cell. Rows are numbered by their line below the header, counting
    /// empty lines the CSV reader skips.
    pub fn from_csv_reader<R: Read>(source: &str, reader: R) -> Result<Spreadsheet, SheetError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for record in rdr.byte_records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            let cells = record
                .iter()
                .map(|c| String::from_utf8_lossy(c).into_owned())
                .collect::<Vec<String>>();
            records.push((line, cells));
        }

        let mut records = records.into_iter();
        let (header_line, headers) = records.next().ok_or(SheetError::NoHeader)?;
        let numbered = records.map(|(line, cells)| (line.saturating_sub(header_line), cells));
        Spreadsheet::from_numbered_records(source, headers, numbered)
    }

    fn from_range(source: &str, range: &Range<Data>) -> Result<Spreadsheet, SheetError> {
        let mut rows = range
            .rows()
            .map(|cells| cells.iter().map(cell_text).collect::<Vec<String>>());
        let headers = rows.next().ok_or(SheetError::NoHeader)?;
        Spreadsheet::from_records(source, headers, rows)
    }

    /// Builds rows from a header and raw records, numbering records from 1.
    ///
    /// Fails before building anything when a required column is missing.
    pub fn from_records<I>(source: &str, headers: Vec<String>, records: I) -> Result<Spreadsheet, SheetError>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let numbered = records.into_iter().enumerate().map(|(i, r)| (i + 1, r));
        Spreadsheet::from_numbered_records(source, headers, numbered)
    }

    fn from_numbered_records<I>(source: &str, headers: Vec<String>, records: I) -> Result<Spreadsheet, SheetError>
    where
        I: IntoIterator<Item = (usize, Vec<String>)>,
    {
        let headers: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let zone_idx = headers.iter().position(|h| h == ZONE_COLUMN);
        let points_idx = headers.iter().position(|h| h == POINTS_COLUMN);

        let (zone_idx, points_idx) = match (zone_idx, points_idx) {
            (Some(z), Some(p)) => (z, p),
            _ => {
                let missing = [(ZONE_COLUMN, zone_idx), (POINTS_COLUMN, points_idx)]
                    .iter()
                    .filter(|(_, idx)| idx.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect();
                return Err(SheetError::MissingColumns {
                    missing,
                    found: headers.into_iter().filter(|h| !h.is_empty()).collect(),
                });
            }
        };

        let mut rows = Vec::new();
        for (line, record) in records {
            if record.iter().all(|c| c.trim().is_empty()) {
                debug!("{}: skipping blank row {}", source, line);
                continue;
            }
            let cell = |idx: usize| record.get(idx).cloned().unwrap_or_default();
            let extra = headers
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != zone_idx && *idx != points_idx)
                .map(|(idx, h)| (h.clone(), cell(idx)))
                .collect();
            rows.push(Row {
                line,
                zone_label: cell(zone_idx),
                raw_point: cell(points_idx),
                extra,
            });
        }

        Ok(Spreadsheet {
            source: source.to_string(),
            headers,
            rows,
        })
    }
}

// Workbook cells as the text a user would see in them.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

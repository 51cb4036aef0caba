use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::models::{ConnectionLeg, Mode, Node, NodeTable, SlaStatus};
use crate::time::DepartureTime;

pub const COL_PATH: &str = "connection_full";
pub const COL_ORIGIN: &str = "LEG_ORIGIN_CODE";
pub const COL_DEST: &str = "LEG_DEST_CODE";
pub const COL_DEPARTURE: &str = "Connection Departure Time";
pub const COL_MODE: &str = "Mode";
pub const COL_SLA: &str = "SLA_COLOR";
pub const COL_BUFFER: &str = "time_diff_min";

pub const COL_CODE: &str = "CODE";
pub const COL_LAT: &str = "lat";
pub const COL_LON: &str = "lon";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read CSV '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("'{path}' is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("'{path}' line {line}, column '{column}': invalid value '{value}' ({reason})")]
    InvalidValue {
        path: PathBuf,
        line: u64,
        column: &'static str,
        value: String,
        reason: String,
    },
    #[error("'{path}' line {line}: node code '{code}' appears more than once")]
    DuplicateNode { path: PathBuf, line: u64, code: String },
}

/// Summary of a legs table load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Legs kept
    pub legs: usize,
    /// Rows without a connection path, which never appear in any path selection
    pub skipped_without_path: usize,
    /// Unrecognized SLA values and how many rows carry each
    pub unrecognized_sla: BTreeMap<String, usize>,
}

impl LoadReport {
    #[must_use]
    pub fn unrecognized_sla_rows(&self) -> usize {
        self.unrecognized_sla.values().sum()
    }
}

/// Positions of the required columns within a header row
struct ColumnIndex<'a> {
    path: &'a Path,
    header: csv::StringRecord,
}

impl<'a> ColumnIndex<'a> {
    fn new(path: &'a Path, header: csv::StringRecord) -> Self {
        Self { path, header }
    }

    fn find(&self, column: &'static str) -> Result<usize, LoadError> {
        self.header
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| LoadError::MissingColumn {
                path: self.path.to_path_buf(),
                column,
            })
    }
}

struct Row<'a> {
    path: &'a Path,
    record: &'a csv::StringRecord,
    line: u64,
}

impl Row<'_> {
    fn text(&self, idx: usize) -> &str {
        self.record.get(idx).map_or("", str::trim)
    }

    fn invalid(&self, column: &'static str, value: &str, reason: impl ToString) -> LoadError {
        LoadError::InvalidValue {
            path: self.path.to_path_buf(),
            line: self.line,
            column,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    fn required(&self, idx: usize, column: &'static str) -> Result<&str, LoadError> {
        let value = self.text(idx);
        if value.is_empty() {
            return Err(self.invalid(column, value, "empty"));
        }
        Ok(value)
    }

    fn number(&self, idx: usize, column: &'static str) -> Result<f64, LoadError> {
        let value = self.required(idx, column)?;
        let number: f64 = value.parse().map_err(|e| self.invalid(column, value, e))?;
        if !number.is_finite() {
            return Err(self.invalid(column, value, "not a finite number"));
        }
        Ok(number)
    }
}

fn csv_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the legs table
///
/// `source` only labels errors; it is not opened.
///
/// # Errors
///
/// Returns an error if a required column is missing or a value cannot be parsed.
pub fn read_legs<R: io::Read>(reader: R, source: &Path) -> Result<(Vec<ConnectionLeg>, LoadReport), LoadError> {
    let mut reader = csv_reader(reader);
    let csv_err = |source_err| LoadError::Csv {
        path: source.to_path_buf(),
        source: source_err,
    };

    let columns = ColumnIndex::new(source, reader.headers().map_err(csv_err)?.clone());
    let path_idx = columns.find(COL_PATH)?;
    let origin_idx = columns.find(COL_ORIGIN)?;
    let dest_idx = columns.find(COL_DEST)?;
    let departure_idx = columns.find(COL_DEPARTURE)?;
    let mode_idx = columns.find(COL_MODE)?;
    let sla_idx = columns.find(COL_SLA)?;
    let buffer_idx = columns.find(COL_BUFFER)?;

    let mut legs = Vec::new();
    let mut report = LoadReport::default();

    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let row = Row {
            path: source,
            record: &record,
            line: record.position().map_or(0, csv::Position::line),
        };

        let connection_full_path = row.text(path_idx);
        if connection_full_path.is_empty() {
            report.skipped_without_path += 1;
            continue;
        }

        let departure_raw = row.required(departure_idx, COL_DEPARTURE)?;
        let departure: DepartureTime = departure_raw
            .parse()
            .map_err(|e| row.invalid(COL_DEPARTURE, departure_raw, e))?;

        let sla = SlaStatus::parse(row.text(sla_idx));
        if let SlaStatus::Unrecognized(raw) = &sla {
            *report.unrecognized_sla.entry(raw.clone()).or_insert(0) += 1;
        }

        legs.push(ConnectionLeg {
            connection_full_path: connection_full_path.to_string(),
            origin: row.required(origin_idx, COL_ORIGIN)?.to_string(),
            dest: row.required(dest_idx, COL_DEST)?.to_string(),
            departure,
            mode: Mode::new(row.text(mode_idx)),
            sla,
            buffer_minutes: row.number(buffer_idx, COL_BUFFER)?,
        });
    }

    report.legs = legs.len();

    if !report.unrecognized_sla.is_empty() {
        let values: Vec<&str> = report.unrecognized_sla.keys().map(String::as_str).collect();
        tracing::warn!(
            path = %source.display(),
            rows = report.unrecognized_sla_rows(),
            values = ?values,
            "legs with unrecognized SLA colors are counted in totals but match no SLA selection"
        );
    }
    if report.skipped_without_path > 0 {
        tracing::warn!(
            path = %source.display(),
            rows = report.skipped_without_path,
            "skipped legs without a connection path"
        );
    }

    Ok((legs, report))
}

/// Read the nodes table
///
/// # Errors
///
/// Returns an error if a required column is missing, a coordinate cannot be
/// parsed or is out of geographic range, or a code appears twice.
pub fn read_nodes<R: io::Read>(reader: R, source: &Path) -> Result<NodeTable, LoadError> {
    let mut reader = csv_reader(reader);
    let csv_err = |source_err| LoadError::Csv {
        path: source.to_path_buf(),
        source: source_err,
    };

    let columns = ColumnIndex::new(source, reader.headers().map_err(csv_err)?.clone());
    let code_idx = columns.find(COL_CODE)?;
    let lat_idx = columns.find(COL_LAT)?;
    let lon_idx = columns.find(COL_LON)?;

    let mut table = NodeTable::new();

    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let row = Row {
            path: source,
            record: &record,
            line: record.position().map_or(0, csv::Position::line),
        };

        let code = row.required(code_idx, COL_CODE)?;
        let lat = row.number(lat_idx, COL_LAT)?;
        let lon = row.number(lon_idx, COL_LON)?;

        let node = Node::new(code, lat, lon);
        if !(-90.0..=90.0).contains(&lat) {
            return Err(row.invalid(COL_LAT, row.text(lat_idx), "latitude outside [-90, 90]"));
        }
        if !node.has_valid_position() {
            return Err(row.invalid(COL_LON, row.text(lon_idx), "longitude outside [-180, 180]"));
        }

        table.insert(node).map_err(|dup| LoadError::DuplicateNode {
            path: source.to_path_buf(),
            line: row.line,
            code: dup.code,
        })?;
    }

    Ok(table)
}

/// Load the legs table from a CSV file
///
/// # Errors
///
/// See [`read_legs`]; also fails if the file cannot be opened.
pub fn load_legs(path: &Path) -> Result<(Vec<ConnectionLeg>, LoadReport), LoadError> {
    read_legs(open(path)?, path)
}

/// Load the nodes table from a CSV file
///
/// # Errors
///
/// See [`read_nodes`]; also fails if the file cannot be opened.
pub fn load_nodes(path: &Path) -> Result<NodeTable, LoadError> {
    read_nodes(open(path)?, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlaColor;

    const LEGS_HEADER: &str = "connection_full,LEG_ORIGIN_CODE,LEG_DEST_CODE,Connection Departure Time,Mode,SLA_COLOR,time_diff_min\n";

    fn legs(body: &str) -> Result<(Vec<ConnectionLeg>, LoadReport), LoadError> {
        let content = format!("{LEGS_HEADER}{body}");
        read_legs(content.as_bytes(), Path::new("legs.csv"))
    }

    fn nodes(content: &str) -> Result<NodeTable, LoadError> {
        read_nodes(content.as_bytes(), Path::new("nodes.csv"))
    }

    #[test]
    fn test_read_legs_basic() {
        let (legs, report) = legs("DEL-BOM,DEL,BOM,08:00,AIR,GREEN,45\nDEL-BOM,DEL,BOM,9:30,SURFACE,RED,-12.5\n")
            .expect("should load");

        assert_eq!(legs.len(), 2);
        assert_eq!(report.legs, 2);
        assert_eq!(legs[0].origin, "DEL");
        assert_eq!(legs[0].sla_color(), Some(SlaColor::Green));
        assert_eq!(legs[1].departure.to_string(), "09:30");
        assert_eq!(legs[1].mode, Mode::new("SURFACE"));
        assert_eq!(legs[1].buffer_minutes, -12.5);
    }

    #[test]
    fn test_read_legs_ignores_extra_columns_and_order() {
        let content = "time_diff_min,extra,SLA_COLOR,Mode,Connection Departure Time,LEG_DEST_CODE,LEG_ORIGIN_CODE,connection_full\n\
                       10,x,ORANGE,AIR,07:15,BOM,DEL,DEL-BOM\n";
        let (legs, _) = read_legs(content.as_bytes(), Path::new("legs.csv")).expect("should load");
        assert_eq!(legs[0].origin, "DEL");
        assert_eq!(legs[0].dest, "BOM");
        assert_eq!(legs[0].sla_color(), Some(SlaColor::Orange));
    }

    #[test]
    fn test_read_legs_missing_column() {
        let content = "connection_full,LEG_ORIGIN_CODE,LEG_DEST_CODE,Mode,SLA_COLOR,time_diff_min\n";
        let err = read_legs(content.as_bytes(), Path::new("legs.csv")).expect_err("should fail");
        match err {
            LoadError::MissingColumn { column, path } => {
                assert_eq!(column, COL_DEPARTURE);
                assert_eq!(path, PathBuf::from("legs.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_legs_bad_time_reports_line() {
        let err = legs("DEL-BOM,DEL,BOM,08:00,AIR,GREEN,45\nDEL-BOM,DEL,BOM,late,AIR,GREEN,45\n")
            .expect_err("should fail");
        match err {
            LoadError::InvalidValue { line, column, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, COL_DEPARTURE);
                assert_eq!(value, "late");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_legs_bad_buffer() {
        let err = legs("DEL-BOM,DEL,BOM,08:00,AIR,GREEN,soon\n").expect_err("should fail");
        assert!(matches!(err, LoadError::InvalidValue { column: COL_BUFFER, .. }));
    }

    #[test]
    fn test_read_legs_skips_rows_without_path() {
        let (legs, report) = legs(",DEL,BOM,08:00,AIR,GREEN,45\nDEL-BOM,DEL,BOM,08:00,AIR,GREEN,45\n")
            .expect("should load");
        assert_eq!(legs.len(), 1);
        assert_eq!(report.skipped_without_path, 1);
    }

    #[test]
    fn test_read_legs_reports_unrecognized_sla() {
        let (legs, report) = legs(
            "P,A,B,08:00,AIR,AMBER,1\nP,A,B,08:10,AIR,AMBER,1\nP,A,B,08:20,AIR,,1\nP,A,B,08:30,AIR,RED,1\n",
        )
        .expect("should load");
        assert_eq!(legs.len(), 4);
        assert_eq!(report.unrecognized_sla_rows(), 3);
        assert_eq!(report.unrecognized_sla.get("AMBER"), Some(&2));
        assert_eq!(report.unrecognized_sla.get(""), Some(&1));
    }

    #[test]
    fn test_read_nodes_basic() {
        let table = nodes("CODE,lat,lon\nDEL,28.61,77.20\nBOM,19.07,72.87\n").expect("should load");
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("DEL"), Ok((28.61, 77.20)));
    }

    #[test]
    fn test_read_nodes_unparsable_coordinate() {
        let err = nodes("CODE,lat,lon\nDEL,north,77.20\n").expect_err("should fail");
        assert!(matches!(err, LoadError::InvalidValue { column: COL_LAT, line: 2, .. }));
    }

    #[test]
    fn test_read_nodes_out_of_range() {
        let err = nodes("CODE,lat,lon\nDEL,28.61,277.20\n").expect_err("should fail");
        assert!(matches!(err, LoadError::InvalidValue { column: COL_LON, .. }));
        let err = nodes("CODE,lat,lon\nDEL,128.61,77.20\n").expect_err("should fail");
        assert!(matches!(err, LoadError::InvalidValue { column: COL_LAT, .. }));
    }

    #[test]
    fn test_read_nodes_rejects_nan() {
        let err = nodes("CODE,lat,lon\nDEL,NaN,77.20\n").expect_err("should fail");
        assert!(matches!(err, LoadError::InvalidValue { column: COL_LAT, .. }));
    }

    #[test]
    fn test_read_nodes_duplicate_code() {
        let err = nodes("CODE,lat,lon\nDEL,28.61,77.20\nDEL,28.70,77.10\n").expect_err("should fail");
        match err {
            LoadError::DuplicateNode { code, line, .. } => {
                assert_eq!(code, "DEL");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_nodes_missing_column() {
        let err = nodes("CODE,latitude,lon\nDEL,28.61,77.20\n").expect_err("should fail");
        assert!(matches!(err, LoadError::MissingColumn { column: COL_LAT, .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_nodes(Path::new("/definitely/not/nodes.csv")).expect_err("should fail");
        assert!(matches!(err, LoadError::Io { .. }));
    }
}

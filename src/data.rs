use std::path::Path;

use crate::dataset::Dataset;
use crate::import::{read_legs, read_nodes, LoadError};

/// Parse the bundled sample network into a dataset
///
/// # Errors
///
/// Returns an error if the bundled CSV files are malformed.
pub fn sample_dataset() -> Result<Dataset, LoadError> {
    let legs_csv = include_str!("../test-data/legs.csv");
    let nodes_csv = include_str!("../test-data/nodes.csv");
    parse_csv_strings(legs_csv, nodes_csv)
}

/// Parse legs and nodes CSV strings into a dataset
///
/// # Errors
///
/// Returns an error if either table is missing a column or has an unparsable value.
pub fn parse_csv_strings(legs_csv: &str, nodes_csv: &str) -> Result<Dataset, LoadError> {
    let (legs, report) = read_legs(legs_csv.as_bytes(), Path::new("legs.csv"))?;
    let nodes = read_nodes(nodes_csv.as_bytes(), Path::new("nodes.csv"))?;
    Ok(Dataset::with_report(legs, nodes, report))
}

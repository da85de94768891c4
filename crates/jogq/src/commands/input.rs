//! Reading record sets from files or stdin.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use jogq_core::{records_from_str, Record};

use super::Result;

/// Reads a JSON array of records from `path`, or from stdin when `path` is
/// `None` or `-`.
pub fn read_records(path: Option<&Path>) -> Result<Vec<Record>> {
    let content = match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let records = records_from_str(&content)?;
    tracing::debug!(
        source = %path.map_or_else(|| "stdin".into(), |p| p.display().to_string()),
        count = records.len(),
        "loaded records"
    );
    Ok(records)
}

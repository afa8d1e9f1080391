use std::io::{Cursor, ErrorKind};
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::LoadError;

const EDIT_FRAGMENTS: [&str; 2] = ["/edit?resourcekey#gid=", "/edit#gid="];
const EXPORT_FRAGMENT: &str = "/export?format=csv&gid=";

/// Read a CSV file with all columns as String dtype.
///
/// A transient I/O failure on the first attempt is retried once.
pub fn read_csv(path: &Path) -> Result<DataFrame, LoadError> {
    let bytes = read_with_retry(path, || std::fs::read(path))?;
    debug!(path = %path.display(), bytes = bytes.len(), "read source table");
    frame_from_csv_bytes(bytes)
}

/// Parse already-materialized CSV bytes (e.g. a fetched sheet export).
/// Trims whitespace from column names.
pub fn frame_from_csv_bytes(bytes: Vec<u8>) -> Result<DataFrame, LoadError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

fn read_with_retry<F>(path: &Path, mut read: F) -> Result<Vec<u8>, LoadError>
where
    F: FnMut() -> std::io::Result<Vec<u8>>,
{
    match read() {
        Ok(bytes) => Ok(bytes),
        Err(e) if is_transient(&e) => {
            warn!(path = %path.display(), error = %e, "transient read failure, retrying once");
            Ok(read()?)
        }
        Err(e) => Err(e.into()),
    }
}

fn is_transient(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock
    )
}

pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), LoadError> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(LoadError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Cast the given columns to String so callers can hand in typed frames.
pub fn columns_as_strings(df: &DataFrame, columns: &[&str]) -> Result<DataFrame, LoadError> {
    let exprs: Vec<Expr> = columns
        .iter()
        .map(|c| col(*c).cast(DataType::String))
        .collect();
    Ok(df.clone().lazy().with_columns(exprs).collect()?)
}

/// Parse string columns to Float64. Malformed cells become null.
pub fn parse_float_columns(df: DataFrame, columns: &[&str]) -> Result<DataFrame, LoadError> {
    let exprs: Vec<Expr> = columns
        .iter()
        .map(|c| {
            col(*c)
                .cast(DataType::String)
                .str()
                .strip_chars(lit(" \t\r\n$"))
                .cast(DataType::Float64)
        })
        .collect();
    Ok(df.lazy().with_columns(exprs).collect()?)
}

/// Rewrite a spreadsheet edit URL into its CSV export URL.
pub fn sheet_export_url(edit_url: &str) -> Result<String, LoadError> {
    EDIT_FRAGMENTS
        .iter()
        .find(|fragment| edit_url.contains(*fragment))
        .map(|fragment| edit_url.replacen(fragment, EXPORT_FRAGMENT, 1))
        .ok_or_else(|| {
            LoadError::InvalidData(format!("not a spreadsheet edit URL: {edit_url}"))
        })
}

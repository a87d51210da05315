// Result rows as delivered by the query executor (CSV, headers = field codes)

use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RowSet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        RowSet { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive header lookup
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
    }

    /// Raw cell text; short rows yield `None`
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Numeric cell value. Blank and non-numeric cells are missing.
    pub fn number(&self, row: usize, column: usize) -> Option<f64> {
        self.cell(row, column).and_then(parse_number)
    }

    /// First `max_rows` rows, as the query executor would return under a result limit
    pub fn limited(&self, max_rows: Option<usize>) -> RowSet {
        match max_rows {
            Some(n) if n < self.rows.len() => RowSet::new(self.headers.clone(), self.rows[..n].to_vec()),
            _ => self.clone(),
        }
    }
}

/// Parse a numeric cell, accepting `1,234.5` style grouping
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = if trimmed.contains(',') {
        trimmed.replace(',', "").parse::<f64>().ok()?
    } else {
        trimmed.parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}

/// Read rows from any reader. A header-only input is a valid empty result.
pub fn read_rows<R: Read>(reader: R) -> Result<RowSet> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    log::debug!("read {} result rows", rows.len());
    Ok(RowSet { headers, rows })
}

pub fn read_rows_from_path(path: &Path) -> Result<RowSet> {
    let file = File::open(path).with_context(|| format!("Failed to open rows file {}", path.display()))?;
    read_rows(file).with_context(|| format!("Failed to parse rows file {}", path.display()))
}

pub fn read_rows_from_stdin() -> Result<RowSet> {
    read_rows(io::stdin()).context("Failed to read rows from stdin")
}

/// Rows from a file path, or stdin when the path is `-`
pub fn load(path: &Path) -> Result<RowSet> {
    if path.as_os_str() == "-" {
        read_rows_from_stdin()
    } else if path.exists() {
        read_rows_from_path(path)
    } else {
        Err(anyhow!("Rows file {} does not exist", path.display()))
    }
}

//! Spreadsheet discovery and loading.
//!
//! Excel-family workbooks are read through `calamine` (first worksheet only),
//! CSV exports through `csv`. Either way the first row holds the headers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use crate::error::StatsError;
use crate::model::ResponseTable;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// List spreadsheets in `dir` whose extension is one of `extensions`.
///
/// Not recursive. Results are sorted by file name. An empty result is a
/// [`StatsError::NoSpreadsheets`] error.
pub fn discover_spreadsheets(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(StatsError::NoSpreadsheets(dir.to_path_buf()).into());
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    tracing::debug!("found {} spreadsheet(s) in {}", files.len(), dir.display());
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// Load a response table from a spreadsheet file.
pub fn load_table(path: &Path) -> Result<ResponseTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = if ext == "csv" {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        parse_csv(file, path)?
    } else if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
        load_workbook(path)?
    } else {
        return Err(StatsError::UnsupportedFormat(path.to_path_buf()).into());
    };

    tracing::info!(
        "loaded {} rows x {} columns from {}",
        table.len(),
        table.headers().len(),
        path.display()
    );
    Ok(table)
}

/// Parse CSV data into a response table (useful for testing).
///
/// Empty fields are missing cells. A leading UTF-8 BOM is ignored.
pub fn parse_csv<R: std::io::Read>(reader: R, source_path: &Path) -> Result<ResponseTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = rdr.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record
            .with_context(|| format!("failed to parse CSV header: {}", source_path.display()))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect(),
        None => return Err(StatsError::EmptySheet(source_path.to_path_buf()).into()),
    };

    let mut rows = Vec::new();
    for (line, record) in records.enumerate() {
        let record = record.with_context(|| {
            format!(
                "failed to parse CSV record {} in {}",
                line + 2,
                source_path.display()
            )
        })?;
        rows.push(
            record
                .iter()
                .map(|v| (!v.is_empty()).then(|| v.to_string()))
                .collect(),
        );
    }

    Ok(ResponseTable::new(headers, rows))
}

fn load_workbook(path: &Path) -> Result<ResponseTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook: {}", path.display()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| StatsError::EmptySheet(path.to_path_buf()))?
        .with_context(|| format!("failed to read first worksheet: {}", path.display()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .map(|c| cell_text(c).unwrap_or_default())
            .collect(),
        None => return Err(StatsError::EmptySheet(path.to_path_buf()).into()),
    };

    let rows = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(ResponseTable::new(headers, rows))
}

/// Text of a workbook cell; `None` for empty and error cells.
///
/// Whole floats render without a fractional part, so an answer typed as `3`
/// compares equal to a standard answer typed as `3`.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(format_float(*f)),
        other => Some(other.to_string()),
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

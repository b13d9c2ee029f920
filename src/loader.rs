//! Label loading
//!
//! Supported inputs:
//! - `.txt` (or no extension): one label per line
//! - `.csv`: first column of every record after the header
//! - `.xlsx`, `.xlsm`, `.xls`, `.ods`: first column of the first sheet, header row skipped
//!
//! Blank labels are dropped. Loading happens at startup and on the reload
//! action, never inside a frame's update.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use calamine::{Data, Reader, open_workbook_auto};

use crate::consts::PLACEHOLDER_TEXTS;

/// Where bubble labels come from
pub trait TextSource {
    /// Load the full label set (possibly empty)
    fn load_texts(&mut self) -> anyhow::Result<Vec<String>>;
}

/// Labels read from a file on every load
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TextSource for FileSource {
    fn load_texts(&mut self) -> anyhow::Result<Vec<String>> {
        load_file(&self.path)
    }
}

/// Fixed labels
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    texts: Vec<String>,
}

impl StaticSource {
    pub fn new<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
        }
    }
}

impl TextSource for StaticSource {
    fn load_texts(&mut self) -> anyhow::Result<Vec<String>> {
        Ok(self.texts.clone())
    }
}

/// Load labels from a file, picking the parser by extension
pub fn load_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let texts = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => load_spreadsheet(path)?,
        "csv" => parse_csv_first_column(&read_text(path)?),
        "txt" | "" => parse_lines(&read_text(path)?),
        other => bail!("unsupported input format '.{other}' (use .txt, .csv or .xlsx)"),
    };
    log::info!("Loaded {} labels from {}", texts.len(), path.display());
    Ok(texts)
}

/// File contents as text, BOM stripped
fn read_text(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(content.trim_start_matches('\u{feff}').to_string())
}

/// One trimmed label per non-blank line
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// First column of each record, header skipped. Malformed records are dropped.
pub fn parse_csv_first_column(content: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    reader
        .records()
        .filter_map(|record| match record {
            Ok(record) => record.get(0).map(|f| f.trim().to_string()),
            Err(e) => {
                log::warn!("Skipping malformed CSV record: {e}");
                None
            }
        })
        .filter(|f| !f.is_empty())
        .collect()
}

/// First column of the first sheet, header row skipped
fn load_spreadsheet(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("opening workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("{} has no sheets", path.display()))?
        .with_context(|| format!("reading first sheet of {}", path.display()))?;
    Ok(first_column_cells(range.rows().skip(1)))
}

/// Non-empty first cells of `rows`, rendered as text
fn first_column_cells<'a>(rows: impl Iterator<Item = &'a [Data]>) -> Vec<String> {
    rows.filter_map(|row| row.first())
        .filter(|cell| !matches!(cell, Data::Empty | Data::Error(_)))
        .map(|cell| cell.to_string().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Built-in labels for an empty start
pub fn placeholder_texts() -> Vec<String> {
    PLACEHOLDER_TEXTS.iter().map(|s| s.to_string()).collect()
}

/// Startup labels: whatever the source yields, placeholders if that is nothing
pub fn initial_texts(source: &mut dyn TextSource) -> Vec<String> {
    match source.load_texts() {
        Ok(texts) if !texts.is_empty() => texts,
        Ok(_) => {
            log::info!("Input is empty, using placeholder labels");
            placeholder_texts()
        }
        Err(e) => {
            log::warn!("Could not load labels, using placeholders: {e:#}");
            placeholder_texts()
        }
    }
}

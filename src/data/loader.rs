use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Dataset, Record, SEED_RANGE, WIN_PCT};

pub const TEAM: &str = "TEAM";
pub const YEAR: &str = "YEAR";
pub const SEED: &str = "SEED";
pub const CONF: &str = "CONF";
pub const POSTSEASON: &str = "POSTSEASON";

/// Columns that are never treated as numeric metrics.
const RESERVED: [&str; 6] = [TEAM, YEAR, SEED, CONF, POSTSEASON, WIN_PCT];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("no win percentage: expected a '{WIN_PCT}' column or both 'W' and 'G'")]
    MissingWinPct,
    #[error("file contains no rows")]
    Empty,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tournament dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with `TEAM`, `YEAR`, `SEED`, `CONF`, `W %`, metrics…
/// * `.json` – `[{ "TEAM": "...", "YEAR": 2019, ... }, ...]`
///
/// Rows without a valid seed are dropped here, once.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    let dataset = Dataset::from_records(rows);
    log::info!(
        "Loaded {} tournament teams from {} ({} ineligible rows dropped)",
        dataset.len(),
        path.display(),
        dataset.ineligible
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Seeds are 1–16; `N/A`, `NA`, blanks and anything else are "did not enter".
pub fn parse_seed(cell: &str) -> Option<u8> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("N/A") || cell.eq_ignore_ascii_case("NA") {
        return None;
    }
    cell.parse::<u8>().ok().filter(|seed| SEED_RANGE.contains(seed))
}

/// First run of four digits, so `"2019"` and `"2019-03-21"` both give 2019.
pub fn parse_year(cell: &str) -> Option<i32> {
    let bytes = cell.as_bytes();
    bytes
        .windows(4)
        .enumerate()
        .find(|(i, w)| {
            w.iter().all(u8::is_ascii_digit)
                && !bytes.get(i + 4).is_some_and(u8::is_ascii_digit)
                && (*i == 0 || !bytes[i - 1].is_ascii_digit())
        })
        .and_then(|(i, _)| cell[i..i + 4].parse().ok())
}

/// `"75.0%"` → `75.0`.
pub fn parse_win_pct(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_empty(cell: &str) -> Option<String> {
    let cell = cell.trim();
    (!cell.is_empty() && !cell.eq_ignore_ascii_case("N/A") && !cell.eq_ignore_ascii_case("NA"))
        .then(|| cell.to_string())
}

/// One source row as column → raw text, shared by the CSV and JSON paths.
struct RawRow<'a> {
    cells: BTreeMap<&'a str, String>,
}

impl RawRow<'_> {
    fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    fn into_record(self) -> Record {
        let win_pct_display = self.get(WIN_PCT).trim().to_string();
        let win_pct = if self.cells.contains_key(WIN_PCT) {
            parse_win_pct(&win_pct_display)
        } else {
            derived_win_pct(parse_number(self.get("W")), parse_number(self.get("G")))
        };
        let win_pct_display = match (win_pct_display.is_empty(), win_pct) {
            (true, Some(v)) => format!("{v:.1}%"),
            _ => win_pct_display,
        };

        let metrics = self
            .cells
            .iter()
            .filter(|(col, _)| !RESERVED.contains(*col))
            .filter_map(|(col, cell)| parse_number(cell).map(|v| (col.to_string(), v)))
            .collect();

        Record {
            team: self.get(TEAM).trim().to_string(),
            year: parse_year(self.get(YEAR)),
            seed: parse_seed(self.get(SEED)),
            conference: self.get(CONF).trim().to_string(),
            win_pct,
            win_pct_display,
            metrics,
            postseason: non_empty(self.get(POSTSEASON)),
        }
    }
}

fn derived_win_pct(wins: Option<f64>, games: Option<f64>) -> Option<f64> {
    match (wins, games) {
        (Some(w), Some(g)) if g > 0.0 => Some(w / g * 100.0),
        _ => None,
    }
}

fn check_columns<'a>(columns: impl Iterator<Item = &'a str> + Clone) -> Result<(), LoadError> {
    for required in [TEAM, YEAR, SEED] {
        if !columns.clone().any(|c| c == required) {
            return Err(LoadError::MissingColumn(required));
        }
    }
    let has = |name: &str| columns.clone().any(|c| c == name);
    if !has(WIN_PCT) && !(has("W") && has("G")) {
        return Err(LoadError::MissingWinPct);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(&mut reader)
}

fn read_csv<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Vec<Record>> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    check_columns(headers.iter().map(String::as_str))?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping CSV row {row_no}: {e}");
                continue;
            }
        };
        let cells = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.as_str(), v.to_string()))
            .collect();
        rows.push(RawRow { cells }.into_record());
    }

    if rows.is_empty() {
        return Err(LoadError::Empty.into());
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Vec<Record>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let objects = root.as_array().context("Expected top-level JSON array")?;
    let Some(first) = objects.first().and_then(JsonValue::as_object) else {
        return Err(LoadError::Empty.into());
    };
    check_columns(first.keys().map(String::as_str))?;

    let mut rows = Vec::with_capacity(objects.len());
    for (i, value) in objects.iter().enumerate() {
        let Some(obj) = value.as_object() else {
            log::warn!("Skipping JSON row {i}: not an object");
            continue;
        };
        let cells = obj
            .iter()
            .map(|(k, v)| (k.as_str(), json_cell(v)))
            .collect();
        rows.push(RawRow { cells }.into_record());
    }
    Ok(rows)
}

fn json_cell(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

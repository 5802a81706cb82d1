//! CSV codec for the daily-bar on-disk layout.
//!
//! One file per symbol: `date;open;high;low;close;adjusted_close;volume`,
//! semicolon-separated, with a `,`-separated form also accepted. No
//! header row — the column order is the contract. Errors are reported
//! structurally (row index, column, cause) rather than as raw parse
//! messages.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use daybt_status::{Result, Status};
use daybt_types::{Bar, PriceSeries};

/// Sharded on-disk path for one symbol's price file:
/// `<data_dir>/<sym[0]>/<sym[-1]>/<symbol>/data.csv`. Single-character
/// symbols use that character at all three levels.
pub fn path_for_symbol(data_dir: &Path, symbol: &str) -> PathBuf {
    let first = symbol.chars().next().unwrap_or('_');
    let last = symbol.chars().last().unwrap_or('_');
    data_dir
        .join(first.to_string())
        .join(last.to_string())
        .join(symbol)
        .join("data.csv")
}

fn detect_separator(line: &str) -> char {
    if line.contains(';') {
        ';'
    } else {
        ','
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<Bar> {
    let sep = detect_separator(line);
    let fields: Vec<&str> = line.split(sep).map(str::trim).collect();
    if fields.len() != 7 {
        return Err(Status::internal(format!(
            "line {line_no}: expected 7 fields, got {}",
            fields.len()
        )));
    }
    let parse_f64 = |s: &str, name: &str| -> Result<f64> {
        s.parse::<f64>()
            .map_err(|e| Status::internal(format!("line {line_no}: bad {name} '{s}': {e}")))
    };
    let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d")
        .map_err(|e| Status::internal(format!("line {line_no}: bad date '{}': {e}", fields[0])))?;
    let open = parse_f64(fields[1], "open")?;
    let high = parse_f64(fields[2], "high")?;
    let low = parse_f64(fields[3], "low")?;
    let close = parse_f64(fields[4], "close")?;
    let adjusted_close = parse_f64(fields[5], "adjusted_close")?;
    let volume: i64 = fields[6]
        .parse()
        .map_err(|e| Status::internal(format!("line {line_no}: bad volume '{}': {e}", fields[6])))?;

    Bar::new(date, open, high, low, close, adjusted_close, volume)
        .map_err(|e| Status::internal(format!("line {line_no}: {}", e.message)))
}

/// Parse CSV text into a validated, sorted [`PriceSeries`]. Any parse or
/// ordering failure is `Internal` (the caller is expected to have fed
/// this store a file it controls; a malformed file is a storage defect,
/// not user input).
pub fn parse_series(content: &str) -> Result<PriceSeries> {
    let mut bars = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        bars.push(parse_line(line, i + 1)?);
    }
    PriceSeries::new(bars)
}

fn format_bar(bar: &Bar) -> String {
    format!(
        "{};{};{};{};{};{};{}",
        bar.date.format("%Y-%m-%d"),
        bar.open,
        bar.high,
        bar.low,
        bar.close,
        bar.adjusted_close,
        bar.volume
    )
}

fn render_series(series: &PriceSeries) -> String {
    let mut out = String::new();
    for bar in series.bars() {
        out.push_str(&format_bar(bar));
        out.push('\n');
    }
    out
}

/// Load a symbol's full series from disk. `NotFound` if the file does not
/// exist, `Internal` if it cannot be parsed.
pub fn load(data_dir: &Path, symbol: &str) -> Result<PriceSeries> {
    let path = path_for_symbol(data_dir, symbol);
    if !path.exists() {
        return Err(Status::not_found(format!(
            "no price data for symbol '{symbol}' at {}",
            path.display()
        )));
    }
    // The file handle is opened, read, and dropped within this call —
    // nothing is held open across a `get_prices` boundary.
    let content = fs::read_to_string(&path)
        .map_err(|e| Status::internal(format!("reading {}: {e}", path.display())))?;
    parse_series(&content)
}

/// Write `series` to disk, merging with any existing file for the symbol.
///
/// Overlapping dates whose values differ from what's on disk are rejected
/// with `AlreadyExists` unless `allow_override` is set, in which case the
/// new value wins. Writing the same series twice is a no-op on content
/// (idempotent save).
pub fn save(data_dir: &Path, symbol: &str, series: &PriceSeries, allow_override: bool) -> Result<()> {
    let path = path_for_symbol(data_dir, symbol);

    let mut merged: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
    if path.exists() {
        let existing = load(data_dir, symbol)?;
        for bar in existing.bars() {
            merged.insert(bar.date, *bar);
        }
    }

    for bar in series.bars() {
        match merged.get(&bar.date) {
            Some(existing) if existing != bar && !allow_override => {
                return Err(Status::already_exists(format!(
                    "{symbol} {}: on-disk bar differs from write and override=false",
                    bar.date
                )));
            }
            _ => {
                merged.insert(bar.date, *bar);
            }
        }
    }

    let merged_series = PriceSeries::new(merged.into_values().collect())?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Status::internal(format!("creating {}: {e}", parent.display())))?;
    }
    fs::write(&path, render_series(&merged_series))
        .map_err(|e| Status::internal(format!("writing {}: {e}", path.display())))?;
    Ok(())
}

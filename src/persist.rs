//! Files on disk: delimited tables, predicate files and extraction records.
//!
//! A table file starts with one banner line that carries no data, followed
//! by a header row and the records. The delimiter is sniffed from the header.
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{PinpointError, Result};
use crate::extract::ExtractionRecord;
use crate::predicate::PredicateSet;
use crate::table::Table;
use crate::value::Value;

/// Delimiters recognised when sniffing, in tie-break order.
pub const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Picks the candidate delimiter occurring most often outside quotes, `,` when none does.
pub fn sniff_delimiter(line: &str) -> char {
    let mut counts = [0usize; DELIMITERS.len()];
    let mut in_quotes = false;
    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(i) = DELIMITERS.iter().position(|d| *d == c) {
                counts[i] += 1;
            }
        }
    }
    let mut best = 0;
    for i in 1..counts.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    DELIMITERS[best]
}

/// Splits delimited text into records, honouring quoted fields (with doubled
/// quotes as escapes and embedded line breaks). Blank lines are dropped.
pub fn parse_delimited(text: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut current_row = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current_field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            '\n' if !in_quotes => {
                current_row.push(std::mem::take(&mut current_field));
                if !(current_row.len() == 1 && current_row[0].trim().is_empty()) {
                    rows.push(std::mem::take(&mut current_row));
                } else {
                    current_row.clear();
                }
            }
            '\r' if !in_quotes => (),
            c if c == delimiter && !in_quotes => {
                current_row.push(std::mem::take(&mut current_field));
            }
            c => current_field.push(c),
        }
    }
    if !current_field.is_empty() || !current_row.is_empty() {
        current_row.push(current_field);
        rows.push(current_row);
    }
    rows
}

/// Parses the text of a table file; `origin` names it in error messages.
pub fn parse_table(text: &str, origin: &str) -> Result<Table> {
    // the first line is a banner, not data
    let body = match text.find('\n') {
        Some(end) => &text[end + 1..],
        None => "",
    };
    let header_line = body.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if header_line.is_empty() {
        return Err(PinpointError::malformed(origin, "no header row after the banner line"));
    }
    let delimiter = sniff_delimiter(header_line);
    let mut records = parse_delimited(body, delimiter).into_iter();
    let columns: Vec<String> = match records.next() {
        Some(header) => header.into_iter().map(|h| h.trim().to_string()).collect(),
        None => return Err(PinpointError::malformed(origin, "no header row after the banner line")),
    };
    let mut typed = Vec::new();
    for (line, record) in records.enumerate() {
        if record.len() != columns.len() {
            return Err(PinpointError::malformed(
                origin,
                format!(
                    "record {} has {} fields, the header has {}",
                    line + 1,
                    record.len(),
                    columns.len()
                ),
            ));
        }
        typed.push(record.iter().map(|cell| Value::parse_cell(cell)).collect());
    }
    Table::from_records(columns, typed).map_err(|e| PinpointError::malformed(origin, e.to_string()))
}

/// Reads a table file. Any failure is reported as malformed input.
pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| PinpointError::malformed(&origin, e.to_string()))?;
    let table = parse_table(&text, &origin)?;
    info!(path = %origin, rows = table.len(), columns = table.columns().len(), "Table file read successfully");
    Ok(table)
}

fn escape(field: &str, delimiter: char) -> String {
    if field.contains(delimiter) || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Renders a table as comma-separated text: banner, header, one line per row.
pub fn table_to_csv(table: &Table, banner: &str) -> String {
    let mut result = String::new();
    result.push_str(banner.lines().next().unwrap_or(""));
    result.push('\n');
    let header: Vec<String> = table.columns().iter().map(|c| escape(c, ',')).collect();
    result.push_str(&header.join(","));
    result.push('\n');
    for row in table.rows() {
        let values: Vec<String> = row.iter().map(|(_, v)| escape(&v.to_string(), ',')).collect();
        result.push_str(&values.join(","));
        result.push('\n');
    }
    result
}

pub fn write_table(table: &Table, path: impl AsRef<Path>, banner: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, table_to_csv(table, banner))?;
    info!(path = %path.display(), rows = table.len(), "Table saved");
    Ok(())
}

/// Reads a predicates file (see [`PredicateSet::from_json`]).
pub fn read_predicates(path: impl AsRef<Path>) -> Result<PredicateSet> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| PinpointError::malformed(&origin, e.to_string()))?;
    let json: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| PinpointError::malformed(&origin, e.to_string()))?;
    PredicateSet::from_json(&json)
}

/// Writes the record as indented JSON.
pub fn write_record(record: &ExtractionRecord, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, record.to_json_pretty()?)?;
    info!(path = %path.display(), attributes = record.len(), "Attributes saved");
    Ok(())
}

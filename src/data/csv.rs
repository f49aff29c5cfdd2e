//! CSV loading for training data.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Optional header row (auto-detected: first row is a header if it contains
//!   any non-numeric, non-empty cell)
//! - Double-quoted fields with embedded commas
//!
//! Label modes:
//! - `ClassIndex` — the last column is an integer class index (0-based),
//!   one-hot encoded into a vector of length `n_classes`.
//! - `Columns`    — the last `n` columns are floats forming the label.

use serde::{Deserialize, Serialize};

use crate::data::dataset::{Dataset, Example};
use crate::error::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LabelMode {
    ClassIndex { n_classes: usize },
    Columns { n: usize },
}

pub fn load_csv(path: &str, label_mode: LabelMode) -> Result<Dataset, DataError> {
    let text = std::fs::read_to_string(path)?;
    parse_csv(&text, label_mode)
}

pub fn parse_csv(text: &str, label_mode: LabelMode) -> Result<Dataset, DataError> {
    // Row numbers are 1-based file lines, header included.
    let mut lines = text.lines().enumerate().peekable();

    if let Some((_, first)) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut examples = Vec::new();
    let mut n_feats = None;

    for (line_idx, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = line_idx + 1;
        let cells = parse_csv_row(line);

        let label_cols = match label_mode {
            LabelMode::ClassIndex { .. } => 1,
            LabelMode::Columns { n } => n,
        };
        if cells.len() < label_cols + 1 {
            return Err(DataError::Csv {
                row,
                message: format!("expected at least {} columns, got {}", label_cols + 1, cells.len()),
            });
        }

        let split = cells.len() - label_cols;
        let features = parse_floats(&cells[..split], row)?;
        let label = match label_mode {
            LabelMode::ClassIndex { n_classes } => {
                let cell = cells[split].trim();
                let class_idx: usize = cell.parse().map_err(|_| DataError::Csv {
                    row,
                    message: format!("class index '{cell}' is not a non-negative integer"),
                })?;
                if class_idx >= n_classes {
                    return Err(DataError::Csv {
                        row,
                        message: format!("class index {class_idx} >= n_classes {n_classes}"),
                    });
                }
                let mut one_hot = vec![0.0; n_classes];
                one_hot[class_idx] = 1.0;
                one_hot
            }
            LabelMode::Columns { .. } => parse_floats(&cells[split..], row)?,
        };

        let expected = *n_feats.get_or_insert(features.len());
        if features.len() != expected {
            return Err(DataError::RaggedRow { row, what: "feature", expected, got: features.len() });
        }
        examples.push(Example::new(features, label));
    }

    if examples.is_empty() {
        return Err(DataError::NoRows);
    }
    Ok(Dataset::new(examples))
}

/// A row is a header if any cell is non-numeric.
fn is_header(line: &str) -> bool {
    parse_csv_row(line).iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Splits one row on commas outside double quotes; `""` is an escaped quote.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], row: usize) -> Result<Vec<f64>, DataError> {
    cells.iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| DataError::Csv {
                row,
                message: format!("'{c}' is not a valid number"),
            })
        })
        .collect()
}

//! Schema unification: turns raw rows plus a column mapping into canonical
//! transactions with guaranteed types.
//!
//! The policy is maximally permissive of messy spreadsheets: malformed
//! financial cells coerce to safe defaults instead of aborting the import.
//! The one exception is an unparsable date in a mapped Date column, which
//! drops the row entirely; downstream time bucketing requires a valid date
//! on every record.

use crate::classify::{classify, UNCATEGORIZED};
use crate::schema::{CanonicalField, CellValue, ColumnMapping, RawTable, Transaction};
use chrono::{Days, Local, NaiveDate};
use log::{debug, info};

/// Normalizes a raw table into canonical transactions, anchoring synthesized
/// dates at today. See [`normalize_at`] for the full per-field policy.
pub fn normalize(table: &RawTable, mapping: &ColumnMapping) -> Vec<Transaction> {
    normalize_at(table, mapping, Local::now().date_naive())
}

/// Deterministic normalization entry point with an explicit reference date.
///
/// Per-field policy:
/// - **Date**: mapped column parsed per cell; a row whose date cannot be
///   parsed is dropped. Without a Date mapping, sequential daily dates are
///   synthesized ending at `reference_date` (the last row gets the reference
///   date, earlier rows count back one day each).
/// - **Description**: mapped column as text (null cells become empty text);
///   without a mapping, `"Transaction #<n>"` from the 1-based row index.
/// - **Income**: numeric coercion, missing/unparsable become 0; negatives
///   clamp to 0.
/// - **Expenses**: numeric coercion, missing/unparsable become 0; absolute
///   value enforced, since many exports encode expenses as negatives.
/// - **Category**: mapped column taken verbatim with empty/"nan"/null
///   normalized to "Uncategorized"; without a mapping, each row goes through
///   the keyword classifier.
/// - **Net**: always recomputed as `income - expenses`.
///
/// Row order is preserved: both synthesis paths above depend on the row
/// index, so this is an explicit sequential pass.
pub fn normalize_at(
    table: &RawTable,
    mapping: &ColumnMapping,
    reference_date: NaiveDate,
) -> Vec<Transaction> {
    let date_col = mapped_index(table, mapping, CanonicalField::Date);
    let desc_col = mapped_index(table, mapping, CanonicalField::Description);
    let category_col = mapped_index(table, mapping, CanonicalField::Category);
    let income_col = mapped_index(table, mapping, CanonicalField::Income);
    let expenses_col = mapped_index(table, mapping, CanonicalField::Expenses);

    let row_count = table.rows.len();
    let mut records = Vec::with_capacity(row_count);
    let mut dropped = 0usize;

    for (index, row) in table.rows.iter().enumerate() {
        let date = match date_col {
            Some(col) => match row.get(col).and_then(CellValue::as_date) {
                Some(date) => date,
                None => {
                    dropped += 1;
                    continue;
                }
            },
            None => synthesized_date(reference_date, row_count, index),
        };

        let description = match desc_col {
            Some(col) => row
                .get(col)
                .and_then(CellValue::as_text)
                .unwrap_or_default(),
            None => format!("Transaction #{}", index + 1),
        };

        let income = numeric_cell(row, income_col).max(0.0);
        let expenses = numeric_cell(row, expenses_col).abs();

        let category = match category_col {
            Some(col) => clean_category(row.get(col).and_then(CellValue::as_text)),
            None => {
                let desc = (!description.is_empty()).then_some(description.as_str());
                classify(desc, income, expenses).to_string()
            }
        };

        records.push(Transaction {
            date,
            description,
            category,
            income,
            expenses,
            net: income - expenses,
        });
    }

    if dropped > 0 {
        debug!("dropped {} rows with unparsable dates", dropped);
    }
    info!(
        "normalized {} of {} raw rows into canonical transactions",
        records.len(),
        row_count
    );

    records
}

fn mapped_index(
    table: &RawTable,
    mapping: &ColumnMapping,
    field: CanonicalField,
) -> Option<usize> {
    mapping.get(field).and_then(|name| table.column_index(name))
}

fn numeric_cell(row: &[CellValue], col: Option<usize>) -> f64 {
    col.and_then(|c| row.get(c))
        .and_then(CellValue::as_number)
        .unwrap_or(0.0)
}

/// Daily dates ending at the reference date: the last row gets the reference
/// date itself, the row before it the previous day, and so on.
fn synthesized_date(reference_date: NaiveDate, row_count: usize, index: usize) -> NaiveDate {
    let back = (row_count - 1 - index) as u64;
    reference_date
        .checked_sub_days(Days::new(back))
        .unwrap_or(reference_date)
}

fn clean_category(raw: Option<String>) -> String {
    match raw {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
                UNCATEGORIZED.to_string()
            } else {
                trimmed.to_string()
            }
        }
        None => UNCATEGORIZED.to_string(),
    }
}

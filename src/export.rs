//! Tabular export of pipeline output.
//!
//! The presentation and document-rendering layers consume the canonical
//! records and aggregates as plain rows of numbers and strings; these
//! helpers produce that handoff as CSV text.

use crate::error::{AnalysisError, Result};
use crate::insights::MonthlyAggregate;
use crate::schema::Transaction;
use csv::Writer;

/// Serializes canonical transactions as CSV with a header row
/// (date, description, category, income, expenses, net).
pub fn transactions_to_csv(records: &[Transaction]) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    finish(writer)
}

/// Serializes the monthly time base as CSV (month_end, income, expenses).
pub fn monthly_to_csv(monthly: &[MonthlyAggregate]) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    for aggregate in monthly {
        writer.serialize(aggregate)?;
    }
    finish(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AnalysisError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

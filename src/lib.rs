//! # Financial Insights
//!
//! A library for turning messy spreadsheet exports of financial transactions
//! into a canonical schema, with rule-based categorization, aggregate
//! statistics, deterministic narrative insights, and simple future-month
//! forecasts.
//!
//! ## Core Concepts
//!
//! - **Structure detection**: bilingual (Arabic/English) keyword matching
//!   maps arbitrary input headers onto the canonical fields Date,
//!   Description, Category, Income, Expenses.
//! - **Normalization**: raw, untyped cells become typed transactions with
//!   guaranteed invariants; malformed cells coerce to safe defaults instead
//!   of failing the import.
//! - **Classification**: rows without a category are labeled by a static
//!   keyword table with income/expense side filtering.
//! - **Insights**: totals, per-category and per-month aggregates, and a
//!   deterministic narrative derived purely from those numbers.
//! - **Forecast**: average-based monthly projection with a simple linear
//!   growth assumption.
//!
//! File parsing, dashboards, and document rendering are external
//! collaborators; this crate starts at an in-memory [`RawTable`] and ends at
//! plain serializable values.
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_insights::{analyze_table, CellValue, RawTable};
//!
//! let mut table = RawTable::new(vec!["Date", "Description", "Credit", "Debit"]);
//! table.push_row(vec![
//!     CellValue::from("2024-01-15"),
//!     CellValue::from("Salary payment"),
//!     CellValue::from(5000.0),
//!     CellValue::Null,
//! ]);
//!
//! let report = analyze_table(&table, 3)?;
//! println!("{}", report.analysis.summary);
//! ```

pub mod classify;
pub mod detect;
pub mod error;
pub mod export;
pub mod forecast;
pub mod insights;
pub mod normalize;
pub mod schema;
pub mod utils;

pub use classify::{classify, CategoryRule, CategorySide, CATEGORY_RULES};
pub use detect::detect;
pub use error::{AnalysisError, Result};
pub use export::{monthly_to_csv, transactions_to_csv};
pub use forecast::{predict, predict_at, Forecast, Prediction};
pub use insights::{
    monthly_aggregates, summarize, CategoryAggregate, FinancialSummary, MonthlyAggregate, Totals,
};
pub use normalize::{normalize, normalize_at};
pub use schema::{CanonicalField, CellValue, ColumnMapping, RawTable, Transaction};

use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Everything the pipeline produces for one input table, ready to hand to
/// the presentation layer or the document renderer. Plain nested values
/// only; consumers perform no recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    pub column_mapping: ColumnMapping,
    pub records: Vec<Transaction>,
    pub analysis: FinancialSummary,
    pub forecast: Forecast,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// JSON schema of the report shape, published so external renderers can
    /// validate the handoff.
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AnalysisReport)
    }

    pub fn schema_as_json() -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::generate_json_schema())?)
    }
}

/// The full pipeline: structure detection, normalization, aggregation, and
/// forecasting for a fixed horizon.
pub struct FinancialAnalyzer {
    months_ahead: u32,
}

impl FinancialAnalyzer {
    pub fn new(months_ahead: u32) -> Self {
        Self { months_ahead }
    }

    /// Runs the pipeline end to end. An empty detected mapping means the
    /// table shares no recognizable structure with the canonical schema and
    /// is treated as a hard stop; a partial mapping is fine, missing fields
    /// are synthesized or defaulted by the normalizer.
    pub fn analyze(&self, table: &RawTable) -> Result<AnalysisReport> {
        let mapping = detect(&table.headers);
        if mapping.is_empty() {
            return Err(AnalysisError::UnrecognizedStructure);
        }
        self.analyze_with_mapping(table, mapping)
    }

    /// Same pipeline with a caller-supplied mapping, for inputs whose layout
    /// is known ahead of time.
    pub fn analyze_with_mapping(
        &self,
        table: &RawTable,
        mapping: ColumnMapping,
    ) -> Result<AnalysisReport> {
        info!(
            "analyzing table with {} rows and {} columns",
            table.len(),
            table.headers.len()
        );
        debug!("column mapping: {:?}", mapping);

        let records = normalize(table, &mapping);
        let analysis = summarize(&records);
        let forecast = predict(&records, self.months_ahead);

        Ok(AnalysisReport {
            column_mapping: mapping,
            records,
            analysis,
            forecast,
        })
    }
}

/// Convenience wrapper over [`FinancialAnalyzer`].
pub fn analyze_table(table: &RawTable, months_ahead: u32) -> Result<AnalysisReport> {
    FinancialAnalyzer::new(months_ahead).analyze(table)
}

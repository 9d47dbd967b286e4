use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The fixed schema every imported table is normalized into. The variant
/// order is also the detection priority: a header that could match several
/// fields is resolved in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum CanonicalField {
    Date,
    Description,
    Category,
    Income,
    Expenses,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 5] = [
        CanonicalField::Date,
        CanonicalField::Description,
        CanonicalField::Category,
        CanonicalField::Income,
        CanonicalField::Expenses,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::Date => "Date",
            CanonicalField::Description => "Description",
            CanonicalField::Category => "Category",
            CanonicalField::Income => "Income",
            CanonicalField::Expenses => "Expenses",
        }
    }
}

/// Date formats accepted for text cells, tried in order. Spreadsheet exports
/// are inconsistent, so day-first and month-first variants are both accepted;
/// day-first wins when a value is valid under both.
const TEXT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%Y-%m-%d %H:%M:%S",
];

/// A raw cell as handed over by the external file loader. Values arrive
/// untyped; every coercion the pipeline performs pattern-matches on this tag
/// instead of guessing at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
    Null,
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the cell. Text is parsed as a plain float, booleans
    /// coerce to 0/1 the way spreadsheet engines do. Dates and nulls have no
    /// numeric reading, and neither do non-finite values: a textual "nan" or
    /// "inf" parses as a float but would poison every downstream sum, so it
    /// is treated as unparsable instead.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Date(_) | CellValue::Null => None,
        }
    }

    /// Calendar-date view of the cell. Text is tried against the accepted
    /// format list; anything else that is not already a date has no date
    /// reading.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                TEXT_DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            }
            CellValue::Number(_) | CellValue::Bool(_) | CellValue::Null => None,
        }
    }

    /// Textual view of the cell. Only `Null` has none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Null => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

/// An in-memory tabular dataset (rows x named columns) as produced by the
/// external file loader. Row order is preserved and significant: synthesized
/// descriptions use the row index and synthesized dates count back from the
/// end of the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new<S: Into<String>>(headers: Vec<S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating it to the header width so cell
    /// lookups stay aligned.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.headers.len(), CellValue::Null);
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Re-interprets already-normalized transactions as a raw table under the
    /// canonical header names. Running the normalizer over the result with
    /// [`ColumnMapping::identity`] must reproduce the same values.
    pub fn from_transactions(records: &[Transaction]) -> Self {
        let mut table = RawTable::new(vec![
            CanonicalField::Date.name(),
            CanonicalField::Description.name(),
            CanonicalField::Category.name(),
            CanonicalField::Income.name(),
            CanonicalField::Expenses.name(),
        ]);
        for record in records {
            table.push_row(vec![
                CellValue::Date(record.date),
                CellValue::Text(record.description.clone()),
                CellValue::Text(record.category.clone()),
                CellValue::Number(record.income),
                CellValue::Number(record.expenses),
            ]);
        }
        table
    }
}

/// Association between canonical fields and the actual input columns that
/// supply them. Produced by the structure detector; a partial or empty
/// mapping is a valid result, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnMapping {
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub income: Option<String>,
    pub expenses: Option<String>,
}

impl ColumnMapping {
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        match field {
            CanonicalField::Date => self.date.as_deref(),
            CanonicalField::Description => self.description.as_deref(),
            CanonicalField::Category => self.category.as_deref(),
            CanonicalField::Income => self.income.as_deref(),
            CanonicalField::Expenses => self.expenses.as_deref(),
        }
    }

    /// Assigns a header to a canonical field. Once set, a field is never
    /// reassigned: the first matching header in scan order wins.
    pub fn assign(&mut self, field: CanonicalField, header: &str) {
        let slot = match field {
            CanonicalField::Date => &mut self.date,
            CanonicalField::Description => &mut self.description,
            CanonicalField::Category => &mut self.category,
            CanonicalField::Income => &mut self.income,
            CanonicalField::Expenses => &mut self.expenses,
        };
        if slot.is_none() {
            *slot = Some(header.to_string());
        }
    }

    pub fn is_assigned(&self, field: CanonicalField) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        CanonicalField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Maps every canonical field to its own name. Used to re-normalize data
    /// that already carries the canonical headers.
    pub fn identity() -> Self {
        Self {
            date: Some(CanonicalField::Date.name().to_string()),
            description: Some(CanonicalField::Description.name().to_string()),
            category: Some(CanonicalField::Category.name().to_string()),
            income: Some(CanonicalField::Income.name().to_string()),
            expenses: Some(CanonicalField::Expenses.name().to_string()),
        }
    }
}

/// One normalized transaction. Invariants guaranteed by the normalizer:
/// `income >= 0`, `expenses >= 0`, `category` is never empty, and
/// `net == income - expenses` exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

//! Column-structure detection for heterogeneous spreadsheet layouts.
//!
//! Headers are matched by case-insensitive substring containment against
//! bilingual (English/Arabic) keyword tables, one per canonical field. The
//! tables are static configuration: loaded once, never mutated.

use crate::schema::{CanonicalField, ColumnMapping};
use log::debug;

const DATE_KEYWORDS: &[&str] = &[
    "date",
    "transaction date",
    "تاريخ",
    "تاريخ المعاملة",
    "التاريخ",
    "datetime",
    "time",
];

const DESCRIPTION_KEYWORDS: &[&str] = &[
    "description",
    "transaction details",
    "وصف",
    "تفاصيل المعاملة",
    "الوصف",
    "البيان",
    "التفاصيل",
    "desc",
    "details",
];

const CATEGORY_KEYWORDS: &[&str] = &[
    "category",
    "type",
    "فئة",
    "تصنيف",
    "نوع",
    "cat",
    "group",
    "مجموعة",
    "النوع",
];

const INCOME_KEYWORDS: &[&str] = &[
    "income",
    "credit",
    "دخل",
    "إيرادات",
    "ايرادات",
    "مدين",
    "in",
    "revenue",
    "دائن",
];

const EXPENSE_KEYWORDS: &[&str] = &[
    "expense",
    "expenses",
    "debit",
    "مصروفات",
    "مصاريف",
    "دائن",
    "out",
    "مصرف",
    "مصروف",
    "خصم",
];

fn keywords_for(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::Date => DATE_KEYWORDS,
        CanonicalField::Description => DESCRIPTION_KEYWORDS,
        CanonicalField::Category => CATEGORY_KEYWORDS,
        CanonicalField::Income => INCOME_KEYWORDS,
        CanonicalField::Expenses => EXPENSE_KEYWORDS,
    }
}

/// Infers which input column supplies each canonical field.
///
/// Headers are scanned in their original order. For each header the keyword
/// tables are tried in the fixed priority order Date, Description, Category,
/// Income, Expenses; the first table that matches an as-yet-unassigned field
/// claims the header. A header matching no table is ignored. An ambiguous
/// header (e.g. one containing both "type" and "date") is resolved by the
/// priority order; this is intentional, not a tie to be reported.
///
/// The result may be partial or empty. Zero matches is a valid outcome here;
/// callers decide whether an empty mapping is a hard stop.
pub fn detect<S: AsRef<str>>(headers: &[S]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();

    for header in headers {
        let header = header.as_ref();
        let lowered = header.to_lowercase();

        for field in CanonicalField::ALL {
            if mapping.is_assigned(field) {
                continue;
            }
            if keywords_for(field).iter().any(|kw| lowered.contains(kw)) {
                debug!("header '{}' assigned to field {}", header, field.name());
                mapping.assign(field, header);
                break;
            }
        }
    }

    mapping
}

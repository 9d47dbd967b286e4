//! Keyword-based transaction categorization.
//!
//! The category table is static configuration, scanned in its defined order:
//! income-side categories first, then expense-side. A keyword match alone is
//! not enough; the matched category's side must agree with the direction of
//! the money. For a row carrying both income and expenses, the table order is
//! the deterministic tie-break.

use log::trace;

/// Which side of the ledger a category belongs to. The side filter prevents
/// a description like "salary refund" on an expense row from landing in an
/// income category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySide {
    Income,
    Expense,
}

pub struct CategoryRule {
    pub label: &'static str,
    pub side: CategorySide,
    pub keywords: &'static [&'static str],
}

/// Bilingual (Arabic/English) keyword table. Keywords are matched as
/// case-insensitive substrings of the description.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        label: "Salaries",
        side: CategorySide::Income,
        keywords: &["راتب", "معاش", "أجر", "salary", "wage", "payroll"],
    },
    CategoryRule {
        label: "Donations",
        side: CategorySide::Income,
        keywords: &["تبرع", "هبة", "دعم", "donation", "grant", "support"],
    },
    CategoryRule {
        label: "Investments",
        side: CategorySide::Income,
        keywords: &["أرباح", "استثمار", "عائد", "dividend", "investment", "return"],
    },
    CategoryRule {
        label: "Sales",
        side: CategorySide::Income,
        keywords: &["مبيعات", "بيع", "إيراد", "sales", "revenue", "income"],
    },
    CategoryRule {
        label: "Operating Expenses",
        side: CategorySide::Expense,
        keywords: &["تشغيل", "صيانة", "خدمة", "operation", "maintenance", "service"],
    },
    CategoryRule {
        label: "Administrative Expenses",
        side: CategorySide::Expense,
        keywords: &["إدارة", "مكتب", "إيجار", "administration", "office", "rent"],
    },
    CategoryRule {
        label: "Marketing Expenses",
        side: CategorySide::Expense,
        keywords: &["تسويق", "إعلان", "دعاية", "marketing", "advertising", "promotion"],
    },
    CategoryRule {
        label: "Personnel Expenses",
        side: CategorySide::Expense,
        keywords: &["موظف", "تأمين", "تدريب", "employee", "insurance", "training"],
    },
    CategoryRule {
        label: "Financial Expenses",
        side: CategorySide::Expense,
        keywords: &["بنك", "فائدة", "رسوم", "bank", "interest", "fees"],
    },
    CategoryRule {
        label: "Purchases",
        side: CategorySide::Expense,
        keywords: &["شراء", "مشتريات", "بضاعة", "purchase", "goods", "inventory"],
    },
    CategoryRule {
        label: "Travel",
        side: CategorySide::Expense,
        keywords: &["سفر", "تذكرة", "فندق", "travel", "ticket", "hotel"],
    },
];

pub const OTHER_INCOME: &str = "Other Income";
pub const OTHER_EXPENSES: &str = "Other Expenses";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Assigns a category label to a transaction that arrived without one.
///
/// Total and deterministic: every input yields exactly one non-empty label.
/// If no keyword match passes the side filter (including when the description
/// is absent), the label falls back to "Other Income" / "Other Expenses" /
/// "Uncategorized" depending on which side carries money.
pub fn classify(description: Option<&str>, income: f64, expenses: f64) -> &'static str {
    let is_income = income > 0.0;
    let is_expense = expenses > 0.0;

    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        let lowered = description.to_lowercase();

        for rule in CATEGORY_RULES {
            if !rule.keywords.iter().any(|kw| lowered.contains(kw)) {
                continue;
            }
            let side_matches = match rule.side {
                CategorySide::Income => is_income,
                CategorySide::Expense => is_expense,
            };
            if side_matches {
                trace!("description '{}' classified as {}", description, rule.label);
                return rule.label;
            }
        }
    }

    if is_income {
        OTHER_INCOME
    } else if is_expense {
        OTHER_EXPENSES
    } else {
        UNCATEGORIZED
    }
}

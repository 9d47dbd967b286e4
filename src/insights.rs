//! Aggregate statistics and deterministic narrative generation.
//!
//! Everything here is arithmetic plus text templating over the computed
//! numbers. There is no external text-generation dependency; the narrative
//! is a pure function of the aggregates.

use crate::schema::Transaction;
use crate::utils::month_end_of;
use chrono::NaiveDate;
use log::info;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Totals {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net: f64,
}

/// Per-label sums across all transactions sharing that category. A category
/// can carry income entries, expense entries, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryAggregate {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

/// Per-calendar-month sums, bucketed by month-end date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyAggregate {
    pub month_end: NaiveDate,
    pub income: f64,
    pub expenses: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinancialSummary {
    pub summary: String,
    pub totals: Totals,
    pub category_aggregates: BTreeMap<String, CategoryAggregate>,
    /// Chronological ascending.
    pub monthly_aggregates: Vec<MonthlyAggregate>,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Buckets transactions into calendar months, anchored at month-end, in
/// chronological order. Shared time base for the summary and the forecast.
pub fn monthly_aggregates(records: &[Transaction]) -> Vec<MonthlyAggregate> {
    let mut buckets: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for record in records {
        let bucket = buckets.entry(month_end_of(record.date)).or_default();
        bucket.0 += record.income;
        bucket.1 += record.expenses;
    }
    buckets
        .into_iter()
        .map(|(month_end, (income, expenses))| MonthlyAggregate {
            month_end,
            income,
            expenses,
        })
        .collect()
}

/// Computes totals, category and monthly aggregates, and derives the
/// narrative summary, insights, and recommendations.
///
/// An empty record set produces a canned "insufficient data" result so that
/// downstream consumers never have to guard against missing fields.
pub fn summarize(records: &[Transaction]) -> FinancialSummary {
    if records.is_empty() {
        return insufficient_data_summary();
    }

    let total_income: f64 = records.iter().map(|r| r.income).sum();
    let total_expenses: f64 = records.iter().map(|r| r.expenses).sum();
    let net = total_income - total_expenses;

    let mut category_aggregates: BTreeMap<String, CategoryAggregate> = BTreeMap::new();
    for record in records {
        let aggregate = category_aggregates
            .entry(record.category.clone())
            .or_default();
        aggregate.income += record.income;
        aggregate.expenses += record.expenses;
        aggregate.net = aggregate.income - aggregate.expenses;
    }

    let (summary, mut insights) = if net >= 0.0 {
        (
            format!(
                "Total income ({:.2}) exceeds total expenses ({:.2}), \
                 leaving a positive net cash flow of {:.2}.",
                total_income, total_expenses, net
            ),
            vec!["Net cash flow is positive, which indicates a healthy financial position.".to_string()],
        )
    } else {
        (
            format!(
                "Total expenses ({:.2}) exceed total income ({:.2}), \
                 leaving a negative net cash flow of {:.2}.",
                total_expenses,
                total_income,
                net.abs()
            ),
            vec!["Net cash flow is negative; expenses may need review or income increased.".to_string()],
        )
    };

    // Ties break to the first key in sorted order via the strict comparison.
    if let Some((label, value)) = max_by_side(&category_aggregates, |a| a.expenses) {
        insights.push(format!(
            "The largest expense category is '{}' at {:.2}.",
            label, value
        ));
    }
    if let Some((label, value)) = max_by_side(&category_aggregates, |a| a.income) {
        insights.push(format!(
            "The largest income category is '{}' at {:.2}.",
            label, value
        ));
    }

    // Selected by the sign of net only, never its magnitude.
    let recommendations = if net < 0.0 {
        vec![
            "Cut spending in the categories with the highest expenses.".to_string(),
            "Look for new income sources to improve cash flow.".to_string(),
        ]
    } else {
        vec![
            "Keep maintaining the balance between income and expenses.".to_string(),
            "Invest the cash surplus in areas that help income grow.".to_string(),
        ]
    };

    info!(
        "summarized {} transactions across {} categories",
        records.len(),
        category_aggregates.len()
    );

    FinancialSummary {
        summary,
        totals: Totals {
            total_income,
            total_expenses,
            net,
        },
        category_aggregates,
        monthly_aggregates: monthly_aggregates(records),
        insights,
        recommendations,
    }
}

/// Largest category on one side of the ledger, considering only categories
/// that actually carry money on that side. `None` when no category does.
fn max_by_side<F>(
    aggregates: &BTreeMap<String, CategoryAggregate>,
    side: F,
) -> Option<(&str, f64)>
where
    F: Fn(&CategoryAggregate) -> f64,
{
    let mut best: Option<(&str, f64)> = None;
    for (label, aggregate) in aggregates {
        let value = side(aggregate);
        if value <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((label.as_str(), value)),
        }
    }
    best
}

fn insufficient_data_summary() -> FinancialSummary {
    FinancialSummary {
        summary: "There is not enough financial data to analyze.".to_string(),
        totals: Totals::default(),
        category_aggregates: BTreeMap::new(),
        monthly_aggregates: Vec::new(),
        insights: vec!["No financial data is available for analysis.".to_string()],
        recommendations: vec![
            "Upload a valid financial data file to generate an analysis.".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        date: (i32, u32, u32),
        category: &str,
        income: f64,
        expenses: f64,
    ) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: String::new(),
            category: category.to_string(),
            income,
            expenses,
            net: income - expenses,
        }
    }

    #[test]
    fn test_empty_input_returns_canned_result() {
        let summary = summarize(&[]);
        assert!(summary.category_aggregates.is_empty());
        assert!(summary.monthly_aggregates.is_empty());
        assert_eq!(summary.insights.len(), 1);
        assert_eq!(summary.recommendations.len(), 1);
        assert_eq!(summary.totals, Totals::default());
    }

    #[test]
    fn test_totals_and_category_aggregates() {
        let records = vec![
            record((2024, 1, 15), "Salaries", 5000.0, 0.0),
            record((2024, 1, 20), "Administrative Expenses", 0.0, 1200.0),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.totals.total_income, 5000.0);
        assert_eq!(summary.totals.total_expenses, 1200.0);
        assert_eq!(summary.totals.net, 3800.0);

        let salaries = &summary.category_aggregates["Salaries"];
        assert_eq!(salaries.income, 5000.0);
        assert_eq!(salaries.expenses, 0.0);
        assert_eq!(salaries.net, 5000.0);

        let admin = &summary.category_aggregates["Administrative Expenses"];
        assert_eq!(admin.net, -1200.0);

        assert!(summary
            .insights
            .iter()
            .any(|i| i.contains("Administrative Expenses")));
        assert!(summary.insights.iter().any(|i| i.contains("Salaries")));
    }

    #[test]
    fn test_category_with_both_sides() {
        let records = vec![
            record((2024, 1, 1), "Sales", 900.0, 0.0),
            record((2024, 1, 2), "Sales", 0.0, 250.0),
        ];
        let summary = summarize(&records);

        let sales = &summary.category_aggregates["Sales"];
        assert_eq!(sales.income, 900.0);
        assert_eq!(sales.expenses, 250.0);
        assert_eq!(sales.net, 650.0);
        assert_eq!(summary.category_aggregates.len(), 1);
    }

    #[test]
    fn test_monthly_aggregates_are_chronological() {
        let records = vec![
            record((2024, 3, 10), "Sales", 300.0, 0.0),
            record((2024, 1, 5), "Sales", 100.0, 50.0),
            record((2024, 1, 25), "Sales", 20.0, 0.0),
            record((2024, 2, 14), "Sales", 200.0, 0.0),
        ];
        let monthly = monthly_aggregates(&records);

        assert_eq!(monthly.len(), 3);
        assert_eq!(
            monthly[0].month_end,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert_eq!(monthly[0].income, 120.0);
        assert_eq!(monthly[0].expenses, 50.0);
        assert_eq!(
            monthly[1].month_end,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            monthly[2].month_end,
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
    }

    #[test]
    fn test_negative_net_narrative_and_recommendations() {
        let records = vec![
            record((2024, 1, 1), "Sales", 100.0, 0.0),
            record((2024, 1, 2), "Travel", 0.0, 400.0),
        ];
        let summary = summarize(&records);

        assert!(summary.summary.contains("exceed"));
        assert!(summary.summary.contains("300.00"));
        assert_eq!(summary.recommendations.len(), 2);
        assert!(summary.recommendations[0].contains("Cut spending"));
    }

    #[test]
    fn test_positive_net_recommendations() {
        let records = vec![record((2024, 1, 1), "Sales", 100.0, 0.0)];
        let summary = summarize(&records);
        assert_eq!(summary.recommendations.len(), 2);
        assert!(summary.recommendations[0].contains("maintaining"));
    }

    #[test]
    fn test_top_category_skipped_when_side_has_no_money() {
        // Income only: there is no expense-bearing category to report.
        let records = vec![record((2024, 1, 1), "Sales", 100.0, 0.0)];
        let summary = summarize(&records);

        assert!(!summary.insights.iter().any(|i| i.contains("expense category")));
        assert!(summary
            .insights
            .iter()
            .any(|i| i.contains("income category")));
    }

    #[test]
    fn test_top_category_tie_breaks_to_first_key() {
        let records = vec![
            record((2024, 1, 1), "Travel", 0.0, 500.0),
            record((2024, 1, 2), "Purchases", 0.0, 500.0),
        ];
        let summary = summarize(&records);

        // "Purchases" sorts before "Travel".
        assert!(summary.insights.iter().any(|i| i.contains("'Purchases'")));
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let records = vec![
            record((2024, 1, 15), "Salaries", 5000.0, 0.0),
            record((2024, 2, 20), "Travel", 0.0, 1200.0),
        ];
        assert_eq!(summarize(&records), summarize(&records));
    }
}

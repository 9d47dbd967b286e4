//! Simple trend-extrapolated monthly forecasts.
//!
//! The baseline is the arithmetic mean of the historical monthly totals; the
//! growth assumption is linear in the month index (not compounding): income
//! grows 1% per month ahead, expenses 0.5%. Failures inside the projection
//! are converted into an all-zero forecast rather than surfaced; a forecast
//! panel that renders zeros is preferred over one that crashes the report.

use crate::error::{AnalysisError, Result};
use crate::insights::monthly_aggregates;
use crate::schema::Transaction;
use crate::utils::{add_months_to_month_end, format_month};
use chrono::{Datelike, Local, NaiveDate};
use log::{info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const INCOME_GROWTH_RATE: f64 = 0.01;
pub const EXPENSE_GROWTH_RATE: f64 = 0.005;

/// Predicted figures for one future month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Prediction {
    /// `YYYY-MM` label of the predicted month.
    pub month: String,
    pub predicted_income: f64,
    pub predicted_expenses: f64,
    pub predicted_net: f64,
    /// Always reports the income constant, even though expenses grow at a
    /// different rate. Existing report consumers rely on the field as-is, so
    /// the inconsistency is preserved rather than fixed.
    pub growth_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Forecast {
    pub summary: String,
    pub monthly_predictions: Vec<Prediction>,
}

/// Forecasts the next `months_ahead` months from the records' monthly
/// history, anchoring the failure fallback at today.
pub fn predict(records: &[Transaction], months_ahead: u32) -> Forecast {
    predict_at(records, months_ahead, Local::now().date_naive())
}

/// Deterministic forecast entry point. `today` only anchors the month labels
/// of the all-zero fallback; the normal path derives its labels from the
/// latest historical month.
///
/// Pure: identical inputs always produce an identical forecast.
pub fn predict_at(records: &[Transaction], months_ahead: u32, today: NaiveDate) -> Forecast {
    if records.is_empty() {
        return Forecast {
            summary: "There is not enough data to build a forecast.".to_string(),
            monthly_predictions: Vec::new(),
        };
    }

    let monthly_predictions = match project_from_history(records, months_ahead) {
        Ok(predictions) => predictions,
        Err(error) => {
            warn!("forecast projection failed, falling back to zeros: {}", error);
            zero_predictions(months_ahead, today)
        }
    };

    info!(
        "built forecast for the next {} months from {} transactions",
        months_ahead,
        records.len()
    );

    Forecast {
        summary: format!(
            "Financial forecast for the next {} months, based on average \
             historical monthly income and expenses with a simple growth assumption.",
            months_ahead
        ),
        monthly_predictions,
    }
}

fn project_from_history(records: &[Transaction], months_ahead: u32) -> Result<Vec<Prediction>> {
    let monthly = monthly_aggregates(records);
    let latest = monthly
        .last()
        .ok_or_else(|| AnalysisError::EmptyHistory("no monthly buckets".to_string()))?;

    let month_count = monthly.len() as f64;
    let avg_income: f64 = monthly.iter().map(|m| m.income).sum::<f64>() / month_count;
    let avg_expenses: f64 = monthly.iter().map(|m| m.expenses).sum::<f64>() / month_count;

    let mut predictions = Vec::with_capacity(months_ahead as usize);
    for offset in 1..=months_ahead {
        let month_end = add_months_to_month_end(latest.month_end, offset as i32)?;
        let predicted_income = avg_income * (1.0 + offset as f64 * INCOME_GROWTH_RATE);
        let predicted_expenses = avg_expenses * (1.0 + offset as f64 * EXPENSE_GROWTH_RATE);

        predictions.push(Prediction {
            month: format_month(month_end),
            predicted_income,
            predicted_expenses,
            predicted_net: predicted_income - predicted_expenses,
            growth_rate: INCOME_GROWTH_RATE,
        });
    }

    Ok(predictions)
}

/// All-zero fallback entries. Month labels are computed with plain month
/// arithmetic so this path cannot itself fail.
fn zero_predictions(months_ahead: u32, today: NaiveDate) -> Vec<Prediction> {
    (1..=months_ahead)
        .map(|offset| {
            let total = today.year() * 12 + today.month0() as i32 + offset as i32;
            let year = total.div_euclid(12);
            let month = total.rem_euclid(12) + 1;
            Prediction {
                month: format!("{:04}-{:02}", year, month),
                predicted_income: 0.0,
                predicted_expenses: 0.0,
                predicted_net: 0.0,
                growth_rate: 0.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: (i32, u32, u32), income: f64, expenses: f64) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: String::new(),
            category: "Sales".to_string(),
            income,
            expenses,
            net: income - expenses,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_empty_records_yield_empty_forecast() {
        let forecast = predict_at(&[], 3, today());
        assert!(forecast.monthly_predictions.is_empty());
        assert!(!forecast.summary.is_empty());
    }

    #[test]
    fn test_single_month_history() {
        let records = vec![
            record((2024, 1, 10), 5000.0, 0.0),
            record((2024, 1, 20), 0.0, 1200.0),
        ];
        let forecast = predict_at(&records, 3, today());
        let predictions = &forecast.monthly_predictions;

        assert_eq!(predictions.len(), 3);
        assert_eq!(predictions[0].month, "2024-02");
        assert_eq!(predictions[1].month, "2024-03");
        assert_eq!(predictions[2].month, "2024-04");
        for window in predictions.windows(2) {
            assert!(window[0].month < window[1].month);
        }
        for prediction in predictions {
            assert!(prediction.predicted_income > 0.0);
            assert_eq!(
                prediction.predicted_net,
                prediction.predicted_income - prediction.predicted_expenses
            );
        }
    }

    #[test]
    fn test_growth_is_linear_not_compounding() {
        let records = vec![record((2024, 1, 10), 1000.0, 400.0)];
        let forecast = predict_at(&records, 3, today());
        let predictions = &forecast.monthly_predictions;

        assert!((predictions[0].predicted_income - 1010.0).abs() < 1e-9);
        assert!((predictions[1].predicted_income - 1020.0).abs() < 1e-9);
        assert!((predictions[2].predicted_income - 1030.0).abs() < 1e-9);

        assert!((predictions[0].predicted_expenses - 402.0).abs() < 1e-9);
        assert!((predictions[1].predicted_expenses - 404.0).abs() < 1e-9);
        assert!((predictions[2].predicted_expenses - 406.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_over_multiple_months() {
        let records = vec![
            record((2024, 1, 10), 1000.0, 100.0),
            record((2024, 2, 10), 3000.0, 300.0),
        ];
        let forecast = predict_at(&records, 1, today());
        let prediction = &forecast.monthly_predictions[0];

        // avg income 2000, avg expenses 200, one month out.
        assert!((prediction.predicted_income - 2000.0 * 1.01).abs() < 1e-9);
        assert!((prediction.predicted_expenses - 200.0 * 1.005).abs() < 1e-9);
        assert_eq!(prediction.month, "2024-03");
    }

    #[test]
    fn test_growth_rate_field_reports_income_constant() {
        let records = vec![record((2024, 1, 10), 1000.0, 400.0)];
        let forecast = predict_at(&records, 2, today());
        for prediction in &forecast.monthly_predictions {
            assert_eq!(prediction.growth_rate, INCOME_GROWTH_RATE);
        }
    }

    #[test]
    fn test_year_boundary_labels() {
        let records = vec![record((2023, 11, 10), 1000.0, 0.0)];
        let forecast = predict_at(&records, 3, today());
        let months: Vec<&str> = forecast
            .monthly_predictions
            .iter()
            .map(|p| p.month.as_str())
            .collect();
        assert_eq!(months, vec!["2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn test_internal_failure_falls_back_to_zeros() {
        // A history close to the end of the representable date range makes
        // the month arithmetic fail partway through the horizon; the public
        // entry point converts that into all-zero entries anchored at today.
        let records = vec![record((262100, 1, 1), 1000.0, 0.0)];
        let forecast = predict_at(&records, 1000, today());
        let predictions = &forecast.monthly_predictions;

        assert_eq!(predictions.len(), 1000);
        assert_eq!(predictions[0].month, "2024-07");
        for prediction in predictions {
            assert_eq!(prediction.predicted_income, 0.0);
            assert_eq!(prediction.predicted_expenses, 0.0);
            assert_eq!(prediction.predicted_net, 0.0);
            assert_eq!(prediction.growth_rate, 0.0);
        }
    }

    #[test]
    fn test_predict_is_pure() {
        let records = vec![
            record((2024, 1, 10), 1000.0, 100.0),
            record((2024, 2, 10), 3000.0, 300.0),
        ];
        assert_eq!(
            predict_at(&records, 6, today()),
            predict_at(&records, 6, today())
        );
    }
}

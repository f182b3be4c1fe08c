//! Aggregations over normalized expenses: category totals, monthly totals and
//! income/expense statistics. All amounts are in the reference currency.
use crate::core::expense::MonthKey;
use crate::core::normalize::NormalizedRow;
use std::collections::BTreeMap;

/// Expenses of one calendar month, split by category.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    pub month: MonthKey,
    pub categories: BTreeMap<String, f64>,
    pub total: f64,
}

/// Income, expense and profit/loss figures over the months present in the
/// ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub month_count: usize,
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_profit_loss: f64,
    pub mean_monthly_expenses: f64,
    pub profit_loss_by_month: Vec<(MonthKey, f64)>,
    pub mean_monthly_profit_loss: f64,
}

/// Sums costs per category, ordered by category name.
pub fn category_totals(rows: &[NormalizedRow]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for row in rows {
        *totals
            .entry(row.record.category().to_string())
            .or_insert(0.0) += row.cost_in_reference_currency;
    }
    totals
}

/// Sums costs per month and category, ordered chronologically.
pub fn monthly_totals(rows: &[NormalizedRow]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<MonthKey, BTreeMap<String, f64>> = BTreeMap::new();
    for row in rows {
        *months
            .entry(row.record.month_key())
            .or_default()
            .entry(row.record.category().to_string())
            .or_insert(0.0) += row.cost_in_reference_currency;
    }

    months
        .into_iter()
        .map(|(month, categories)| MonthlyTotal {
            month,
            total: categories.values().sum(),
            categories,
        })
        .collect()
}

/// Computes the profit/loss statistics.
///
/// `monthly_income` is the income as entered, in its own currency, and
/// `monthly_income_in_reference` is the same income converted to the
/// reference currency. Total income projects the converted amount across the
/// number of distinct months that have expenses. Monthly profit/loss
/// subtracts each month's expenses from the income as entered, and is zero
/// for every month when no income is set.
pub fn statistics(
    rows: &[NormalizedRow],
    monthly_income: Option<f64>,
    monthly_income_in_reference: Option<f64>,
) -> Statistics {
    let months = monthly_totals(rows);
    if months.is_empty() {
        return Statistics::default();
    }

    let month_count = months.len();
    let total_income =
        monthly_income_in_reference.map_or(0.0, |income| income * month_count as f64);
    let total_expenses: f64 = rows.iter().map(|r| r.cost_in_reference_currency).sum();

    let profit_loss_by_month: Vec<(MonthKey, f64)> = months
        .iter()
        .map(|m| (m.month, monthly_income.map_or(0.0, |income| income - m.total)))
        .collect();

    Statistics {
        month_count,
        total_income,
        total_expenses,
        total_profit_loss: total_income - total_expenses,
        mean_monthly_expenses: mean(months.iter().map(|m| m.total)),
        mean_monthly_profit_loss: mean(profit_loss_by_month.iter().map(|(_, pl)| *pl)),
        profit_loss_by_month,
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::ExpenseRecord;

    fn row(category: &str, cost: f64, date: &str) -> NormalizedRow {
        NormalizedRow::reference(ExpenseRecord::new(category, cost, "", date, "EUR", "").unwrap())
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_category_totals() {
        let rows = vec![
            row("Food", 10.0, "01-08-2024"),
            row("Food", 5.0, "02-08-2024"),
            row("Transport", 3.0, "03-08-2024"),
        ];

        let totals = category_totals(&rows);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get("Food"), Some(&15.0));
        assert_eq!(totals.get("Transport"), Some(&3.0));
        let order: Vec<&String> = totals.keys().collect();
        assert_eq!(order, vec!["Food", "Transport"]);
    }

    #[test]
    fn test_monthly_totals_group_by_month_and_category() {
        let rows = vec![
            row("Food", 10.0, "17-09-2024"),
            row("Food", 10.0, "05-08-2024"),
            row("Food", 5.0, "17-08-2024"),
            row("Rent", 500.0, "01-08-2024"),
        ];

        let months = monthly_totals(&rows);

        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month.to_string(), "August 2024");
        assert_eq!(months[0].categories.get("Food"), Some(&15.0));
        assert_eq!(months[0].categories.get("Rent"), Some(&500.0));
        assert_eq!(months[0].total, 515.0);
        assert_eq!(months[1].month.to_string(), "September 2024");
        assert_eq!(months[1].total, 10.0);
    }

    #[test]
    fn test_statistics_with_income() {
        let rows = vec![
            row("Rent", 300.0, "01-08-2024"),
            row("Food", 100.0, "15-08-2024"),
            row("Rent", 200.0, "01-09-2024"),
        ];

        let stats = statistics(&rows, Some(1000.0), Some(1000.0));

        assert_eq!(stats.month_count, 2);
        assert!(approx_eq(stats.total_income, 2000.0));
        assert!(approx_eq(stats.total_expenses, 600.0));
        assert!(approx_eq(stats.total_profit_loss, 1400.0));
        assert!(approx_eq(stats.mean_monthly_expenses, 300.0));
        assert_eq!(stats.profit_loss_by_month.len(), 2);
        assert!(approx_eq(stats.profit_loss_by_month[0].1, 600.0));
        assert!(approx_eq(stats.profit_loss_by_month[1].1, 800.0));
        assert!(approx_eq(stats.mean_monthly_profit_loss, 700.0));
    }

    #[test]
    fn test_statistics_without_income_zeroes_monthly_profit_loss() {
        let rows = vec![
            row("Rent", 300.0, "01-08-2024"),
            row("Rent", 200.0, "01-09-2024"),
        ];

        let stats = statistics(&rows, None, None);

        assert_eq!(stats.total_income, 0.0);
        assert!(approx_eq(stats.total_expenses, 500.0));
        assert!(approx_eq(stats.total_profit_loss, -500.0));
        assert!(stats.profit_loss_by_month.iter().all(|(_, pl)| *pl == 0.0));
        assert_eq!(stats.mean_monthly_profit_loss, 0.0);
    }

    #[test]
    fn test_foreign_income_splits_total_and_monthly_figures() {
        // 1000 USD at 0.5 EUR per USD
        let rows = vec![row("Food", 100.0, "10-08-2024")];

        let stats = statistics(&rows, Some(1000.0), Some(500.0));

        assert!(approx_eq(stats.total_income, 500.0));
        assert!(approx_eq(stats.total_profit_loss, 400.0));
        assert_eq!(stats.profit_loss_by_month.len(), 1);
        assert_eq!(stats.profit_loss_by_month[0].0.to_string(), "August 2024");
        assert!(approx_eq(stats.profit_loss_by_month[0].1, 900.0));
        assert!(approx_eq(stats.mean_monthly_profit_loss, 900.0));
    }

    #[test]
    fn test_empty_rows() {
        assert!(category_totals(&[]).is_empty());
        assert!(monthly_totals(&[]).is_empty());

        let stats = statistics(&[], Some(1000.0), Some(1000.0));
        assert_eq!(stats, Statistics::default());
        assert_eq!(stats.total_income, 0.0);
        assert!(!stats.mean_monthly_expenses.is_nan());
    }
}

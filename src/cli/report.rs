use super::ui;
use crate::core::report::{self, Income, Report};
use crate::core::{CurrencyRateProvider, REFERENCE_CURRENCY};
use crate::store::Ledger;
use comfy_table::Cell;
use std::collections::BTreeSet;

impl Report {
    pub fn category_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Category"),
            ui::header_cell(&format!("Total ({REFERENCE_CURRENCY})")),
        ]);
        for (category, total) in &self.category_totals {
            table.add_row(vec![Cell::new(category), ui::amount_cell(*total)]);
        }
        table.add_row(vec![
            Cell::new("Total"),
            ui::total_cell(self.statistics.total_expenses),
        ]);
        table.to_string()
    }

    pub fn monthly_table(&self) -> String {
        let categories: BTreeSet<&String> = self
            .monthly_totals
            .iter()
            .flat_map(|m| m.categories.keys())
            .collect();

        let mut header = vec![ui::header_cell("Month")];
        header.extend(categories.iter().map(|c| ui::header_cell(c)));
        header.push(ui::header_cell("Total"));
        header.push(ui::header_cell("Profit/Loss"));

        let mut table = ui::new_styled_table();
        table.set_header(header);

        // Most recent month first
        for (month, (_, profit_loss)) in self
            .monthly_totals
            .iter()
            .zip(&self.statistics.profit_loss_by_month)
            .rev()
        {
            let mut row = vec![Cell::new(month.month.to_string())];
            row.extend(categories.iter().map(|c| {
                month
                    .categories
                    .get(*c)
                    .map_or_else(|| Cell::new("-"), |v| ui::amount_cell(*v))
            }));
            row.push(ui::total_cell(month.total));
            row.push(ui::profit_loss_cell(*profit_loss));
            table.add_row(row);
        }
        table.to_string()
    }

    pub fn statistics_table(&self) -> String {
        let stats = &self.statistics;
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Statistic"),
            ui::header_cell(&format!("Value ({REFERENCE_CURRENCY})")),
        ]);
        table.add_row(vec![
            Cell::new("Total Income"),
            ui::amount_cell(stats.total_income),
        ]);
        table.add_row(vec![
            Cell::new("Total Expenses"),
            ui::amount_cell(stats.total_expenses),
        ]);
        table.add_row(vec![
            Cell::new("Total Profit/Loss"),
            ui::profit_loss_cell(stats.total_profit_loss),
        ]);
        table.add_row(vec![
            Cell::new("Mean Monthly Expenses"),
            ui::amount_cell(stats.mean_monthly_expenses),
        ]);
        table.add_row(vec![
            Cell::new("Mean Monthly Profit/Loss"),
            ui::profit_loss_cell(stats.mean_monthly_profit_loss),
        ]);
        table.to_string()
    }

    pub fn display(&self) -> String {
        if self.is_empty() {
            return "No expenses to display.".to_string();
        }

        let mut output = format!(
            "{}\n\n{}\n\n{}\n\n{}\n\n{}",
            ui::style_text("Expenses by Category", ui::StyleType::Title),
            self.category_table(),
            ui::style_text("Monthly Expenses", ui::StyleType::Title),
            self.monthly_table(),
            self.statistics_table(),
        );

        let income = self.monthly_income.map_or_else(
            || ui::style_text("not set", ui::StyleType::Subtle),
            |v| ui::style_text(&format!("{v:.2}"), ui::StyleType::TotalValue),
        );
        output.push_str(&format!(
            "\n\n{} {}",
            ui::style_text(
                &format!("Monthly Income ({REFERENCE_CURRENCY}):"),
                ui::StyleType::TotalLabel
            ),
            income
        ));

        if self.dropped > 0 {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!(
                        "{} expense(s) left out: currency could not be converted",
                        self.dropped
                    ),
                    ui::StyleType::Error
                )
            ));
        }
        if self.approximate {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    "Some amounts use fallback exchange rates and are approximate",
                    ui::StyleType::Subtle
                )
            ));
        }
        output
    }
}

pub async fn run(
    ledger: &Ledger,
    income: Option<&Income>,
    currency_provider: &(dyn CurrencyRateProvider + Send + Sync),
) {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let report = report::build_report(ledger.get_all(), income, currency_provider).await;
    pb.finish_and_clear();

    println!("{}", report.display());
    ui::print_separator();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExpenseRecord;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;

    struct NoRates;

    #[async_trait]
    impl CurrencyRateProvider for NoRates {
        async fn get_rate(&self, from: &str, _to: &str) -> Result<f64> {
            Err(anyhow!("no rate for {from}"))
        }
    }

    fn record(category: &str, cost: f64, date: &str, currency: &str) -> ExpenseRecord {
        ExpenseRecord::new(category, cost, "", date, currency, "").unwrap()
    }

    #[tokio::test]
    async fn test_display_report() {
        let records = vec![
            record("Rent", 400.0, "01-08-2024", "EUR"),
            record("Food", 25.5, "12-09-2024", "EUR"),
            record("Gadgets", 10.0, "12-09-2024", "XYZ"),
        ];
        let income = Income {
            amount: 1000.0,
            currency: "EUR".to_string(),
        };

        let report = report::build_report(&records, Some(&income), &NoRates).await;
        let output = report.display();

        assert!(output.contains("Expenses by Category"));
        assert!(output.contains("August 2024"));
        assert!(output.contains("September 2024"));
        assert!(output.contains("425.50"));
        assert!(output.contains("2000.00"));
        assert!(output.contains("1574.50"));
        assert!(output.contains("1 expense(s) left out"));
        let september = output.find("September 2024").unwrap();
        let august = output.find("August 2024").unwrap();
        assert!(september < august);
    }

    #[tokio::test]
    async fn test_display_empty_report() {
        let report = report::build_report(&[], None, &NoRates).await;
        assert_eq!(report.display(), "No expenses to display.");
    }
}

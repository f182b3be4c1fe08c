use super::ui;
use crate::core::ExpenseRecord;
use crate::store::Ledger;
use comfy_table::Cell;

pub fn display_as_table(records: &[ExpenseRecord]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Category"),
        ui::header_cell("Cost"),
        ui::header_cell("Currency"),
        ui::header_cell("Account"),
        ui::header_cell("Note"),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(record.date_string()),
            Cell::new(record.category()),
            ui::amount_cell(record.cost()),
            Cell::new(record.currency()),
            Cell::new(record.account()),
            Cell::new(record.note()),
        ]);
    }

    table.to_string()
}

pub fn run(ledger: &Ledger) {
    if ledger.is_empty() {
        println!("No expenses recorded yet.");
        return;
    }

    println!(
        "Expenses in {}\n",
        ui::style_text(&ledger.path().display().to_string(), ui::StyleType::Subtle)
    );
    println!("{}", display_as_table(ledger.get_all()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_records_in_order() {
        let records = vec![
            ExpenseRecord::new("Food", 15.99, "Lunch", "17-08-2024", "USD", "Credit Card")
                .unwrap(),
            ExpenseRecord::new("Transport", 2.5, "Bus fare", "16-08-2024", "EUR", "Cash")
                .unwrap(),
        ];

        let output = display_as_table(&records);

        assert!(output.contains("15.99"));
        assert!(output.contains("Credit Card"));
        assert!(output.contains("16-08-2024"));
        let food = output.find("Lunch").unwrap();
        let bus = output.find("Bus fare").unwrap();
        assert!(food < bus);
    }
}

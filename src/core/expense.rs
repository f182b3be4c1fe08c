//! Expense records and the per-field validation rules applied to them.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// Date format used in the ledger file and on the command line.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("date must match DD-MM-YYYY, got '{0}'")]
    InvalidDate(String),
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("cost must be a positive number, got {0}")]
    InvalidCost(f64),
    #[error("currency must not be empty")]
    EmptyCurrency,
    #[error("currency code must be ASCII letters or digits, got '{0}'")]
    InvalidCurrency(String),
}

pub fn validate_date(date: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))
}

pub fn validate_category(category: &str) -> Result<String, ValidationError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    Ok(category.to_string())
}

pub fn validate_cost(cost: f64) -> Result<f64, ValidationError> {
    if !cost.is_finite() || cost <= 0.0 {
        return Err(ValidationError::InvalidCost(cost));
    }
    Ok(cost)
}

pub fn validate_currency(currency: &str) -> Result<String, ValidationError> {
    let currency = currency.trim();
    if currency.is_empty() {
        return Err(ValidationError::EmptyCurrency);
    }
    // The code becomes a path segment of the rate service URL.
    if !currency.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidCurrency(currency.to_string()));
    }
    Ok(currency.to_string())
}

/// A single validated expense. Fields are only reachable through accessors so
/// a record cannot change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    category: String,
    cost: f64,
    note: String,
    date: NaiveDate,
    currency: String,
    account: String,
}

impl ExpenseRecord {
    /// Validates every field and builds the record. The date is checked first.
    pub fn new(
        category: &str,
        cost: f64,
        note: &str,
        date: &str,
        currency: &str,
        account: &str,
    ) -> Result<Self, ValidationError> {
        let date = validate_date(date)?;
        Ok(ExpenseRecord {
            category: validate_category(category)?,
            cost: validate_cost(cost)?,
            note: note.to_string(),
            date,
            currency: validate_currency(currency)?,
            account: account.to_string(),
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The date in its `DD-MM-YYYY` textual form.
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn month_key(&self) -> MonthKey {
        MonthKey::from(self.date)
    }
}

/// One row of the ledger file. Column order here is the file's column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvRow {
    pub category: String,
    pub cost: f64,
    pub note: String,
    pub date: String,
    pub currency: String,
    pub account: String,
}

impl From<&ExpenseRecord> for CsvRow {
    fn from(record: &ExpenseRecord) -> Self {
        CsvRow {
            category: record.category.clone(),
            cost: record.cost,
            note: record.note.clone(),
            date: record.date_string(),
            currency: record.currency.clone(),
            account: record.account.clone(),
        }
    }
}

impl TryFrom<CsvRow> for ExpenseRecord {
    type Error = ValidationError;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        ExpenseRecord::new(
            &row.category,
            row.cost,
            &row.note,
            &row.date,
            &row.currency,
            &row.account,
        )
    }
}

/// Calendar month and year, ordered chronologically. Displays as `August 2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    first_day: NaiveDate,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| MonthKey { first_day })
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        MonthKey {
            first_day: date - Days::new(u64::from(date.day0())),
        }
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.first_day.format("%B %Y"))
    }
}

/// Maps a `DD-MM-YYYY` date to the month it falls in.
pub fn month_key(date: &str) -> Result<MonthKey, ValidationError> {
    validate_date(date).map(MonthKey::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_construction() {
        let record =
            ExpenseRecord::new("Food", 15.99, "Lunch", "17-08-2024", "USD", "Credit Card")
                .unwrap();
        assert_eq!(record.category(), "Food");
        assert_eq!(record.cost(), 15.99);
        assert_eq!(record.note(), "Lunch");
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2024, 8, 17).unwrap());
        assert_eq!(record.date_string(), "17-08-2024");
        assert_eq!(record.currency(), "USD");
        assert_eq!(record.account(), "Credit Card");
    }

    #[test]
    fn test_date_is_validated_first() {
        let err = ExpenseRecord::new("", -1.0, "", "2024-08-17", "", "").unwrap_err();
        assert_eq!(err, ValidationError::InvalidDate("2024-08-17".to_string()));
        assert!(err.to_string().contains("date must match DD-MM-YYYY"));
    }

    #[test]
    fn test_invalid_fields() {
        assert_eq!(
            ExpenseRecord::new("  ", 1.0, "", "01-01-2024", "EUR", "").unwrap_err(),
            ValidationError::EmptyCategory
        );
        assert_eq!(
            ExpenseRecord::new("Food", 0.0, "", "01-01-2024", "EUR", "").unwrap_err(),
            ValidationError::InvalidCost(0.0)
        );
        assert!(matches!(
            ExpenseRecord::new("Food", f64::NAN, "", "01-01-2024", "EUR", "").unwrap_err(),
            ValidationError::InvalidCost(_)
        ));
        assert_eq!(
            ExpenseRecord::new("Food", 1.0, "", "01-01-2024", "", "").unwrap_err(),
            ValidationError::EmptyCurrency
        );
    }

    #[test]
    fn test_any_non_empty_currency_is_accepted() {
        let record = ExpenseRecord::new("Food", 1.0, "", "01-01-2024", "XYZ", "").unwrap();
        assert_eq!(record.currency(), "XYZ");
    }

    #[test]
    fn test_currency_with_separators_is_rejected() {
        for currency in ["USD/EUR", "US D", "../x", "EUR?a=1", "€"] {
            assert_eq!(
                validate_currency(currency).unwrap_err(),
                ValidationError::InvalidCurrency(currency.to_string())
            );
        }
        assert_eq!(validate_currency(" usd ").unwrap(), "usd");
    }

    #[test]
    fn test_impossible_calendar_date_is_rejected() {
        assert!(validate_date("31-02-2024").is_err());
        assert!(validate_date("17/08/2024").is_err());
        assert!(validate_date("").is_err());
    }

    #[test]
    fn test_month_key_collapses_days() {
        let a = month_key("05-08-2024").unwrap();
        let b = month_key("17-08-2024").unwrap();
        let c = month_key("05-09-2024").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "August 2024");
        assert_eq!(c.to_string(), "September 2024");
    }

    #[test]
    fn test_month_key_ordering_is_chronological() {
        let dec = MonthKey::new(2023, 12).unwrap();
        let jan = MonthKey::new(2024, 1).unwrap();
        let aug = MonthKey::new(2024, 8).unwrap();
        assert!(dec < jan);
        assert!(jan < aug);
        assert!(MonthKey::new(2024, 13).is_none());
    }

    #[test]
    fn test_csv_row_conversion() {
        let record = ExpenseRecord::new("Transport", 2.5, "Bus fare", "17-08-2024", "USD", "Cash")
            .unwrap();
        let row = CsvRow::from(&record);
        assert_eq!(row.date, "17-08-2024");
        let back = ExpenseRecord::try_from(row).unwrap();
        assert_eq!(back, record);
    }
}

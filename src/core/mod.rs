//! Core business logic: expense records, currency normalization and reporting

pub mod analytics;
pub mod config;
pub mod currency;
pub mod expense;
pub mod log;
pub mod normalize;
pub mod report;

// Re-export main types for cleaner imports
pub use currency::{CurrencyRateProvider, RateQuote, REFERENCE_CURRENCY};
pub use expense::{ExpenseRecord, MonthKey, ValidationError};
pub use normalize::{NormalizedRow, Normalizer};
pub use report::{Income, Report};

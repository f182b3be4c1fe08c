//! Terminal front end for the expense ledger

pub mod add;
pub mod list;
pub mod report;
pub mod setup;
pub mod ui;

pub mod ledger;

pub use ledger::{Ledger, LedgerError, LoadPolicy};

use crate::core::expense::{CsvRow, ExpenseRecord, ValidationError};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to write ledger {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to load ledger {} at line {line}: {reason}", path.display())]
    Load {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}

/// How malformed rows are treated while loading the ledger file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// The first malformed row aborts the load.
    #[default]
    Strict,
    /// Malformed rows are logged and skipped.
    SkipInvalid,
}

/// Append-only expense ledger backed by a CSV file.
///
/// The ledger file has no locking; two processes appending to the same file
/// may interleave rows or both write a header.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    records: Vec<ExpenseRecord>,
}

impl Ledger {
    /// Loads the ledger at `path`, aborting on the first malformed row.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        Self::load_with(path, LoadPolicy::Strict)
    }

    /// Loads the ledger at `path`. A missing file is an empty ledger.
    pub fn load_with<P: AsRef<Path>>(path: P, policy: LoadPolicy) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!("Ledger file {} not found, starting empty", path.display());
            return Ok(Ledger {
                path,
                records: Vec::new(),
            });
        }

        let load_error = |line: u64, reason: String| LedgerError::Load {
            path: path.clone(),
            line,
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .from_path(&path)
            .map_err(|e| load_error(0, e.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|e| load_error(1, e.to_string()))?
            .clone();

        let mut records = Vec::new();
        let mut row = csv::StringRecord::new();
        loop {
            match reader.read_record(&mut row) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    let line = e.position().map_or(0, |p| p.line());
                    let wrong_field_count =
                        matches!(e.kind(), csv::ErrorKind::UnequalLengths { .. });
                    if wrong_field_count && policy == LoadPolicy::SkipInvalid {
                        warn!(line, reason = %e, "Skipping malformed ledger row");
                        continue;
                    }
                    return Err(load_error(line, e.to_string()));
                }
            }

            let line = row.position().map_or(0, |p| p.line());
            let parsed = row
                .deserialize::<CsvRow>(Some(&headers))
                .map_err(|e| e.to_string())
                .and_then(|csv_row| ExpenseRecord::try_from(csv_row).map_err(|e| e.to_string()));

            match (parsed, policy) {
                (Ok(record), _) => records.push(record),
                (Err(reason), LoadPolicy::Strict) => return Err(load_error(line, reason)),
                (Err(reason), LoadPolicy::SkipInvalid) => {
                    warn!(line, %reason, "Skipping malformed ledger row");
                }
            }
        }

        info!("Loaded {} expenses from {}", records.len(), path.display());
        Ok(Ledger { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validates and records a new expense.
    ///
    /// The row is written to the ledger file before it becomes visible in
    /// memory, so a failed write leaves the ledger unchanged.
    pub fn add(
        &mut self,
        category: &str,
        cost: f64,
        note: &str,
        date: &str,
        currency: &str,
        account: &str,
    ) -> Result<ExpenseRecord, LedgerError> {
        let record = ExpenseRecord::new(category, cost, note, date, currency, account)?;
        self.append_to_file(&record)
            .map_err(|source| LedgerError::Storage {
                path: self.path.clone(),
                source,
            })?;
        debug!(category = record.category(), cost = record.cost(), "Recorded expense");
        self.records.push(record.clone());
        Ok(record)
    }

    fn append_to_file(&self, record: &ExpenseRecord) -> Result<(), csv::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let needs_header = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        if !needs_header {
            // A hand-edited file may lack the final line terminator.
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                file.write_all(b"\n")?;
            }
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(CsvRow::from(record))?;
        writer.flush()?;
        Ok(())
    }

    /// All recorded expenses in insertion order.
    pub fn get_all(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sums raw costs per category without any currency conversion.
    pub fn summary_by_category(&self) -> BTreeMap<String, f64> {
        let mut summary = BTreeMap::new();
        for record in &self.records {
            *summary.entry(record.category().to_string()).or_insert(0.0) += record.cost();
        }
        summary
    }
}

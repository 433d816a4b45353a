// In crates/tracker/src/lib.rs

//! A durable ledger of open lots, stored as a CSV file with the header
//! `Symbol,BuyPrice,Volume,BuyTime`.
//!
//! Every mutation rewrites the whole file before returning. Records are
//! addressed by their position in the ledger; removing a record shifts every
//! later record down by one, so callers must look an index up again before
//! each removal.
//!
//! A row whose cells cannot be read as a lot (an empty `BuyPrice`, say) is
//! kept verbatim and written back on every save, but it is invisible to the
//! lot queries. It still occupies an index.

use core_types::{Lot, Symbol};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::Decimal;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub mod error;

pub use error::{Error, Result};

/// Column headers of the ledger file, in order.
pub const LEDGER_COLUMNS: [&str; 4] = ["Symbol", "BuyPrice", "Volume", "BuyTime"];

/// The only lot size `get_oldest_position` will return.
pub const STANDARD_CLIP: i64 = 100;

/// One row of the ledger file.
#[derive(Debug, Clone, PartialEq)]
enum Record {
    Lot(Lot),
    /// A row that did not decode, carried through untouched.
    Unreadable(StringRecord),
}

impl Record {
    fn lot(&self) -> Option<&Lot> {
        match self {
            Record::Lot(lot) => Some(lot),
            Record::Unreadable(_) => None,
        }
    }
}

/// The position ledger for one team/strategy pair.
#[derive(Debug)]
pub struct PositionTracker {
    path: PathBuf,
    records: Vec<Record>,
}

impl PositionTracker {
    /// Opens the ledger at `{log_dir}/{team_name}_{strategy_name}_tracker.csv`.
    ///
    /// The directory is created if needed. A missing, empty or unreadable file
    /// yields an empty ledger; only a failure to create the directory is an error.
    pub fn open(log_dir: impl AsRef<Path>, team_name: &str, strategy_name: &str) -> Result<Self> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;
        let path = log_dir.join(format!("{team_name}_{strategy_name}_tracker.csv"));
        Ok(Self::at_path(path))
    }

    /// Opens a ledger at an explicit file path. The parent directory must exist
    /// before the first mutation.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load_ledger(&path);
        tracing::debug!(path = %path.display(), records = records.len(), "Position ledger loaded.");
        Self { path, records }
    }

    /// Appends a lot and persists the ledger. Duplicates are not checked.
    pub fn add_position(
        &mut self,
        symbol: Symbol,
        buy_price: Decimal,
        volume: i64,
        buy_time: impl Into<String>,
    ) -> Result<()> {
        self.records.push(Record::Lot(Lot {
            symbol,
            buy_price,
            volume,
            buy_time: buy_time.into(),
        }));
        self.save()
    }

    /// Returns the lowest-index lot of `symbol` whose volume is exactly one
    /// standard clip, together with its index.
    pub fn get_oldest_position(&self, symbol: &Symbol) -> Option<(usize, &Lot)> {
        self.indexed_positions()
            .find(|(_, lot)| &lot.symbol == symbol && lot.volume == STANDARD_CLIP)
    }

    /// Removes the record at `index` and persists the ledger.
    ///
    /// Returns `Ok(false)` without touching the file when no such index exists.
    pub fn remove_position(&mut self, index: usize) -> Result<bool> {
        if index >= self.records.len() {
            return Ok(false);
        }
        self.records.remove(index);
        self.save()?;
        Ok(true)
    }

    /// Discards the in-memory ledger and reads the file again.
    pub fn reload(&mut self) {
        self.records = load_ledger(&self.path);
    }

    /// Every readable lot, in ledger order.
    pub fn positions(&self) -> impl Iterator<Item = &Lot> + '_ {
        self.records.iter().filter_map(Record::lot)
    }

    /// Every readable lot with its ledger index.
    pub fn indexed_positions(&self) -> impl Iterator<Item = (usize, &Lot)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| record.lot().map(|lot| (index, lot)))
    }

    pub fn positions_for<'a>(&'a self, symbol: &'a Symbol) -> impl Iterator<Item = &'a Lot> + 'a {
        self.positions().filter(move |lot| &lot.symbol == symbol)
    }

    /// Sum of the volume of every lot held for `symbol`.
    pub fn total_volume(&self, symbol: &Symbol) -> i64 {
        self.positions_for(symbol).map(|lot| lot.volume).sum()
    }

    /// Number of ledger rows, unreadable ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows kept verbatim because they did not decode as lots.
    pub fn unreadable_rows(&self) -> usize {
        self.records.iter().filter(|record| record.lot().is_none()).count()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the file with the full in-memory ledger.
    fn save(&self) -> Result<()> {
        let mut writer = WriterBuilder::new().has_headers(false).from_path(&self.path)?;
        writer.write_record(LEDGER_COLUMNS)?;
        for record in &self.records {
            match record {
                Record::Lot(lot) => writer.serialize(lot)?,
                Record::Unreadable(raw) => writer.write_record(raw)?,
            }
        }
        writer.flush()?;
        Ok(())
    }
}

fn load_ledger(path: &Path) -> Vec<Record> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot stat tracker file. Starting fresh.");
            return Vec::new();
        }
    };

    if metadata.len() == 0 {
        tracing::info!(path = %path.display(), "Tracker file is empty. Starting fresh.");
        return Vec::new();
    }

    match read_ledger(path) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Error loading tracker data. Starting fresh.");
            Vec::new()
        }
    }
}

/// Reads every row as raw cells first, so an empty cell never fails the file.
/// Only a CSV-level error or a foreign header rejects the whole ledger.
fn read_ledger(path: &Path) -> Result<Vec<Record>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    if headers.iter().ne(LEDGER_COLUMNS) {
        return Err(Error::UnexpectedHeader(headers.iter().collect::<Vec<_>>().join(",")));
    }

    let mut records = Vec::new();
    for (row, raw) in reader.records().enumerate() {
        let raw = raw?;
        match raw.deserialize::<Lot>(Some(&headers)) {
            Ok(lot) => records.push(Record::Lot(lot)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    row = row + 1,
                    error = %e,
                    "Ledger row is not a valid lot. Keeping it as is."
                );
                records.push(Record::Unreadable(raw));
            }
        }
    }
    Ok(records)
}

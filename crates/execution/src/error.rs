// In crates/execution/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Order rejected: {reason}")]
    Rejected { reason: String },

    /// The fill was applied in memory but the ledger could not be persisted.
    #[error("Ledger update failed: {0}")]
    Ledger(#[from] tracker::Error),
}

impl Error {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Error::Rejected { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

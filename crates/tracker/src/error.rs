// In crates/tracker/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Ledger I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ledger CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Ledger header `{0}` does not match Symbol,BuyPrice,Volume,BuyTime")]
    UnexpectedHeader(String),
}

pub type Result<T> = std::result::Result<T, Error>;

// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Unknown order side: {0}")]
    UnknownSide(String),

    #[error("Symbol must not be empty")]
    EmptySymbol,
}

pub type Result<T> = std::result::Result<T, Error>;

// In crates/engine/src/feed.rs

use anyhow::{Context, Result};
use core_types::Tick;
use std::io::Read;
use std::path::Path;

/// Streams ticks from a CSV file with header `ShareCode,LastPrice[,TradeDateTime]`.
///
/// Rows are decoded lazily; a bad row surfaces as an `Err` item and does not
/// end the stream.
pub fn read_ticks(path: &Path) -> Result<impl Iterator<Item = Result<Tick>> + use<>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open tick file: {}", path.display()))?;
    Ok(ticks_from_reader(file))
}

/// Same as [`read_ticks`] over any reader.
pub fn ticks_from_reader<R: Read>(reader: R) -> impl Iterator<Item = Result<Tick>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize::<Tick>()
        .map(|row| row.context("malformed tick row"))
}

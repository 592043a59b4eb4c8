use crate::application::replay::Command;
use crate::error::{PaymentError, Result};
use std::io::Read;

/// Reads lifecycle commands from a CSV source.
///
/// Expects the header `command, invoice, total, amount, decline`. Whitespace is
/// trimmed and trailing empty columns may be left out.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes commands; a malformed row yields an error and the
    /// iterator carries on with the next one.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PaymentError::from))
    }
}

use crate::application::replay::LedgerRow;
use crate::error::Result;
use std::io::Write;

/// Writes ledger rows as CSV with the header `invoice,type,amount,note`.
pub struct LedgerWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> LedgerWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_rows(&mut self, rows: impl IntoIterator<Item = LedgerRow>) -> Result<()> {
        let mut wrote_any = false;
        for row in rows {
            self.writer.serialize(row)?;
            wrote_any = true;
        }
        if !wrote_any {
            self.writer.write_record(["invoice", "type", "amount", "note"])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

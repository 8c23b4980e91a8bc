use crate::core::participant::ParticipantId;
use crate::core::record::{Amount, DebtRecord, RecordError};
use crate::core::transfer::Transfer;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Errors arising from reading or writing the row format.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Malformed row: wrong field count or a non-numeric amount.
    #[error("malformed row: {0}")]
    Csv(#[from] csv::Error),
    /// Structurally valid row carrying an invalid record.
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Input row shape: `creditor,debtor,amount`, no header.
#[derive(Debug, Deserialize)]
struct RecordRow {
    creditor: String,
    debtor: String,
    amount: Amount,
}

/// Output row shape: `payer,receiver,amount`, no header.
#[derive(Debug, Serialize)]
struct TransferRow<'a> {
    payer: &'a str,
    receiver: &'a str,
    amount: Amount,
}

/// Read and validate debt records from headerless CSV rows.
///
/// Any malformed or invalid row aborts the whole read; no partial
/// record list is ever returned.
pub fn read_records<R: io::Read>(reader: R) -> Result<Vec<DebtRecord>, FormatError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        let row: RecordRow = row?;
        records.push(DebtRecord::new(
            ParticipantId::new(row.creditor),
            ParticipantId::new(row.debtor),
            row.amount,
        )?);
    }
    Ok(records)
}

/// Parse records from in-memory text (the worker's object bodies).
pub fn parse_records(text: &str) -> Result<Vec<DebtRecord>, FormatError> {
    read_records(text.as_bytes())
}

/// Write transfers as headerless CSV rows, one per transfer.
pub fn write_transfers<W: io::Write>(
    writer: W,
    transfers: &[Transfer],
) -> Result<(), FormatError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for transfer in transfers {
        csv_writer.serialize(TransferRow {
            payer: transfer.payer.as_str(),
            receiver: transfer.receiver.as_str(),
            amount: transfer.amount,
        })?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Serialize transfers to an in-memory string (the worker's result bodies).
pub fn transfers_to_string(transfers: &[Transfer]) -> Result<String, FormatError> {
    let mut buf = Vec::new();
    write_transfers(&mut buf, transfers)?;
    Ok(String::from_utf8(buf)?)
}

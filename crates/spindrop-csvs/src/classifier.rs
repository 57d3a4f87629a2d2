/*!
# Allocation Classifier

Splits each recipient's allocation into an unlocked and a locked portion
according to the airdrop's [`DistributionMode`] and produces the canonical
claim rows consumed by the commitment storage service.
*/

use csv::{Reader, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::{
    errors::{CsvError, CsvResult},
    parser::{parse_allocations, ParseOptions, ParsedAllocations},
    schemas::{ClaimRow, DistributionMode, Recipient, CLAIM_CATEGORY, CLAIM_ROW_CSV_HEADERS},
};

/// Classify one recipient.
pub fn classify_recipient(recipient: &Recipient, mode: DistributionMode) -> ClaimRow {
    let (amount_unlocked, amount_locked) = match mode {
        DistributionMode::Instant => (recipient.amount, 0),
        DistributionMode::Vested => (0, recipient.amount),
    };

    ClaimRow {
        pubkey: recipient.address.clone(),
        amount_unlocked,
        amount_locked,
        category: CLAIM_CATEGORY.to_string(),
    }
}

/// Classify every recipient, preserving input order. Never drops a row.
pub fn classify_recipients(recipients: &[Recipient], mode: DistributionMode) -> Vec<ClaimRow> {
    recipients
        .iter()
        .map(|recipient| classify_recipient(recipient, mode))
        .collect()
}

/// Parsed allocations together with their canonical rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedAllocations {
    pub parsed: ParsedAllocations,
    pub rows: Vec<ClaimRow>,
}

/// Parse an allocation source and classify it in one pass.
pub fn transform_allocations<R: Read>(
    reader: R,
    options: ParseOptions,
    mode: DistributionMode,
) -> CsvResult<TransformedAllocations> {
    let parsed = parse_allocations(reader, options)?;
    let rows = classify_recipients(&parsed.recipients, mode);
    Ok(TransformedAllocations { parsed, rows })
}

// ================================================================================================
// CSV I/O
// ================================================================================================

/// Serialize claim rows, header first, to any writer
pub fn write_claim_rows<W: Write>(writer: W, rows: &[ClaimRow]) -> CsvResult<()> {
    // Header written by hand so an empty row set still carries it
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(CLAIM_ROW_CSV_HEADERS)?;

    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render claim rows as a CSV string
pub fn claim_rows_to_string(rows: &[ClaimRow]) -> CsvResult<String> {
    let mut buf = Vec::new();
    write_claim_rows(&mut buf, rows)?;
    String::from_utf8(buf).map_err(|e| CsvError::InvalidFormat(e.to_string()))
}

/// Write claim rows to a file
pub fn write_claim_rows_csv<P: AsRef<Path>>(path: P, rows: &[ClaimRow]) -> CsvResult<()> {
    let file = File::create(path)?;
    write_claim_rows(file, rows)
}

/// Read and validate claim rows
pub fn read_claim_rows<R: Read>(reader: R) -> CsvResult<Vec<ClaimRow>> {
    let mut rdr = Reader::from_reader(reader);

    let headers = rdr.headers()?;
    validate_headers(headers.iter(), CLAIM_ROW_CSV_HEADERS, "claim rows")?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: ClaimRow = result?;
        rows.push(row);
    }

    Ok(rows)
}

/// Read and validate a claim-row file
pub fn read_claim_rows_csv<P: AsRef<Path>>(path: P) -> CsvResult<Vec<ClaimRow>> {
    let file = File::open(path)?;
    read_claim_rows(file)
}

fn validate_headers<'a, I>(actual: I, expected: &[&str], file_type: &str) -> CsvResult<()>
where
    I: Iterator<Item = &'a str>,
{
    let actual_headers: Vec<&str> = actual.collect();

    if actual_headers.len() != expected.len() {
        return Err(CsvError::SchemaValidation(format!(
            "{}: expected {} headers, found {}",
            file_type,
            expected.len(),
            actual_headers.len()
        )));
    }

    for (i, (actual, expected)) in actual_headers.iter().zip(expected.iter()).enumerate() {
        if actual != expected {
            return Err(CsvError::SchemaValidation(format!(
                "{}: header {} should be '{}', found '{}'",
                file_type,
                i + 1,
                expected,
                actual
            )));
        }
    }

    Ok(())
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn recipients() -> Vec<Recipient> {
        vec![
            Recipient::new("9kSXBczGtVeUTRfZnwMpz4mF8d86qjXsPjFb9RkPyJLF", 1_000_000_000),
            Recipient::new("11111111111111111111111111111112", 0),
            Recipient::new("9kSXBczGtVeUTRfZnwMpz4mF8d86qjXsPjFb9RkPyJLF", 42),
        ]
    }

    #[test]
    fn test_instant_unlocks_everything() {
        let rows = classify_recipients(&recipients(), DistributionMode::Instant);

        assert_eq!(rows.len(), 3);
        for (row, recipient) in rows.iter().zip(recipients()) {
            assert_eq!(row.pubkey, recipient.address);
            assert_eq!(row.amount_unlocked, recipient.amount);
            assert_eq!(row.amount_locked, 0);
            assert_eq!(row.category, CLAIM_CATEGORY);
        }
    }

    #[test]
    fn test_vested_locks_everything() {
        let rows = classify_recipients(&recipients(), DistributionMode::Vested);

        assert_eq!(rows.len(), 3);
        for (row, recipient) in rows.iter().zip(recipients()) {
            assert_eq!(row.amount_unlocked, 0);
            assert_eq!(row.amount_locked, recipient.amount);
        }
    }

    #[test]
    fn test_transform_matches_storage_format() {
        let text = "Recipient,Amount\n9kSXBczGtVeUTRfZnwMpz4mF8d86qjXsPjFb9RkPyJLF,1\n";
        let transformed =
            transform_allocations(text.as_bytes(), ParseOptions::new(9), DistributionMode::Instant)
                .unwrap();

        assert_eq!(
            claim_rows_to_string(&transformed.rows).unwrap(),
            "pubkey,amount_unlocked,amount_locked,category\n\
             9kSXBczGtVeUTRfZnwMpz4mF8d86qjXsPjFb9RkPyJLF,1000000000,0,Staker\n"
        );
        assert_eq!(transformed.parsed.total_amount, 1_000_000_000);
    }

    #[test]
    fn test_empty_row_set_still_has_header() {
        assert_eq!(
            claim_rows_to_string(&[]).unwrap(),
            "pubkey,amount_unlocked,amount_locked,category\n"
        );
    }

    #[test]
    fn test_write_and_read_claim_rows_csv() {
        let rows = classify_recipients(&recipients(), DistributionMode::Vested);

        let temp_file = NamedTempFile::new().unwrap();
        write_claim_rows_csv(temp_file.path(), &rows).unwrap();
        let read_rows = read_claim_rows_csv(temp_file.path()).unwrap();

        assert_eq!(rows, read_rows);
    }

    #[test]
    fn test_read_claim_rows_rejects_wrong_headers() {
        let text = "pubkey,unlocked,locked,category\naddr,1,0,Staker\n";
        let result = read_claim_rows(text.as_bytes());

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("header 2 should be 'amount_unlocked'"));
    }
}

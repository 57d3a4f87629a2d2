/*!
# Allocation Parser

Turns a human-authored allocation file into typed [`Recipient`] records.

The first non-blank line is always treated as a header and discarded. Every
following non-blank line holds `address,amount`, where `amount` is a decimal
number of whole tokens. Amounts are scaled by `10^decimals` and floored, so the encoded
amount is never larger than the literal value written in the file.

Fields are split on commas only. Quotes carry no meaning, so a stray `"`
spoils its own row and nothing else.

Rows are produced lazily by [`AllocationReader`]; [`parse_allocations`]
drains the reader and aggregates totals.
*/

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use crate::{
    errors::{CsvError, CsvResult},
    schemas::{ParseMode, Recipient, MAX_SUPPORTED_DECIMALS},
};

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Mint decimals used to scale whole-token amounts
    pub decimals: u8,
    /// Malformed row policy
    pub mode: ParseMode,
}

impl ParseOptions {
    pub fn new(decimals: u8) -> Self {
        Self {
            decimals,
            mode: ParseMode::Lenient,
        }
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn strict(self) -> Self {
        self.with_mode(ParseMode::Strict)
    }
}

/// Result of draining an allocation file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAllocations {
    /// Valid recipients in input order
    pub recipients: Vec<Recipient>,
    /// Number of valid recipients (the distributor's node count)
    pub max_num_nodes: u64,
    /// Sum of all amounts, smallest unit
    pub total_amount: u64,
    /// Rows dropped under the lenient policy
    pub dropped_rows: usize,
}

/// Lazy row iterator over an allocation file.
///
/// Yields one `Ok(Recipient)` per valid row. In lenient mode malformed rows
/// are skipped and counted; in strict mode the first malformed row is yielded
/// as an error. I/O and UTF-8 errors are always yielded as errors.
pub struct AllocationReader<R> {
    inner: csv::Reader<R>,
    options: ParseOptions,
    record: StringRecord,
    header_seen: bool,
    dropped: usize,
}

impl AllocationReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P, options: ParseOptions) -> CsvResult<Self> {
        let file = File::open(path)?;
        Self::new(file, options)
    }
}

impl<R: Read> AllocationReader<R> {
    pub fn new(reader: R, options: ParseOptions) -> CsvResult<Self> {
        if options.decimals > MAX_SUPPORTED_DECIMALS {
            return Err(CsvError::UnsupportedDecimals(options.decimals));
        }

        // Header is skipped in next() so blank leading lines don't count as it
        let inner = ReaderBuilder::new()
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        Ok(Self {
            inner,
            options,
            record: StringRecord::new(),
            header_seen: false,
            dropped: 0,
        })
    }

    /// Rows dropped so far under the lenient policy
    pub fn dropped_rows(&self) -> usize {
        self.dropped
    }
}

impl<R: Read> Iterator for AllocationReader<R> {
    type Item = CsvResult<Recipient>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.read_record(&mut self.record) {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }

            if self.record.iter().all(str::is_empty) {
                continue;
            }
            if !self.header_seen {
                self.header_seen = true;
                continue;
            }

            let line = self.record.position().map(|p| p.line()).unwrap_or_default();
            match parse_record(&self.record, line, &self.options) {
                Ok(recipient) => return Some(Ok(recipient)),
                Err(e) if self.options.mode == ParseMode::Lenient => {
                    warn!(line, error = %e, "dropping malformed allocation row");
                    self.dropped += 1;
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Drain an allocation source and aggregate count and total.
pub fn parse_allocations<R: Read>(
    reader: R,
    options: ParseOptions,
) -> CsvResult<ParsedAllocations> {
    let mut rows = AllocationReader::new(reader, options)?;

    let mut recipients = Vec::new();
    let mut total_amount: u64 = 0;
    for row in rows.by_ref() {
        let recipient = row?;
        total_amount = total_amount
            .checked_add(recipient.amount)
            .ok_or(CsvError::TotalOverflow)?;
        recipients.push(recipient);
    }

    let parsed = ParsedAllocations {
        max_num_nodes: recipients.len() as u64,
        recipients,
        total_amount,
        dropped_rows: rows.dropped_rows(),
    };

    debug!(
        recipients = parsed.max_num_nodes,
        total_amount = parsed.total_amount,
        dropped = parsed.dropped_rows,
        "parsed allocation file"
    );

    Ok(parsed)
}

/// Read and parse an allocation file from disk
pub fn read_allocations_csv<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> CsvResult<ParsedAllocations> {
    let file = File::open(path)?;
    parse_allocations(file, options)
}

/// Scale a decimal token amount to the smallest unit, flooring any
/// precision the mint cannot represent.
///
/// Digits below `10^-decimals` are cut from the text before it reaches
/// [`Decimal`], so its 28-digit precision can never round an amount up.
pub fn parse_amount(raw: &str, decimals: u8) -> Result<u64, String> {
    if decimals > MAX_SUPPORTED_DECIMALS {
        return Err(format!("unsupported decimals {decimals}"));
    }

    let scaled = scaled_digits(raw, decimals)?;
    Decimal::from_str(&scaled)
        .ok()
        .and_then(|value| value.to_u64())
        .ok_or_else(|| OUT_OF_RANGE.to_string())
}

const NOT_A_NUMBER: &str = "not a decimal number";
const OUT_OF_RANGE: &str = "amount does not fit in u64";

/// Digits a `Decimal` always holds exactly
const MAX_EXACT_DIGITS: usize = 28;

/// `floor(raw * 10^decimals)` as a string of digits, without leading zeros.
///
/// Accepts `[+-]digits[.digits][e[+-]digits]`. Only zero may be negative.
fn scaled_digits(raw: &str, decimals: u8) -> Result<String, String> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => {
            let exponent = unsigned[at + 1..]
                .parse::<i64>()
                .map_err(|_| NOT_A_NUMBER.to_string())?;
            (&unsigned[..at], exponent)
        }
        None => (unsigned, 0),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let no_digits = int_part.is_empty() && frac_part.is_empty();
    if no_digits || !all_digits(int_part) || !all_digits(frac_part) {
        return Err(NOT_A_NUMBER.to_string());
    }

    // Significant digits, with the decimal point `point` places from their start
    let digits = format!("{int_part}{frac_part}");
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok("0".to_string());
    }
    if negative {
        return Err("amount is negative".to_string());
    }

    let leading_zeros = (digits.len() - significant.len()) as i64;
    let point = (int_part.len() as i64)
        .saturating_add(exponent)
        .saturating_sub(leading_zeros);
    let keep = point.saturating_add(decimals as i64);
    if keep <= 0 {
        return Ok("0".to_string());
    }
    if keep > MAX_EXACT_DIGITS as i64 {
        return Err(OUT_OF_RANGE.to_string());
    }

    let keep = keep as usize;
    let mut scaled: String = significant.chars().take(keep).collect();
    while scaled.len() < keep {
        scaled.push('0');
    }
    Ok(scaled)
}

fn parse_record(record: &StringRecord, line: u64, options: &ParseOptions) -> CsvResult<Recipient> {
    if options.mode == ParseMode::Strict && record.len() != 2 {
        return Err(CsvError::FieldCount {
            line,
            found: record.len(),
        });
    }

    let address = record
        .get(0)
        .filter(|s| !s.is_empty())
        .ok_or(CsvError::MissingField {
            line,
            field: "address",
        })?;
    let raw_amount = record
        .get(1)
        .filter(|s| !s.is_empty())
        .ok_or(CsvError::MissingField {
            line,
            field: "amount",
        })?;

    let amount = parse_amount(raw_amount, options.decimals).map_err(|reason| {
        CsvError::InvalidAmount {
            line,
            value: raw_amount.to_string(),
            reason,
        }
    })?;

    Ok(Recipient::new(address, amount))
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "9kSXBczGtVeUTRfZnwMpz4mF8d86qjXsPjFb9RkPyJLF";

    fn parse(text: &str, options: ParseOptions) -> CsvResult<ParsedAllocations> {
        parse_allocations(text.as_bytes(), options)
    }

    #[test]
    fn test_totals_scale_by_decimals() {
        let parsed = parse("Recipient,Amount\nAddr1,1\nAddr2,2\n", ParseOptions::new(9)).unwrap();

        assert_eq!(parsed.total_amount, 3_000_000_000);
        assert_eq!(parsed.max_num_nodes, 2);
        assert_eq!(parsed.dropped_rows, 0);
        assert_eq!(
            parsed.recipients,
            vec![
                Recipient::new("Addr1", 1_000_000_000),
                Recipient::new("Addr2", 2_000_000_000),
            ]
        );
    }

    #[test]
    fn test_header_is_discarded_unconditionally() {
        // A header that looks like data is still skipped
        let parsed = parse(&format!("{ALICE},5\n{ALICE},1\n"), ParseOptions::new(0)).unwrap();
        assert_eq!(parsed.recipients, vec![Recipient::new(ALICE, 1)]);
    }

    #[test]
    fn test_row_without_comma_is_dropped() {
        let text = "Recipient,Amount\nAddr1,1\nnot-a-row\nAddr2,2\n";
        let parsed = parse(text, ParseOptions::new(9)).unwrap();

        assert_eq!(parsed.max_num_nodes, 2);
        assert_eq!(parsed.total_amount, 3_000_000_000);
        assert_eq!(parsed.dropped_rows, 1);
    }

    #[test]
    fn test_lenient_drops_bad_amounts_and_empty_fields() {
        let text = "Recipient,Amount\nAddr1,abc\n,5\nAddr2,\nAddr3,-1\nAddr4,4\n";
        let parsed = parse(text, ParseOptions::new(0)).unwrap();

        assert_eq!(parsed.recipients, vec![Recipient::new("Addr4", 4)]);
        assert_eq!(parsed.dropped_rows, 4);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = "Recipient,Amount\n\n   \nAddr1, 1.5 \n\n";
        let parsed = parse(text, ParseOptions::new(1)).unwrap();

        assert_eq!(parsed.recipients, vec![Recipient::new("Addr1", 15)]);
        assert_eq!(parsed.dropped_rows, 0);
    }

    #[test]
    fn test_extra_fields_ignored_when_lenient() {
        let parsed = parse("Recipient,Amount\nAddr1,1,memo\n", ParseOptions::new(0)).unwrap();
        assert_eq!(parsed.recipients, vec![Recipient::new("Addr1", 1)]);
    }

    #[test]
    fn test_strict_mode_fails_fast() {
        let result = parse(
            "Recipient,Amount\nAddr1,1\nAddr2,oops\nAddr3,3\n",
            ParseOptions::new(0).strict(),
        );
        match result {
            Err(CsvError::InvalidAmount { line, value, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "oops");
            }
            other => panic!("expected InvalidAmount, got {:?}", other),
        }

        let result = parse("Recipient,Amount\nAddr1\n", ParseOptions::new(0).strict());
        assert!(matches!(result, Err(CsvError::FieldCount { line: 2, found: 1 })));

        let result = parse("Recipient,Amount\nAddr1,1,memo\n", ParseOptions::new(0).strict());
        assert!(matches!(result, Err(CsvError::FieldCount { found: 3, .. })));
    }

    #[test]
    fn test_amount_is_floored_not_rounded() {
        assert_eq!(parse_amount("0.0000000019", 9).unwrap(), 1);
        assert_eq!(parse_amount("1.999", 2).unwrap(), 199);
        assert_eq!(parse_amount("2.5", 0).unwrap(), 2);
        assert_eq!(parse_amount("1e3", 0).unwrap(), 1000);
        assert_eq!(parse_amount("0", 9).unwrap(), 0);
        assert_eq!(parse_amount(".5", 1).unwrap(), 5);
        assert_eq!(parse_amount("1.", 3).unwrap(), 1000);
        assert_eq!(parse_amount("1.5E-1", 2).unwrap(), 15);
        assert_eq!(parse_amount("-0.000", 9).unwrap(), 0);
    }

    #[test]
    fn test_amount_beyond_decimal_precision_is_still_floored() {
        // 29 nines: more digits than a Decimal holds exactly
        assert_eq!(parse_amount("0.99999999999999999999999999999", 0).unwrap(), 0);
        assert_eq!(parse_amount("1.99999999999999999999999999999", 9).unwrap(), 1_999_999_999);
        assert_eq!(parse_amount("18446744073709551615.9999999999999999999", 0).unwrap(), u64::MAX);
        assert_eq!(parse_amount("1e-30", 18).unwrap(), 0);
    }

    #[test]
    fn test_amount_rejections() {
        assert!(parse_amount("", 9).is_err());
        assert!(parse_amount("ten", 9).is_err());
        assert!(parse_amount("-0.5", 9).is_err());
        assert!(parse_amount("18446744073709551616", 0).is_err());
        assert_eq!(parse_amount("18446744073709551615", 0).unwrap(), u64::MAX);
        assert!(parse_amount("1e999999999999", 0).is_err());
        assert!(parse_amount("1e", 0).is_err());
        assert!(parse_amount(".", 0).is_err());
        assert!(parse_amount("1.2.3", 0).is_err());
    }

    #[test]
    fn test_stray_quote_spoils_only_its_own_row() {
        let text = "Recipient,Amount\n\"Addr1,1\nAddr2,2\nAddr3,3\nAddr4,4\n";
        let parsed = parse(text, ParseOptions::new(0)).unwrap();

        assert_eq!(parsed.max_num_nodes, 4);
        assert_eq!(parsed.total_amount, 10);
        assert_eq!(parsed.recipients[0], Recipient::new("\"Addr1", 1));
        assert_eq!(parsed.recipients[3], Recipient::new("Addr4", 4));
    }

    #[test]
    fn test_header_is_first_non_blank_line() {
        let text = "   \n\nRecipient,Amount\nAddr1,1\n";

        let parsed = parse(text, ParseOptions::new(0).strict()).unwrap();
        assert_eq!(parsed.recipients, vec![Recipient::new("Addr1", 1)]);

        let parsed = parse(text, ParseOptions::new(0)).unwrap();
        assert_eq!(parsed.recipients, vec![Recipient::new("Addr1", 1)]);
        assert_eq!(parsed.dropped_rows, 0);
    }

    #[test]
    fn test_unsupported_decimals_rejected() {
        let result = AllocationReader::new("Recipient,Amount\n".as_bytes(), ParseOptions::new(19));
        assert!(matches!(result, Err(CsvError::UnsupportedDecimals(19))));
    }

    #[test]
    fn test_total_overflow_is_fatal() {
        let text = "Recipient,Amount\nAddr1,18446744073709551615\nAddr2,1\n";
        assert!(matches!(
            parse(text, ParseOptions::new(0)),
            Err(CsvError::TotalOverflow)
        ));
    }

    #[test]
    fn test_reader_is_lazy() {
        let text = "Recipient,Amount\nAddr1,1\nAddr2,2\nAddr3,3\n";
        let mut rows = AllocationReader::new(text.as_bytes(), ParseOptions::new(0)).unwrap();

        let first = rows.next().unwrap().unwrap();
        assert_eq!(first, Recipient::new("Addr1", 1));
        assert_eq!(rows.count(), 2);
    }

    #[test]
    fn test_read_allocations_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Recipient,Amount\n{ALICE},1\n").unwrap();

        let parsed = read_allocations_csv(file.path(), ParseOptions::new(9)).unwrap();
        assert_eq!(parsed.recipients, vec![Recipient::new(ALICE, 1_000_000_000)]);
    }
}

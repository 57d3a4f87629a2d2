/*!
# Spindrop CSV Schemas

This crate owns every tabular data contract of a Spindrop airdrop:

- **Allocation files** (`Recipient,Amount`) written by airdrop creators,
  parsed by [`parser`]
- **Claim rows** (`pubkey,amount_unlocked,amount_locked,category`) handed
  to the commitment storage service, produced by [`classifier`]

## Usage

```rust
use spindrop_csvs::{transform_allocations, DistributionMode, ParseOptions, CsvResult};

fn example() -> CsvResult<()> {
    let text = "Recipient,Amount\n9kSXBczGtVeUTRfZnwMpz4mF8d86qjXsPjFb9RkPyJLF,1\n";
    let transformed = transform_allocations(
        text.as_bytes(),
        ParseOptions::new(9),
        DistributionMode::Instant,
    )?;

    assert_eq!(transformed.parsed.total_amount, 1_000_000_000);
    assert_eq!(transformed.rows[0].amount_unlocked, 1_000_000_000);
    Ok(())
}
```
*/

pub mod classifier;
pub mod errors;
pub mod parser;
pub mod schemas;

// Re-export main types for convenience
pub use classifier::{
    claim_rows_to_string, classify_recipient, classify_recipients, read_claim_rows,
    read_claim_rows_csv, transform_allocations, write_claim_rows, write_claim_rows_csv,
    TransformedAllocations,
};
pub use errors::{CsvError, CsvResult};
pub use parser::{
    parse_allocations, parse_amount, read_allocations_csv, AllocationReader, ParseOptions,
    ParsedAllocations,
};
pub use schemas::{
    ClaimRow, DistributionMode, ParseMode, Recipient, ALLOCATION_CSV_HEADERS, CLAIM_CATEGORY,
    CLAIM_ROW_CSV_HEADERS, MAX_SUPPORTED_DECIMALS,
};

use crate::error::CliResult;
use spindrop_csvs::{transform_allocations, write_claim_rows_csv, DistributionMode, ParseOptions};
use spindrop_sdk::to_human_amount;
use std::fs::File;
use std::path::PathBuf;

/// Parse an allocation file and write its canonical claim rows
pub fn execute(
    input: PathBuf,
    decimals: u8,
    distribution: String,
    strict: bool,
    output: PathBuf,
) -> CliResult<()> {
    let mode: DistributionMode = distribution.parse()?;
    let mut options = ParseOptions::new(decimals);
    if strict {
        options = options.strict();
    }

    println!("Transforming {} ({} distribution)", input.display(), mode);
    let transformed = transform_allocations(File::open(&input)?, options, mode)?;
    write_claim_rows_csv(&output, &transformed.rows)?;

    let parsed = &transformed.parsed;
    println!("✅ Wrote {} claim rows to {}", transformed.rows.len(), output.display());
    println!("  - Recipients: {}", parsed.max_num_nodes);
    println!(
        "  - Total: {} ({} base units)",
        to_human_amount(parsed.total_amount, decimals),
        parsed.total_amount
    );
    if parsed.dropped_rows > 0 {
        println!("  - Dropped rows: {}", parsed.dropped_rows);
    }

    Ok(())
}

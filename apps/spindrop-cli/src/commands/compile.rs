use crate::config::AirdropConfig;
use crate::error::CliResult;
use spindrop_csvs::write_claim_rows_csv;
use spindrop_sdk::compile_airdrop;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CLAIMS_FILE: &str = "claims.csv";
pub const PARAMS_FILE: &str = "distributor_params.json";
pub const SUMMARY_FILE: &str = "summary.json";
pub const PROOFS_FILE: &str = "proofs.json";

/// Compile an airdrop and write everything needed to create and serve it
pub fn execute(
    config: PathBuf,
    input: PathBuf,
    output_dir: PathBuf,
    now: Option<i64>,
) -> CliResult<()> {
    let config = AirdropConfig::from_file(&config)?;
    let spec = config.to_spec()?;
    let now = now.unwrap_or_else(|| chrono::Utc::now().timestamp());

    println!("Compiling airdrop '{}'", spec.name);
    println!("Allocations: {}", input.display());
    println!("Mint: {}", spec.mint);
    println!("Distribution: {}", spec.distribution);

    let compiled = compile_airdrop(&spec, File::open(&input)?, now)?;

    fs::create_dir_all(&output_dir)?;
    write_claim_rows_csv(output_dir.join(CLAIMS_FILE), &compiled.rows)?;
    write_json(&output_dir.join(PARAMS_FILE), &compiled.params)?;
    write_json(&output_dir.join(SUMMARY_FILE), &compiled.summary())?;
    write_json(&output_dir.join(PROOFS_FILE), &compiled.all_proof_responses()?)?;

    info!(output_dir = %output_dir.display(), "wrote compiled airdrop");

    let summary = compiled.summary();
    println!("\n🎉 Airdrop compiled!");
    println!("📊 Summary:");
    println!("  - Recipients: {}", summary.recipients);
    println!("  - Total: {} ({} base units)", summary.human_total, summary.total_amount);
    if summary.native {
        println!("  - Native SOL distribution (wrapped mint)");
    }
    if summary.dropped_rows > 0 {
        println!("  - Dropped rows: {}", summary.dropped_rows);
    }
    println!("  - Merkle root: {}", summary.root);
    println!(
        "  - Vesting: {} -> {} (unlock every {})",
        compiled.params.start_vesting_ts, compiled.params.end_vesting_ts, spec.unlock_period
    );
    println!("  - Output: {}", output_dir.display());

    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> CliResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

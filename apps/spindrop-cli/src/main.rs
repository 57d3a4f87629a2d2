use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "spindrop")]
#[command(about = "Spindrop CLI - Merkle airdrop commitments for Solana")]
#[command(version)]
struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random allocation file for testing
    GenerateFixtures {
        /// Number of recipients to generate
        #[arg(short, long)]
        count: u64,

        /// Seed for deterministic generation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output file path
        #[arg(short, long, default_value = "allocations.csv")]
        output: PathBuf,

        /// Amount distribution (uniform, realistic, exponential)
        #[arg(short, long, default_value = "uniform")]
        distribution: String,

        /// Minimum whole-token amount per recipient
        #[arg(long, default_value = "1")]
        min_amount: u64,

        /// Maximum whole-token amount per recipient
        #[arg(long, default_value = "1000")]
        max_amount: u64,

        /// Fractional digits written per amount
        #[arg(long, default_value = "0")]
        fraction_digits: u8,
    },

    /// Convert an allocation file into canonical claim rows
    Transform {
        /// Allocation file (Recipient,Amount)
        input: PathBuf,

        /// Mint decimals
        #[arg(long)]
        decimals: u8,

        /// Distribution mode (instant, vested)
        #[arg(long, default_value = "instant")]
        distribution: String,

        /// Abort on the first malformed row
        #[arg(long)]
        strict: bool,

        /// Output file path
        #[arg(short, long, default_value = "claims.csv")]
        output: PathBuf,
    },

    /// Compile an airdrop: claim rows, root, distributor parameters and proofs
    Compile {
        /// Airdrop configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Allocation file (Recipient,Amount)
        input: PathBuf,

        /// Output directory for generated files
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Unix timestamp to compile at (defaults to now)
        #[arg(long)]
        now: Option<i64>,
    },

    /// Print the proof payloads for a claimant
    Proof {
        /// Canonical claim rows file
        #[arg(long)]
        claims: PathBuf,

        /// Claimant address (base58)
        claimant: String,
    },

    /// Check a proof payload against a published root
    Verify {
        /// Proof payload (JSON)
        proof: PathBuf,

        /// Published merkle root (hex string)
        #[arg(short, long)]
        root: String,

        /// Canonical claim rows, to tell rejected claims from root mismatches
        #[arg(long)]
        claims: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::GenerateFixtures {
            count,
            seed,
            output,
            distribution,
            min_amount,
            max_amount,
            fraction_digits,
        } => commands::generate_fixtures::execute(
            count,
            seed,
            output,
            distribution,
            min_amount,
            max_amount,
            fraction_digits,
        ),

        Commands::Transform {
            input,
            decimals,
            distribution,
            strict,
            output,
        } => commands::transform::execute(input, decimals, distribution, strict, output),

        Commands::Compile {
            config,
            input,
            output_dir,
            now,
        } => commands::compile::execute(config, input, output_dir, now),

        Commands::Proof { claims, claimant } => commands::proof::execute(claims, claimant),

        Commands::Verify {
            proof,
            root,
            claims,
        } => commands::verify::execute(proof, root, claims),
    }
}

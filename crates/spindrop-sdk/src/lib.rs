//! Spindrop airdrop SDK.
//!
//! Ties the allocation parser and the claim tree together into the
//! operations an airdrop creator and a claim service need:
//!
//! - [`compile_airdrop`]: allocation text to canonical rows, claim tree and
//!   [`DistributorParams`]
//! - [`CompiledAirdrop::proof_responses`]: proof payloads for a claimant
//! - [`ClaimChecker`]: pre-submission claim checks against a published root
//!
//! ```no_run
//! use spindrop_sdk::{compile_airdrop, AirdropSpec};
//! use solana_sdk::pubkey::Pubkey;
//!
//! let spec = AirdropSpec::new("launch", Pubkey::new_unique(), 9);
//! let text = std::fs::read("allocations.csv").unwrap();
//! let compiled = compile_airdrop(&spec, text.as_slice(), 1_760_000_000).unwrap();
//! println!("root {}", compiled.root_hex());
//! ```

pub mod amounts;
pub mod claims;
pub mod commitment;
pub mod compiler;
pub mod errors;
pub mod serde_helpers;

pub use amounts::to_human_amount;
pub use claims::{verify_claim, ClaimChecker, ClaimVerdict, ProofResponse};
pub use commitment::{
    is_native_mint, DistributorParams, UnlockPeriod, VestingWindow, VESTING_START_DELAY_SECS,
    WRAPPED_SOL_MINT,
};
pub use compiler::{
    compile_airdrop, compile_from_claim_rows, proof_responses, tree_from_claim_rows, AirdropSpec,
    AirdropSummary, CompiledAirdrop,
};
pub use errors::{SdkError, SdkResult};

// Re-export the lower layers so callers need a single dependency
pub use spindrop_csvs;
pub use spindrop_merkle;

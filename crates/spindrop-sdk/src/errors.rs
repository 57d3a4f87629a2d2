use solana_sdk::pubkey::Pubkey;
use spindrop_csvs::CsvError;
use spindrop_merkle::MerkleError;
use thiserror::Error;

pub type SdkResult<T> = Result<T, SdkError>;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Merkle error: {0}")]
    Merkle(#[from] MerkleError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid unlock period: {0}")]
    InvalidUnlockPeriod(String),

    #[error("Vested airdrops require a vesting end timestamp")]
    MissingVestingEnd,

    #[error("Vesting end {end_ts} must be in the future (now {now})")]
    VestingEndInPast { end_ts: i64, now: i64 },

    #[error("Unlock period ({period}s) must not exceed the vesting duration ({duration}s)")]
    UnlockPeriodTooLong { period: u64, duration: i64 },

    #[error("Committed total {committed} does not match parsed total {parsed}")]
    TotalMismatch { parsed: u64, committed: u64 },

    #[error("Claimed amounts overflow u64")]
    AmountOverflow,

    #[error("No claim for {0} in this airdrop")]
    ClaimantNotFound(Pubkey),

    #[error("Published root {published} does not match locally computed root {computed}; leaf encoding or tree rules differ from the distributor program")]
    RootMismatch { published: String, computed: String },
}

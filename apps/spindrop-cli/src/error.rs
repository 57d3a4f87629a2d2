use spindrop_csvs::CsvError;
use spindrop_sdk::SdkError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Allocation file error: {0}")]
    Allocations(#[from] CsvError),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sdk(#[from] SdkError),

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Invalid public key '{0}'")]
    InvalidPubkey(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Claim rejected: proof does not lead to root {0}")]
    ClaimRejected(String),
}

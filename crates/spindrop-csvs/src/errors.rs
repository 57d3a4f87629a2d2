use thiserror::Error;

pub type CsvResult<T> = Result<T, CsvError>;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    #[error("Line {line}: missing {field} field")]
    MissingField { line: u64, field: &'static str },

    #[error("Line {line}: expected 2 fields, found {found}")]
    FieldCount { line: u64, found: usize },

    #[error("Line {line}: invalid amount '{value}': {reason}")]
    InvalidAmount {
        line: u64,
        value: String,
        reason: String,
    },

    #[error("Unsupported decimals: {0} (max {max} supported with u64 amounts)", max = crate::schemas::MAX_SUPPORTED_DECIMALS)]
    UnsupportedDecimals(u8),

    #[error("Total allocation overflows u64")]
    TotalOverflow,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unknown distribution mode: '{0}' (expected 'instant' or 'vested')")]
    UnknownDistributionMode(String),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolitographError {
    #[error("Source error: {0}")]
    Source(String),

    #[error("Corrupt ledger: {0}")]
    CorruptLedger(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

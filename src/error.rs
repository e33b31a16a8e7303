use thiserror::Error;

/// Failures that abort a harvest run. Per-field and per-listing problems are
/// absorbed with partial results instead; only the surfaces below are fatal.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("failed to reach a WebDriver server: {0}")]
    Connect(#[from] fantoccini::error::NewSessionError),

    #[error("browser command failed: {0}")]
    Driver(#[from] fantoccini::error::CmdError),

    #[error("search box not found on the map page")]
    SearchBoxMissing,

    #[error("failed to write CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Missing nested result for self-called entry {0}")]
    MissingNestedResult(String),

    #[error("Upstream answered with status {0}")]
    UnexpectedStatus(u16),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::MalformedPayload(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SendgridError>;

#[derive(Debug, Error)]
pub enum SendgridError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SendgridError {
    fn from(err: reqwest::Error) -> Self {
        SendgridError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SendgridError {
    fn from(err: serde_json::Error) -> Self {
        SendgridError::Parse(err.to_string())
    }
}

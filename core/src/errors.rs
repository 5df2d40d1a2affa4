use thiserror::Error;

/// Errors produced by the tutor core
#[derive(Error, Debug)]
pub enum TutorError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Empty response from the model")]
    EmptyResponse,

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("Invalid Data: {0}")]
    InvalidData(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Result type for tutor operations
pub type TutorResult<T> = Result<T, TutorError>;

use thiserror::Error;

/// Errors produced while projecting a presentation to a document
#[derive(Error, Debug)]
pub enum DeckError {
    #[error("PDF Error: {0}")]
    PdfError(String),

    #[error("Image Error: {0}")]
    ImageError(String),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Result type for projector operations
pub type DeckResult<T> = Result<T, DeckError>;

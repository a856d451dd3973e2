use thiserror::Error;

/// Error types for action recording
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Error when initializing the recorder or session directories
    #[error("Failed to initialize recorder: {0}")]
    Initialization(String),

    /// The display could not be read for a capture
    #[error("Failed to capture screen: {0}")]
    Capture(String),

    /// The locator mark could not be drawn or saved
    #[error("Failed to annotate image: {0}")]
    Annotation(String),

    /// The step ledger is no longer usable (poisoned lock)
    #[error("Step ledger error: {0}")]
    Ledger(String),

    /// A session phase transition that the lifecycle does not allow
    #[error("Invalid session phase transition: {0}")]
    InvalidPhase(String),

    /// Error when producing a report artifact
    #[error("Failed to render report: {0}")]
    Render(String),

    /// Error when encoding or decoding an image
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Error when serializing or deserializing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;

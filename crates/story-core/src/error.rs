//! Error types module
//!
//! All failures in the upload pipeline are unified under the `StoryError`
//! enum. The three remote-classification failure kinds (configuration,
//! endpoint, format) are distinct variants so the widget can attach a
//! user-facing message to the affected upload record; none of them are
//! retried.

#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Moderation endpoint returned status {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("Unexpected moderation response format: {0}")]
    Format(String),

    #[error("Media processing error: {0}")]
    MediaProcessing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for StoryError {
    fn from(err: anyhow::Error) -> Self {
        StoryError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for StoryError {
    fn from(err: serde_json::Error) -> Self {
        StoryError::Format(format!("JSON parsing error: {}", err))
    }
}

impl StoryError {
    /// Get the error type name for diagnostics
    pub fn error_type(&self) -> &'static str {
        match self {
            StoryError::Configuration(_) => "Configuration",
            StoryError::Endpoint { .. } => "Endpoint",
            StoryError::Format(_) => "Format",
            StoryError::MediaProcessing(_) => "MediaProcessing",
            StoryError::InvalidInput(_) => "InvalidInput",
            StoryError::Internal(_) => "Internal",
        }
    }

    /// Whether removing the record and re-uploading can help. Endpoint and
    /// processing failures are scoped to one attempt; a missing credential is
    /// not fixable from the widget.
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoryError::Configuration(_) => false,
            StoryError::Endpoint { .. } => true,
            StoryError::Format(_) => true,
            StoryError::MediaProcessing(_) => true,
            StoryError::InvalidInput(_) => false,
            StoryError::Internal(_) => true,
        }
    }

    /// Client-facing message attached to the upload record on failure.
    pub fn user_message(&self) -> String {
        match self {
            StoryError::Configuration(msg) => format!("Moderation is not configured: {}", msg),
            StoryError::Endpoint { status, body } => {
                format!("Content analysis failed ({}): {}", status, body)
            }
            StoryError::Format(msg) => format!("Could not read the analysis result: {}", msg),
            StoryError::MediaProcessing(msg) => format!("Could not process the file: {}", msg),
            StoryError::InvalidInput(msg) => msg.clone(),
            StoryError::Internal(_) => "Something went wrong, please try again".to_string(),
        }
    }
}

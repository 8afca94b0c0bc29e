use thiserror::Error;

/// Central error type for the Stylecast pipelines
#[derive(Error, Debug)]
pub enum StylecastError {
    // ============================================================================
    // Service Errors
    // ============================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid response: {0}")]
    Invalid(String),

    // ============================================================================
    // Pipeline Errors
    // ============================================================================
    #[error("Pipeline error: {0}")]
    PipelineError(String),

    #[error("Missing result for key: {0}")]
    MissingResult(String),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Builder pattern validation error
    #[error("Builder error: {0}")]
    BuilderError(String),

    // ============================================================================
    // Generic/System Errors
    // ============================================================================
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mutex lock error")]
    LockError,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StylecastError {
    /// Whether this error counts as the service being unavailable.
    ///
    /// Malformed response shapes are folded into `Unavailable`.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StylecastError::Unavailable(_) | StylecastError::Invalid(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StylecastError::NotFound(_))
    }

    /// Short message safe to show to a user. Provider text never leaks through.
    pub fn user_message(&self) -> &'static str {
        match self {
            StylecastError::NotFound(_) => "The requested item could not be found.",
            StylecastError::Unavailable(_) | StylecastError::Invalid(_) => {
                "The service is currently unavailable."
            }
            StylecastError::ConfigError(_) | StylecastError::BuilderError(_) => {
                "The application is not configured correctly."
            }
            _ => "Something went wrong.",
        }
    }
}

// Implement conversion from PoisonError for Mutex locks
impl<T> From<std::sync::PoisonError<T>> for StylecastError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StylecastError::LockError
    }
}

impl From<reqwest::Error> for StylecastError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StylecastError::Invalid(err.to_string())
        } else {
            StylecastError::Unavailable(err.to_string())
        }
    }
}

impl From<url::ParseError> for StylecastError {
    fn from(err: url::ParseError) -> Self {
        StylecastError::ConfigError(format!("Invalid URL: {}", err))
    }
}

// Helper type alias for Results
pub type StylecastResult<T> = Result<T, StylecastError>;

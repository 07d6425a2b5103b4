//! Error types for the websearch application layer.
//!
//! Routing and provider errors live in `websearch_router::SearchError`;
//! this enum covers what happens around them: configuration files and
//! output.

/// Top-level error type for the websearch binary and library.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be serialised.
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),

    /// Routing or search failure.
    #[error(transparent)]
    Search(#[from] websearch_router::SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;

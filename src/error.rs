//! mdmint error types

/// mdmint error types
#[derive(Debug, thiserror::Error)]
pub enum MdmintError {
    // Backend errors
    /// The converter backend could not produce markdown.
    ///
    /// Never escapes [`ConversionService`](crate::ConversionService); it is
    /// folded into [`ConversionResponse::error`](crate::ConversionResponse).
    #[error("conversion failed: {0}")]
    Conversion(String),

    // Collaborator errors
    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Controller errors
    #[error("a conversion is already in progress")]
    Busy,

    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

/// Result type alias for mdmint operations
pub type Result<T> = std::result::Result<T, MdmintError>;

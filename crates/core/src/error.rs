//! Error types for the Concierge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Concierge operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Assistant errors ---
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    // --- Registry errors ---
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Assistant {assistant} produced unusable output: {reason}")]
    InvalidOutput { assistant: String, reason: String },

    #[error("Assistant {assistant} failed after {attempts} attempts: {reason}")]
    ExecutionFailed {
        assistant: String,
        attempts: usize,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("An assistant named '{0}' is already registered")]
    DuplicateName(String),

    #[error("Invalid assistant name: '{0}'")]
    InvalidName(String),
}

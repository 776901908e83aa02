//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API key not configured. Set GEMINI_API_KEY or save a key with `leaflens set-key`.")]
    NotConfigured,

    #[error("Unauthorized: invalid API key. Replace GEMINI_API_KEY with a valid key.")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("Network error reaching the Gemini API. Check your internet connection and try again.")]
    Network(#[source] reqwest::Error),

    #[error("Gemini API error: {0}")]
    Provider(String),

    #[error("Failed to call Gemini API")]
    RetryExhausted,

    #[error("{0}")]
    Parse(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, Error>;

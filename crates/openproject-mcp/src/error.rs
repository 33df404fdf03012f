//! Error types for the OpenProject MCP server.

use thiserror::Error;

/// Errors that can occur while serving tools.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the OpenProject client or workflow validation.
    ///
    /// Transparent: the client's message (status code and body text, or
    /// the transition rejection) is what the caller needs to see.
    #[error(transparent)]
    Api(#[from] openproject_api::Error),

    /// JSON serialization error while rendering a result.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for MCP tool operations.
pub type Result<T> = std::result::Result<T, Error>;

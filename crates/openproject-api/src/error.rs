//! Error types for the OpenProject API client.

use crate::domain::StatusInfo;
use std::fmt;
use thiserror::Error;

/// Errors that can occur when talking to OpenProject.
#[derive(Debug, Error)]
pub enum Error {
    /// Required startup configuration is missing or malformed.
    #[error("{0}")]
    Config(String),

    /// The upstream returned a non-success HTTP status.
    #[error("OpenProject API {status}: {body}")]
    Api {
        /// HTTP status code reported by the upstream.
        status: u16,
        /// Response body text, verbatim.
        body: String,
    },

    /// The HTTP transport failed before a usable response was produced.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// An upstream payload is missing a field this adapter depends on.
    #[error("malformed upstream payload: {0}")]
    Malformed(String),

    /// Pagination followed more next-page links than the safety cap allows.
    #[error("work package listing exceeded {limit} pages; upstream keeps reporting a next page")]
    PageLimit {
        /// Maximum number of pages the client will follow.
        limit: usize,
    },

    /// A requested status change is not legal from the item's current status.
    #[error("{0}")]
    InvalidTransition(TransitionRejected),
}

/// Details of a rejected status transition.
///
/// Rendered into the error message shown to the caller: the current status
/// and every legal alternative, each by name and id. An empty allowed set
/// renders as `none`.
#[derive(Debug, Clone)]
pub struct TransitionRejected {
    /// The status id the caller asked for.
    pub requested: String,
    /// The work package's current status.
    pub current: StatusInfo,
    /// Statuses the work package may legally move to.
    pub allowed: Vec<StatusInfo>,
}

impl fmt::Display for TransitionRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot transition to status {}: work package is currently '{}' (id {}). Available transitions: ",
            self.requested, self.current.name, self.current.id
        )?;
        if self.allowed.is_empty() {
            return write!(f, "none");
        }
        let alternatives = self
            .allowed
            .iter()
            .map(|status| format!("'{}' (id {})", status.name, status.id))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{alternatives}")
    }
}

/// A specialized Result type for OpenProject operations.
pub type Result<T> = std::result::Result<T, Error>;

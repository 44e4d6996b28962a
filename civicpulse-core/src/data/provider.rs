//! Source transport trait and structured error types.
//!
//! `SourceTransport` abstracts over where the raw CSV text comes from (an HTTP
//! host, a local directory) so the fetcher can retry any of them and tests can
//! swap in an in-memory source. Transports make exactly one attempt; retrying
//! lives above them in [`SourceFetcher`](super::fetch::SourceFetcher).

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single transport attempt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("HTTP {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("resource not found: {path}")]
    NotFound { path: String },

    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("request failed: {0}")]
    Http(String),
}

/// Failure of a fetch, after retries where applicable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("content for {path} too short ({len} < {min} bytes)")]
    ContentTooShort { path: String, len: usize, min: usize },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("giving up on {path} after {attempts} attempts: {last_cause}")]
    Exhausted {
        path: String,
        attempts: u32,
        last_cause: Box<FetchError>,
    },
}

impl FetchError {
    /// The innermost per-attempt cause.
    pub fn root_cause(&self) -> &FetchError {
        match self {
            FetchError::Exhausted { last_cause, .. } => last_cause.root_cause(),
            other => other,
        }
    }
}

/// Something that can return the raw text behind a resource path.
#[async_trait]
pub trait SourceTransport: Send + Sync {
    /// Human-readable name of this transport.
    fn name(&self) -> &str;

    /// One attempt at reading `path`.
    async fn get(&self, path: &str) -> Result<String, TransportError>;
}

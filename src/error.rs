//! Error types for selq.
//!
//! Per-node compilation failures are never errors: they are reported through
//! the [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) and compilation
//! of the surrounding document continues. This enum covers the failures that
//! abort a call site or a batch outright.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelqError {
    /// The cooperative cancellation token was triggered mid-compilation.
    #[error("compilation cancelled")]
    Cancelled,

    /// The selector source does not parse as a Rust expression.
    #[error("failed to parse selector expression: {0}")]
    Selector(String),

    /// Registration was attempted after the registry was sealed.
    #[error("registry is sealed; registration is only valid during startup")]
    RegistrySealed,

    /// A compiled document failed GraphQL validation.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Registry snapshot serialization failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for selq operations.
pub type SelqResult<T> = Result<T, SelqError>;

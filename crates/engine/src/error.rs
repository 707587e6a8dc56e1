//! Typed errors surfaced by the document engine.

use thiserror::Error;

/// Errors produced while validating or mutating a document.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Content handed to `set_content` does not match the document schema
    /// (unknown node kind, text at block level, malformed attributes).
    #[error("document schema violation: {0}")]
    Schema(String),
}

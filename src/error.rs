//! Error taxonomy for scene mutations and resource handling.
//!
//! Dangling references (a connection pointing at a removed slot or type) are
//! deliberately *not* errors: the renderer resolves by lookup and skips what
//! it cannot resolve.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    /// The operation would break a model invariant; nothing was mutated.
    #[error("invariant violation: {0}")]
    Invariant(String),
    /// An external resource (image bytes, export target) failed. Non-fatal;
    /// the scene is left unchanged.
    #[error("resource failure: {0}")]
    Resource(String),
}

pub type Result<T> = std::result::Result<T, EditError>;

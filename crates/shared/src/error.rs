use thiserror::Error;

/// Authentication failures. Surfaced to the caller as-is; the session stays
/// Unauthenticated and nothing is retried automatically.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("auth backend unreachable: {0}")]
    Backend(String),
}

/// A dashboard collection fetch that did not complete. Terminal for the
/// attempt; the sibling collection is unaffected.
#[derive(Debug, Clone, Error)]
#[error("fetch failed: {0}")]
pub struct FetchError(pub String);

// Key-value store failures carry no public type here: the storage seam
// reports `anyhow::Result` and every caller degrades to defaults, logging
// the failure rather than surfacing it.

//! Service-level error types.

use thiserror::Error;

use crate::ports::{HookError, StoreError};

/// Errors surfaced by `PostFieldStore`.
///
/// The service never handles collaborator failures itself; both variants are
/// transparent so the store's or hook's own message reaches the caller.
#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Result alias for post operations.
pub type PostResult<T> = Result<T, PostError>;

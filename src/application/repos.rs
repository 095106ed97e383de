//! Repository traits describing content adapters.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::content::Document;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("content store unavailable: {0}")]
    Unavailable(String),
}

impl RepoError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Read access to the content corpus.
///
/// Implementations hand out an immutable snapshot; callers re-query on every
/// request instead of holding on to it.
#[async_trait]
pub trait ContentRepo: Send + Sync {
    async fn list_documents(&self) -> Result<Arc<[Document]>, RepoError>;
}

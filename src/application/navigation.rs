use std::sync::Arc;

use crate::application::repos::{ContentRepo, RepoError};
use crate::domain::content::Language;
use crate::domain::navigation::Sidebar;

/// Builds the per-language sidebar from the current corpus.
#[derive(Clone)]
pub struct NavigationService {
    content: Arc<dyn ContentRepo>,
}

impl NavigationService {
    pub fn new(content: Arc<dyn ContentRepo>) -> Self {
        Self { content }
    }

    pub async fn sidebar(&self, language: Language) -> Result<Sidebar, RepoError> {
        let corpus = self.content.list_documents().await?;
        Ok(Sidebar::build(&corpus, language))
    }
}

//! Feed selection: which documents a feed request may see.

use crate::domain::content::{CategoryScope, Document, Language};

/// A single feed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub language: Language,
    pub category: CategoryScope,
}

impl FeedQuery {
    pub fn new(language: Language, category: impl Into<CategoryScope>) -> Self {
        Self {
            language,
            category: category.into(),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        !doc.draft && doc.language() == self.language && self.category.contains(doc.category())
    }
}

/// Select the published documents matching `query`, preserving corpus order.
pub fn select<'a>(corpus: &'a [Document], query: FeedQuery) -> Vec<&'a Document> {
    corpus.iter().filter(|doc| query.matches(doc)).collect()
}

/// Select the documents eligible for syndication in `language`.
///
/// Only `tech` and `life` are syndicated; `about-me` and uncategorised
/// documents never reach the RSS feed.
pub fn select_syndicated(corpus: &[Document], language: Language) -> Vec<&Document> {
    select(corpus, FeedQuery::new(language, CategoryScope::All))
        .into_iter()
        .filter(|doc| doc.category().is_some_and(|c| c.is_syndicated()))
        .collect()
}

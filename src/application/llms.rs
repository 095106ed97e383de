//! Plain-text feeds for language models (`llms.txt` and friends).
//!
//! Each feed concatenates the raw markdown of the selected documents under a
//! dated header. Bodies are passed through untouched.

use std::sync::Arc;

use thiserror::Error;
use time::Date;
use time::macros::format_description;

use crate::application::clock::Clock;
use crate::application::repos::{ContentRepo, RepoError};
use crate::application::selection::{FeedQuery, select};
use crate::application::site::SiteProfile;
use crate::domain::content::{Category, CategoryScope, Document, Language};

const ENTRY_SEPARATOR: &str = "\n---\n\n";

#[derive(Clone)]
pub struct LlmsService {
    content: Arc<dyn ContentRepo>,
    site: Arc<SiteProfile>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Error)]
pub enum LlmsError {
    #[error("failed to list documents: {0}")]
    Content(#[from] RepoError),
}

impl LlmsService {
    pub fn new(
        content: Arc<dyn ContentRepo>,
        site: Arc<SiteProfile>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            content,
            site,
            clock,
        }
    }

    /// Full-text feed for one language and category scope.
    pub async fn feed(&self, query: FeedQuery) -> Result<String, LlmsError> {
        let corpus = self.content.list_documents().await?;
        let documents = select(&corpus, query);
        Ok(render_llms(&self.site, query, &documents, self.clock.today()))
    }

    /// Directory of the available feeds. Does not touch the corpus.
    pub fn index(&self) -> String {
        render_llms_index(&self.site, self.clock.today())
    }
}

/// File name under which a feed is published, e.g. `llms-ja-tech.txt`.
pub fn llms_file_name(language: Language, scope: CategoryScope) -> String {
    format!("llms-{}{}.txt", language.llms_infix(), scope.file_stem())
}

pub fn render_llms(
    site: &SiteProfile,
    query: FeedQuery,
    documents: &[&Document],
    today: Date,
) -> String {
    let category_label = match query.category {
        CategoryScope::All => String::new(),
        CategoryScope::Only(category) => format!(" / {category}"),
    };
    let header = format!(
        "# {} - {}{}\n> Last updated: {}\n",
        site.title,
        query.language.label(),
        category_label,
        format_day(today),
    );

    let entries: Vec<String> = documents
        .iter()
        .map(|doc| {
            format!(
                "## {}\nURL: {}\n\n{}",
                doc.title,
                site.document_url(doc.slug()),
                doc.body
            )
        })
        .collect();

    format!("{header}\n{}", entries.join(ENTRY_SEPARATOR))
}

pub fn render_llms_index(site: &SiteProfile, today: Date) -> String {
    let pair = |scope: CategoryScope| {
        Language::ALL
            .iter()
            .map(|&language| format!("- {}\n", site.file_url(&llms_file_name(language, scope))))
            .collect::<String>()
    };

    let mut body = format!(
        "# {}\n> {}.\n> Last updated: {}\n\n## Full (with article content)\n{}\n## By Category\n",
        site.title,
        site.description,
        format_day(today),
        pair(CategoryScope::All),
    );

    for category in [Category::Tech, Category::Life, Category::AboutMe] {
        body.push_str(&format!(
            "\n### {}\n{}",
            category.label(),
            pair(CategoryScope::Only(category))
        ));
    }

    body
}

fn format_day(day: Date) -> String {
    day.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| day.to_string())
}

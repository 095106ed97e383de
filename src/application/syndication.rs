//! Syndication service for RSS feed generation.
//!
//! This service encapsulates the selection and formatting of the RSS feeds,
//! keeping the HTTP layer focused on request/response handling.

use std::cmp::Reverse;
use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc2822;

use crate::application::clock::Clock;
use crate::application::repos::{ContentRepo, RepoError};
use crate::application::selection::select_syndicated;
use crate::application::site::SiteProfile;
use crate::domain::content::{Document, Language};

/// Service for generating RSS feeds.
#[derive(Clone)]
pub struct SyndicationService {
    content: Arc<dyn ContentRepo>,
    site: Arc<SiteProfile>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Error)]
pub enum SyndicationError {
    #[error("failed to list documents: {0}")]
    Content(#[from] RepoError),
}

impl SyndicationService {
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

    /// Generate the RSS 2.0 feed for `language`.
    pub async fn rss_feed(&self, language: Language) -> Result<String, SyndicationError> {
        let corpus = self.content.list_documents().await?;
        let articles = select_syndicated(&corpus, language);
        Ok(render_rss(&self.site, language, articles, self.clock.now()))
    }
}

/// Render an RSS 2.0 document, newest first.
///
/// Undated articles sort as the Unix epoch, after every dated article, but
/// are stamped with `now` in their `pubDate`. Equal timestamps keep input
/// order.
pub fn render_rss(
    site: &SiteProfile,
    language: Language,
    mut articles: Vec<&Document>,
    now: OffsetDateTime,
) -> String {
    articles.sort_by_key(|doc| Reverse(doc.published_at.unwrap_or(OffsetDateTime::UNIX_EPOCH)));

    let mut items = String::new();
    for article in articles {
        let published = article.published_at.unwrap_or(now);
        let pub_date = published
            .format(&Rfc2822)
            .unwrap_or_else(|_| published.to_string());
        let link = site.document_url(article.slug());
        items.push_str(&format!(
            "    <item>\n      <title>{}</title>\n      <link>{}</link>\n      <guid isPermaLink=\"true\">{}</guid>\n      <description>{}</description>\n      <pubDate>{}</pubDate>\n    </item>\n",
            xml_escape(&article.title),
            xml_escape(&link),
            xml_escape(&link),
            xml_escape(article.description.as_deref().unwrap_or_default()),
            pub_date,
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n  <channel>\n    <title>{}</title>\n    <link>{}</link>\n    <description>{}</description>\n    <language>{}</language>\n{}  </channel>\n</rss>\n",
        xml_escape(&site.title),
        xml_escape(site.base_url()),
        xml_escape(site.description_for(language)),
        language.as_str(),
        items
    )
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-03-01 12:00 UTC);

    fn titles(xml: &str) -> Vec<&str> {
        xml.split("<item>")
            .skip(1)
            .filter_map(|item| {
                let start = item.find("<title>")? + "<title>".len();
                let end = item.find("</title>")?;
                Some(&item[start..end])
            })
            .collect()
    }

    #[test]
    fn newest_first_with_undated_last() {
        let docs = [
            Document::new("tech/old.mdx", "Old", "").with_published_at(datetime!(2023-01-01 0:00 UTC)),
            Document::new("tech/undated.mdx", "Undated", ""),
            Document::new("life/new.mdx", "New", "").with_published_at(datetime!(2025-06-01 0:00 UTC)),
        ];
        let xml = render_rss(&SiteProfile::default(), Language::En, docs.iter().collect(), NOW);
        assert_eq!(titles(&xml), ["New", "Old", "Undated"]);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let at = datetime!(2024-05-05 0:00 UTC);
        let docs = [
            Document::new("tech/first.mdx", "First", "").with_published_at(at),
            Document::new("tech/second.mdx", "Second", "").with_published_at(at),
            Document::new("tech/third.mdx", "Third", "").with_published_at(at),
        ];
        let site = SiteProfile::default();
        let first = render_rss(&site, Language::En, docs.iter().collect(), NOW);
        let second = render_rss(&site, Language::En, docs.iter().collect(), NOW);
        assert_eq!(titles(&first), ["First", "Second", "Third"]);
        assert_eq!(first, second);
    }

    #[test]
    fn undated_items_are_stamped_with_now() {
        let docs = [Document::new("tech/undated.mdx", "Undated", "")];
        let xml = render_rss(&SiteProfile::default(), Language::En, docs.iter().collect(), NOW);
        assert!(xml.contains("<pubDate>Sun, 01 Mar 2026 12:00:00 +0000</pubDate>"));
        assert!(xml.contains("<description></description>"));
    }

    #[test]
    fn text_is_escaped() {
        let docs = [Document::new("tech/esc.mdx", "Rust & <Tokio>", "")
            .with_description("\"quoted\" 'text'")];
        let xml = render_rss(&SiteProfile::default(), Language::En, docs.iter().collect(), NOW);
        assert!(xml.contains("<title>Rust &amp; &lt;Tokio&gt;</title>"));
        assert!(xml.contains("<description>&quot;quoted&quot; &apos;text&apos;</description>"));
    }

    #[test]
    fn channel_uses_language_specific_description() {
        let xml = render_rss(&SiteProfile::default(), Language::Ja, Vec::new(), NOW);
        assert!(xml.contains("<description>Personal site + technical garden (日本語)</description>"));
        assert!(xml.contains("<language>ja</language>"));
        assert!(titles(&xml).is_empty());
    }
}

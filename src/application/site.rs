//! Site identity shared by every renderer.

use crate::domain::content::Language;

pub const DEFAULT_SITE_ORIGIN: &str = "https://koborin.ai";
pub const DEFAULT_SITE_TITLE: &str = "koborin.ai";
pub const DEFAULT_SITE_DESCRIPTION: &str = "Personal site + technical garden";
pub const DEFAULT_SITE_DESCRIPTION_JA: &str = "Personal site + technical garden (日本語)";

/// Site origin and channel metadata, injected into every feed renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    base: String,
    pub title: String,
    pub description: String,
    pub description_ja: String,
}

impl SiteProfile {
    pub fn new(
        origin: &str,
        title: impl Into<String>,
        description: impl Into<String>,
        description_ja: impl Into<String>,
    ) -> Self {
        Self {
            base: normalize_public_site_url(origin),
            title: title.into(),
            description: description.into(),
            description_ja: description_ja.into(),
        }
    }

    /// Origin with exactly one trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn description_for(&self, language: Language) -> &str {
        match language {
            Language::En => &self.description,
            Language::Ja => &self.description_ja,
        }
    }

    /// Canonical page link for a document slug (`<origin>/<slug>/`).
    pub fn document_url(&self, slug: &str) -> String {
        let slug = slug.trim_matches('/');
        if slug.is_empty() {
            self.base.clone()
        } else {
            format!("{}{slug}/", self.base)
        }
    }

    /// Absolute URL of a site-relative file (`<origin>/<path>`).
    pub fn file_url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::new(
            DEFAULT_SITE_ORIGIN,
            DEFAULT_SITE_TITLE,
            DEFAULT_SITE_DESCRIPTION,
            DEFAULT_SITE_DESCRIPTION_JA,
        )
    }
}

fn normalize_public_site_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    format!("{trimmed}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_normalized_once() {
        let site = SiteProfile::new("https://example.com///", "t", "d", "dj");
        assert_eq!(site.base_url(), "https://example.com/");
        assert_eq!(site.document_url("tech/a"), "https://example.com/tech/a/");
        assert_eq!(site.file_url("/llms.txt"), "https://example.com/llms.txt");
    }

    #[test]
    fn empty_slug_links_to_root() {
        let site = SiteProfile::default();
        assert_eq!(site.document_url(""), "https://koborin.ai/");
    }
}

//! Content documents and the language/category tags derived from their ids.
//!
//! A document id is the path of its source file relative to the content root,
//! for example `ja/tech/firebase-auth.mdx`. Language and category are encoded
//! in the leading path segments; they are parsed once when the document is
//! constructed so that consumers never re-inspect the raw id.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use slug::slugify;
use time::OffsetDateTime;

use super::error::DomainError;

const JA_PREFIX: &str = "ja/";
const SOURCE_EXTENSIONS: [&str; 2] = [".mdx", ".md"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    Ja,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ja];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    /// Upper-case label used in feed headers (`EN`, `JA`).
    pub fn label(self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Ja => "JA",
        }
    }

    /// Path prefix under which this language's routes and files live.
    pub fn path_prefix(self) -> &'static str {
        match self {
            Language::En => "",
            Language::Ja => JA_PREFIX,
        }
    }

    /// Infix used in llms feed file names (`llms-ja-tech.txt`).
    pub fn llms_infix(self) -> &'static str {
        match self {
            Language::En => "",
            Language::Ja => "ja-",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ja" => Ok(Language::Ja),
            other => Err(DomainError::validation(format!(
                "unknown language `{other}` (expected `en` or `ja`)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "tech")]
    Tech,
    #[serde(rename = "life")]
    Life,
    #[serde(rename = "about-me")]
    AboutMe,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Tech, Category::Life, Category::AboutMe];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Tech => "tech",
            Category::Life => "life",
            Category::AboutMe => "about-me",
        }
    }

    /// Human-facing group label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Tech => "Tech",
            Category::Life => "Life",
            Category::AboutMe => "About Me",
        }
    }

    /// Whether documents of this category belong in the RSS feed.
    pub fn is_syndicated(self) -> bool {
        matches!(self, Category::Tech | Category::Life)
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "tech" => Some(Category::Tech),
            "life" => Some(Category::Life),
            "about-me" => Some(Category::AboutMe),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Category::from_segment(value.trim()).ok_or_else(|| {
            DomainError::validation(format!(
                "unknown category `{value}` (expected `tech`, `life` or `about-me`)"
            ))
        })
    }
}

/// Category restriction of a feed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryScope {
    All,
    Only(Category),
}

impl CategoryScope {
    pub const ALL: [CategoryScope; 4] = [
        CategoryScope::Only(Category::Tech),
        CategoryScope::Only(Category::Life),
        CategoryScope::Only(Category::AboutMe),
        CategoryScope::All,
    ];

    pub fn contains(self, category: Option<Category>) -> bool {
        match self {
            CategoryScope::All => true,
            CategoryScope::Only(expected) => category == Some(expected),
        }
    }

    /// Suffix used in llms feed file names; `All` is published as `full`.
    pub fn file_stem(self) -> &'static str {
        match self {
            CategoryScope::All => "full",
            CategoryScope::Only(category) => category.as_str(),
        }
    }
}

impl From<Category> for CategoryScope {
    fn from(category: Category) -> Self {
        CategoryScope::Only(category)
    }
}

/// Language and category parsed from a document id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentTag {
    pub language: Language,
    pub category: Option<Category>,
}

impl ContentTag {
    pub fn from_id(id: &str) -> Self {
        let (language, rest) = match id.strip_prefix(JA_PREFIX) {
            Some(rest) => (Language::Ja, rest),
            None => (Language::En, id),
        };

        // A bare file directly under the language root has no category.
        let category = rest
            .split_once('/')
            .and_then(|(segment, _)| Category::from_segment(segment));

        Self { language, category }
    }
}

/// A single content document with its front-matter and raw body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: String,
    slug: String,
    tag: ContentTag,
    pub title: String,
    pub description: Option<String>,
    pub published_at: Option<OffsetDateTime>,
    pub draft: bool,
    pub body: String,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        let id = id.into();
        let slug = slug_from_id(&id);
        let tag = ContentTag::from_id(&id);
        Self {
            id,
            slug,
            tag,
            title: title.into(),
            description: None,
            published_at: None,
            draft: false,
            body: body.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_published_at(mut self, published_at: OffsetDateTime) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_draft(mut self, draft: bool) -> Self {
        self.draft = draft;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn language(&self) -> Language {
        self.tag.language
    }

    pub fn category(&self) -> Option<Category> {
        self.tag.category
    }
}

/// URL slug of a document id.
///
/// The source extension and a trailing `index` segment are dropped and every
/// remaining path segment is slugified, so `tech/My Post.mdx` maps to
/// `tech/my-post`.
pub fn slug_from_id(id: &str) -> String {
    let stem = SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| id.strip_suffix(ext))
        .unwrap_or(id);

    let mut segments: Vec<String> = stem
        .split('/')
        .map(slugify)
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.last().is_some_and(|last| last == "index") {
        segments.pop();
    }

    segments.join("/")
}

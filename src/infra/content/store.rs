use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::application::repos::{ContentRepo, RepoError};
use crate::domain::content::Document;

use super::frontmatter::{FrontMatterError, parse_front_matter};

const SOURCE_EXTENSIONS: [&str; 2] = ["md", "mdx"];

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content directory `{}` does not exist", path.display())]
    MissingRoot { path: PathBuf },
    #[error("failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("failed to read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{id}`: {source}")]
    FrontMatter {
        id: String,
        #[source]
        source: FrontMatterError,
    },
    #[error("`{id}`: front-matter has no title")]
    MissingTitle { id: String },
}

/// Build a document from its id and raw file contents.
pub fn parse_document(id: &str, raw: &str) -> Result<Document, ContentError> {
    let (meta, body) = parse_front_matter(raw).map_err(|source| ContentError::FrontMatter {
        id: id.to_string(),
        source,
    })?;

    let title = meta.title.ok_or_else(|| ContentError::MissingTitle { id: id.to_string() })?;

    let mut document = Document::new(id, title, body).with_draft(meta.draft);
    document.description = meta.description;
    document.published_at = meta.published_at;
    Ok(document)
}

/// Load every `.md`/`.mdx` file below `root`, ordered by path.
///
/// Hidden files and directories are skipped. Any unreadable or malformed file
/// fails the whole load.
pub fn load_directory(root: &Path) -> Result<Vec<Document>, ContentError> {
    if !root.is_dir() {
        return Err(ContentError::MissingRoot {
            path: root.to_path_buf(),
        });
    }

    let mut documents = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_source_file(entry.path()) {
            continue;
        }

        let Some(id) = document_id(root, entry.path()) else {
            continue;
        };
        let raw = fs::read_to_string(entry.path()).map_err(|source| ContentError::Read {
            path: entry.path().to_path_buf(),
            source,
        })?;

        let document = parse_document(&id, &raw)?;
        debug!(
            target = "koborin::content",
            id = %document.id(),
            draft = document.draft,
            "loaded document"
        );
        documents.push(document);
    }

    Ok(documents)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Relative path with `/` separators, regardless of platform.
fn document_id(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Option<Vec<&str>> = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect();
    Some(segments?.join("/"))
}

/// Immutable corpus snapshot shared by all requests.
#[derive(Clone, Debug)]
pub struct SnapshotRepo {
    documents: Arc<[Document]>,
}

impl SnapshotRepo {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: documents.into(),
        }
    }

    /// Load a snapshot from a content directory.
    pub fn load(root: &Path) -> Result<Self, ContentError> {
        load_directory(root).map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl ContentRepo for SnapshotRepo {
    async fn list_documents(&self) -> Result<Arc<[Document]>, RepoError> {
        Ok(Arc::clone(&self.documents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{Category, Language};

    #[test]
    fn document_takes_fields_from_front_matter() {
        let raw = "---\ntitle: A\ndescription: About A\npublishedAt: 2024-01-01\n---\nBody";
        let doc = parse_document("ja/tech/a.mdx", raw).expect("document");

        assert_eq!(doc.slug(), "ja/tech/a");
        assert_eq!(doc.language(), Language::Ja);
        assert_eq!(doc.category(), Some(Category::Tech));
        assert_eq!(doc.description.as_deref(), Some("About A"));
        assert!(doc.published_at.is_some());
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn missing_title_is_an_error() {
        let err = parse_document("tech/untitled.md", "---\ndraft: true\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::MissingTitle { ref id } if id == "tech/untitled.md"));
    }

    #[test]
    fn document_id_uses_forward_slashes() {
        let root = Path::new("/content");
        let path = root.join("ja").join("life").join("x.mdx");
        assert_eq!(document_id(root, &path).as_deref(), Some("ja/life/x.mdx"));
    }
}

//! Draft article scaffolding for `koborin new`.

use std::path::{Path, PathBuf};

use time::Date;
use tokio::{fs, io::AsyncWriteExt};
use tracing::info;

use crate::{
    application::error::AppError,
    domain::{
        content::{Category, Language},
        slug::{derive_slug, generate_unique_slug},
    },
    infra::error::InfraError,
};

const DRAFT_EXTENSION: &str = "mdx";

/// A validated request for a new article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    language: Language,
    category: Category,
    title: String,
    description: String,
}

impl ArticleDraft {
    pub fn new(
        language: Language,
        category: Category,
        title: &str,
        description: &str,
    ) -> Result<Self, AppError> {
        let title = single_line("title", title)?;
        let description = single_line("description", description)?;

        if !category.is_syndicated() {
            return Err(AppError::validation(format!(
                "articles can only be created in `tech` or `life`, not `{category}`"
            )));
        }
        derive_slug(&title)?;

        Ok(Self {
            language,
            category,
            title,
            description,
        })
    }

    /// Directory of the article relative to the content root (`{ja/}<category>`).
    pub fn directory(&self) -> PathBuf {
        PathBuf::from(format!(
            "{}{}",
            self.language.path_prefix(),
            self.category.as_str()
        ))
    }

    /// File contents: a YAML front-matter block and an empty body.
    pub fn render(&self, today: Date) -> String {
        format!(
            "---\ntitle: {}\ndescription: {}\npublishedAt: {today}\ndraft: true\n---\n\n",
            yaml_quote(&self.title),
            yaml_quote(&self.description),
        )
    }
}

/// Write `draft` below `content_root`, never replacing an existing file.
///
/// A slug already taken in the target directory gets a numeric suffix.
/// Returns the path of the new file.
pub async fn write_draft(
    content_root: &Path,
    draft: &ArticleDraft,
    today: Date,
) -> Result<PathBuf, AppError> {
    let directory = content_root.join(draft.directory());
    let slug = generate_unique_slug(&draft.title, |candidate| {
        ["md", DRAFT_EXTENSION]
            .iter()
            .all(|ext| !directory.join(format!("{candidate}.{ext}")).exists())
    })?;
    let path = directory.join(format!("{slug}.{DRAFT_EXTENSION}"));

    fs::create_dir_all(&directory).await.map_err(InfraError::from)?;
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
        .map_err(InfraError::from)?;
    file.write_all(draft.render(today).as_bytes())
        .await
        .map_err(InfraError::from)?;
    file.flush().await.map_err(InfraError::from)?;

    info!(
        target = "koborin::scaffold",
        path = %path.display(),
        language = %draft.language,
        category = %draft.category,
        "created draft article"
    );
    Ok(path)
}

fn single_line(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    if value.contains(['\n', '\r']) {
        return Err(AppError::validation(format!(
            "{field} must fit on a single line"
        )));
    }
    Ok(value.to_string())
}

fn yaml_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

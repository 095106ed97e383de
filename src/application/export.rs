//! Static export of every feed endpoint for hosting without the server.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::{
    application::{
        error::AppError,
        llms::{LlmsService, llms_file_name},
        navigation::NavigationService,
        selection::FeedQuery,
        syndication::SyndicationService,
    },
    domain::content::{CategoryScope, Language},
    infra::error::InfraError,
};

/// Render every feed into `output`, mirroring the HTTP route layout.
///
/// Returns the written paths in the order they were produced.
pub async fn export_feeds(
    syndication: &SyndicationService,
    llms: &LlmsService,
    navigation: &NavigationService,
    output: &Path,
) -> Result<Vec<PathBuf>, AppError> {
    let mut written = Vec::new();

    for language in Language::ALL {
        let prefix = language.path_prefix();

        let rss = syndication.rss_feed(language).await?;
        written.push(write_output(output, &format!("{prefix}rss.xml"), &rss).await?);

        let sidebar = navigation.sidebar(language).await?;
        let encoded = serde_json::to_string_pretty(&sidebar)
            .map_err(|err| AppError::unexpected(format!("failed to encode sidebar: {err}")))?;
        written.push(write_output(output, &format!("{prefix}sidebar.json"), &encoded).await?);

        for scope in CategoryScope::ALL {
            let body = llms.feed(FeedQuery::new(language, scope)).await?;
            written.push(write_output(output, &llms_file_name(language, scope), &body).await?);
        }
    }

    written.push(write_output(output, "llms.txt", &llms.index()).await?);

    Ok(written)
}

async fn write_output(root: &Path, relative: &str, contents: &str) -> Result<PathBuf, AppError> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(InfraError::from)?;
    }
    fs::write(&path, contents).await.map_err(InfraError::from)?;
    debug!(
        target = "koborin::export",
        path = %path.display(),
        bytes = contents.len(),
        "wrote feed"
    );
    Ok(path)
}

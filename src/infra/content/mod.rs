//! Filesystem content store: markdown/MDX files with front-matter.

mod frontmatter;
mod store;

pub use frontmatter::{FrontMatter, FrontMatterError, parse_front_matter, parse_published_at};
pub use store::{ContentError, SnapshotRepo, load_directory, parse_document};

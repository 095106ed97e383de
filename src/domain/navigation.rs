use serde::Serialize;

use super::content::{Category, Document, Language};

/// Group order of the site sidebar.
const SIDEBAR_ORDER: [Category; 3] = [Category::AboutMe, Category::Tech, Category::Life];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sidebar {
    groups: Vec<SidebarGroup>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SidebarGroup {
    pub label: &'static str,
    pub category: Category,
    pub items: Vec<SidebarItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SidebarItem {
    pub label: String,
    pub slug: String,
}

impl Sidebar {
    /// Build the sidebar for one language from the corpus.
    ///
    /// Every category group is present even when empty; drafts and
    /// uncategorised documents are left out. Items keep corpus order.
    pub fn build(documents: &[Document], language: Language) -> Self {
        let groups = SIDEBAR_ORDER
            .iter()
            .map(|&category| SidebarGroup {
                label: category.label(),
                category,
                items: documents
                    .iter()
                    .filter(|doc| !doc.draft)
                    .filter(|doc| doc.language() == language)
                    .filter(|doc| doc.category() == Some(category))
                    .map(|doc| SidebarItem {
                        label: doc.title.clone(),
                        slug: doc.slug().to_string(),
                    })
                    .collect(),
            })
            .collect();

        Self { groups }
    }

    pub fn groups(&self) -> &[SidebarGroup] {
        &self.groups
    }
}

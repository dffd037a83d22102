use serde::{Deserialize, Serialize};

use super::ArchiveItem;

/// Name of the synthetic root that holds the latest uploads.
pub const LATEST_CATEGORY: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveCategory {
    /// Either a main category (`movies`) or a composite `main/sub` name.
    pub name: String,
    pub display_name: String,
    pub items: Vec<ArchiveItem>,
    pub sub_categories: Vec<ArchiveCategory>,
    pub parent: Option<String>,
}

impl ArchiveCategory {
    pub fn new(name: String, items: Vec<ArchiveItem>) -> Self {
        Self {
            display_name: name.clone(),
            name,
            items,
            sub_categories: Vec::new(),
            parent: None,
        }
    }

    /// Own items plus everything below.
    pub fn total_item_count(&self) -> usize {
        self.items.len()
            + self
                .sub_categories
                .iter()
                .map(ArchiveCategory::total_item_count)
                .sum::<usize>()
    }

    pub fn is_root(&self) -> bool {
        self.name == LATEST_CATEGORY
    }

    /// Depth-first lookup by name, including `self`.
    pub fn find(&self, name: &str) -> Option<&ArchiveCategory> {
        if self.name == name {
            return Some(self);
        }
        self.sub_categories.iter().find_map(|c| c.find(name))
    }
}

use crate::domain::{ArchiveCategory, ArchiveItem};

/// Which screen the session is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Home,
    Category,
    Search,
    Favorites,
    Hot,
}

/// What the display layer renders: either a list of categories or a list of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayPayload {
    Categories(Vec<ArchiveCategory>),
    Items(Vec<ArchiveItem>),
}

impl DisplayPayload {
    pub fn len(&self) -> usize {
        match self {
            DisplayPayload::Categories(c) => c.len(),
            DisplayPayload::Items(i) => i.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> &[ArchiveItem] {
        match self {
            DisplayPayload::Items(items) => items,
            DisplayPayload::Categories(_) => &[],
        }
    }

    pub fn categories(&self) -> &[ArchiveCategory] {
        match self {
            DisplayPayload::Categories(categories) => categories,
            DisplayPayload::Items(_) => &[],
        }
    }
}

/// Read-only view of the session, replaced wholesale on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub mode: DisplayMode,
    pub title: String,
    pub payload: DisplayPayload,
    pub is_loading: bool,
    pub is_last_page: bool,
    pub error: Option<String>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Home,
            title: "Latest Uploads".to_string(),
            payload: DisplayPayload::Categories(Vec::new()),
            is_loading: false,
            is_last_page: true,
            error: None,
        }
    }
}

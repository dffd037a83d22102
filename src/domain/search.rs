use serde::Deserialize;

use super::file::lenient_text;
use super::ArchiveItem;

/// Envelope returned by `advancedsearch.php?output=json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub response: SearchResponseData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponseData {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchDoc {
    pub identifier: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mediatype: String,
}

impl SearchDoc {
    pub fn to_archive_item(&self, base_url: &str) -> ArchiveItem {
        ArchiveItem {
            title: self.title.clone(),
            link: format!("{}details/{}", base_url, self.identifier),
            category: self.mediatype.clone(),
            identifier: self.identifier.clone(),
        }
    }
}

impl SearchResponse {
    /// `true` when no further page exists after this one.
    pub fn is_last_page(&self) -> bool {
        let data = &self.response;
        data.docs.is_empty() || data.start + data.docs.len() as u64 >= data.num_found
    }

    pub fn to_archive_items(&self, base_url: &str) -> Vec<ArchiveItem> {
        self.response
            .docs
            .iter()
            .map(|doc| doc.to_archive_item(base_url))
            .collect()
    }
}

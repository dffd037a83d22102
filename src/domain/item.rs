use serde::{Deserialize, Serialize};

/// A single catalog entry from the archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchiveItem {
    pub title: String,
    pub link: String,
    /// Slash-delimited path such as `movies/documentary`.
    pub category: String,
    pub identifier: String,
}

impl ArchiveItem {
    /// Build an item whose identifier is taken from the trailing segment of `link`.
    pub fn new(title: String, link: String, category: String) -> Self {
        let identifier = Self::identifier_from_link(&link).to_string();
        Self {
            title,
            link,
            category,
            identifier,
        }
    }

    /// Everything after the last `/`, or the whole link when it has none.
    pub fn identifier_from_link(link: &str) -> &str {
        link.rsplit('/').next().unwrap_or(link)
    }

    pub fn main_category(&self) -> &str {
        self.category.split('/').next().unwrap_or(&self.category)
    }

    pub fn sub_category(&self) -> &str {
        self.category
            .split_once('/')
            .map(|(_, sub)| sub)
            .unwrap_or("")
    }

    pub fn thumbnail_url(&self, base_url: &str) -> String {
        format!("{}services/img/{}", base_url, self.identifier)
    }

    pub fn details_url(&self, base_url: &str) -> String {
        format!("{}details/{}", base_url, self.identifier)
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://archive.org/";

    fn item(category: &str) -> ArchiveItem {
        ArchiveItem::new(
            "A Title".into(),
            "https://archive.org/details/some-id".into(),
            category.into(),
        )
    }

    #[test]
    fn test_identifier_from_last_segment() {
        assert_eq!(item("movies").identifier, "some-id");
        assert_eq!(ArchiveItem::identifier_from_link("no-slashes"), "no-slashes");
        assert_eq!(ArchiveItem::identifier_from_link("https://a/b/"), "");
    }

    #[test]
    fn test_main_and_sub_category() {
        let nested = item("movies/documentary");
        assert_eq!(nested.main_category(), "movies");
        assert_eq!(nested.sub_category(), "documentary");

        let flat = item("audio");
        assert_eq!(flat.main_category(), "audio");
        assert_eq!(flat.sub_category(), "");
    }

    #[test]
    fn test_sub_category_keeps_deeper_segments() {
        let deep = item("texts/books/old");
        assert_eq!(deep.main_category(), "texts");
        assert_eq!(deep.sub_category(), "books/old");
    }

    #[test]
    fn test_thumbnail_url_round_trips_identifier() {
        let original = item("movies");
        let thumb = original.thumbnail_url(BASE);
        assert_eq!(thumb, "https://archive.org/services/img/some-id");
        assert_eq!(ArchiveItem::identifier_from_link(&thumb), original.identifier);

        let details = original.details_url(BASE);
        assert_eq!(ArchiveItem::identifier_from_link(&details), original.identifier);
    }

    #[test]
    fn test_display_title_without_title() {
        let mut untitled = item("movies");
        untitled.title.clear();
        assert_eq!(untitled.display_title(), "(Untitled)");
    }
}

mod namespaces;

use html_escape::decode_html_entities;
use roxmltree::{Document, Node, ParsingOptions};

use crate::app::{ArchiveError, Result};
use crate::domain::ArchiveItem;

/// Turns the collection RSS feed into archive items.
///
/// The document is walked once in document order, reacting to each element
/// as it opens and closes. Tags are matched by their written name, so
/// prefixed elements such as `<media:title>` never collide with the plain
/// RSS ones. Prefixes the feed uses without declaring are tolerated.
#[derive(Clone)]
pub struct FeedParser;

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct ItemFields {
    inside_item: bool,
    title: String,
    link: String,
    category: String,
}

impl ItemFields {
    fn open(&mut self, node: Node<'_, '_>) {
        match node.tag_name().name() {
            "item" => self.inside_item = true,
            "title" if self.inside_item => self.title = element_text(node),
            "link" if self.inside_item => self.link = element_text(node),
            "category" if self.inside_item => self.category = element_text(node),
            _ => {}
        }
    }

    /// Emits an item when every field was seen, then resets for the next `<item>`.
    fn finish(&mut self) -> Option<ArchiveItem> {
        let fields = std::mem::take(self);
        if fields.title.is_empty() || fields.link.is_empty() || fields.category.is_empty() {
            tracing::debug!(
                "Skipped incomplete item - title: {:?}, link: {:?}, category: {:?}",
                fields.title,
                fields.link,
                fields.category
            );
            return None;
        }

        let title = decode_html_entities(&fields.title).to_string();
        Some(ArchiveItem::new(title, fields.link, fields.category))
    }
}

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, xml: &str) -> Result<Vec<ArchiveItem>> {
        let xml = namespaces::declare_unbound_prefixes(xml);
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(&xml, options)
            .map_err(|e| ArchiveError::FeedParse(e.to_string()))?;

        let mut fields = ItemFields::default();
        let mut items = Vec::new();
        walk(doc.root(), &mut fields, &mut items);

        tracing::debug!("Parsed {} items from feed", items.len());
        Ok(items)
    }
}

fn walk(node: Node<'_, '_>, fields: &mut ItemFields, items: &mut Vec<ArchiveItem>) {
    for child in node.children().filter(|n| n.is_element()) {
        let plain = is_plain_element(child);
        if plain {
            fields.open(child);
        }

        walk(child, fields, items);

        if plain && child.tag_name().name() == "item" {
            if let Some(item) = fields.finish() {
                items.push(item);
            }
        }
    }
}

/// An element written without a namespace prefix.
fn is_plain_element(node: Node<'_, '_>) -> bool {
    node.is_element() && node.tag_name().namespace() == node.default_namespace()
}

fn element_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

//! Feeds in the wild use prefixes such as `dc:` or `itunes:` without ever
//! declaring them. Such prefixes get a placeholder declaration on the root
//! element so the document still parses; the elements they name never match
//! the plain RSS tags.

use std::borrow::Cow;

/// Namespace URI prefix given to otherwise undeclared prefixes.
const PLACEHOLDER_NAMESPACE: &str = "urn:archivist:undeclared:";

pub(super) fn declare_unbound_prefixes(xml: &str) -> Cow<'_, str> {
    let tags = element_tags(xml);
    let Some(&(root_start, root_tag)) = tags.iter().find(|(_, tag)| !tag.starts_with('/')) else {
        return Cow::Borrowed(xml);
    };

    let mut missing: Vec<String> = Vec::new();
    for (_, tag) in &tags {
        for prefix in prefixes(tag) {
            if prefix == "xml" || prefix == "xmlns" || missing.contains(&prefix) {
                continue;
            }
            if !declares(root_tag, &prefix) {
                missing.push(prefix);
            }
        }
    }

    if missing.is_empty() {
        return Cow::Borrowed(xml);
    }
    tracing::debug!("Declaring undeclared feed prefixes: {:?}", missing);

    let name_len = root_tag
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(root_tag.len());
    let insert_at = root_start + name_len;

    let mut patched = String::with_capacity(xml.len() + missing.len() * 48);
    patched.push_str(&xml[..insert_at]);
    for prefix in &missing {
        patched.push_str(&format!(
            " xmlns:{}=\"{}{}\"",
            prefix, PLACEHOLDER_NAMESPACE, prefix
        ));
    }
    patched.push_str(&xml[insert_at..]);
    Cow::Owned(patched)
}

/// Bodies of start and end tags (text between `<` and `>`) with their offsets.
/// Comments, CDATA, processing instructions and doctypes are skipped.
fn element_tags(xml: &str) -> Vec<(usize, &str)> {
    let mut tags = Vec::new();
    let mut pos = 0;

    while let Some(offset) = xml[pos..].find('<') {
        let start = pos + offset + 1;
        let tail = &xml[start..];

        let skip_marker = if tail.starts_with("!--") {
            Some("-->")
        } else if tail.starts_with("![CDATA[") {
            Some("]]>")
        } else if tail.starts_with('?') {
            Some("?>")
        } else if tail.starts_with('!') {
            Some(">")
        } else {
            None
        };

        if let Some(marker) = skip_marker {
            match tail.find(marker) {
                Some(end) => {
                    pos = start + end + marker.len();
                    continue;
                }
                None => break,
            }
        }

        let Some(len) = tag_len(tail) else {
            break;
        };
        tags.push((start, &tail[..len]));
        pos = start + len + 1;
    }

    tags
}

/// Length of a tag body up to its closing `>`, ignoring `>` inside quotes.
fn tag_len(tail: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in tail.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(i),
            None => {}
        }
    }
    None
}

/// Element and attribute names of a tag body, attribute values removed.
fn names(tag: &str) -> Vec<String> {
    let mut bare = String::with_capacity(tag.len());
    let mut quote: Option<char> = None;
    for c in tag.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                bare.push(' ');
            }
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None => bare.push(c),
        }
    }

    bare.split(|c: char| c.is_whitespace() || c == '=' || c == '/')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn prefixes(tag: &str) -> Vec<String> {
    names(tag)
        .into_iter()
        .filter_map(|name| name.split_once(':').map(|(prefix, _)| prefix.to_string()))
        .filter(|prefix| is_valid_prefix(prefix))
        .collect()
}

fn declares(tag: &str, prefix: &str) -> bool {
    let attribute = format!("xmlns:{}", prefix);
    names(tag).iter().any(|name| *name == attribute)
}

fn is_valid_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_prefixes_are_left_alone() {
        let xml = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><media:title>x</media:title></rss>"#;
        assert!(matches!(declare_unbound_prefixes(xml), Cow::Borrowed(_)));
    }

    #[test]
    fn test_undeclared_prefix_gets_root_declaration() {
        let xml = r#"<?xml version="1.0"?><!-- <x:y> --><rss version="2.0"><dc:creator>a</dc:creator></rss>"#;
        let patched = declare_unbound_prefixes(xml);
        assert!(patched.contains(
            r#"<rss xmlns:dc="urn:archivist:undeclared:dc" version="2.0">"#
        ));
        // The commented-out prefix is not declared.
        assert!(!patched.contains("xmlns:x="));
    }

    #[test]
    fn test_attribute_prefixes_and_self_closing_root() {
        let xml = r#"<feed/>"#;
        assert!(matches!(declare_unbound_prefixes(xml), Cow::Borrowed(_)));

        let xml = r#"<rss><enclosure itunes:length="a:b > c"/></rss>"#;
        let patched = declare_unbound_prefixes(xml);
        assert!(patched.contains("xmlns:itunes="));
        // Prefix-like text inside attribute values is ignored.
        assert!(!patched.contains("xmlns:a="));
    }

    #[test]
    fn test_xml_prefix_is_reserved() {
        let xml = r#"<rss><title xml:lang="en">x</title></rss>"#;
        assert!(matches!(declare_unbound_prefixes(xml), Cow::Borrowed(_)));
    }

    #[test]
    fn test_cdata_is_skipped() {
        let xml = r#"<rss><title><![CDATA[<b:bold>]]></title></rss>"#;
        assert!(matches!(declare_unbound_prefixes(xml), Cow::Borrowed(_)));
    }
}

use crate::domain::{ArchiveCategory, ArchiveItem, LATEST_CATEGORY};

/// Groups a flat item list into the `latest` → main → `main/sub` tree.
///
/// The root keeps the full unfiltered list as its own items. Below it every
/// item lands in exactly one place: directly under its main category when it
/// has no sub-category, otherwise inside the matching `main/sub` child.
pub fn group_categories(items: &[ArchiveItem]) -> ArchiveCategory {
    let mut main_categories: Vec<ArchiveCategory> = group_by(items, |item| item.main_category())
        .into_iter()
        .map(|(main, group)| build_main_category(main, group))
        .collect();
    main_categories.sort_by(|a, b| a.name.cmp(&b.name));

    ArchiveCategory {
        name: LATEST_CATEGORY.to_string(),
        display_name: "Latest Uploads".to_string(),
        items: items.to_vec(),
        sub_categories: main_categories,
        parent: None,
    }
}

fn build_main_category(main: &str, group: Vec<&ArchiveItem>) -> ArchiveCategory {
    let (nested, direct): (Vec<&ArchiveItem>, Vec<&ArchiveItem>) = group
        .into_iter()
        .partition(|item| !item.sub_category().is_empty());

    let mut sub_categories: Vec<ArchiveCategory> = group_by(nested, |item| item.sub_category())
        .into_iter()
        .map(|(sub, sub_items)| ArchiveCategory {
            name: format!("{}/{}", main, sub),
            display_name: sub.to_string(),
            items: sub_items.into_iter().cloned().collect(),
            sub_categories: Vec::new(),
            parent: Some(main.to_string()),
        })
        .collect();
    sub_categories.sort_by(|a, b| a.name.cmp(&b.name));

    ArchiveCategory {
        name: main.to_string(),
        display_name: main.to_string(),
        items: direct.into_iter().cloned().collect(),
        sub_categories,
        parent: Some(LATEST_CATEGORY.to_string()),
    }
}

/// Stable grouping: groups appear in first-seen order, items keep input order.
fn group_by<'a, I, F>(items: I, key: F) -> Vec<(&'a str, Vec<&'a ArchiveItem>)>
where
    I: IntoIterator<Item = &'a ArchiveItem>,
    F: Fn(&'a ArchiveItem) -> &'a str,
{
    let mut groups: Vec<(&'a str, Vec<&'a ArchiveItem>)> = Vec::new();
    for item in items {
        let k = key(item);
        match groups.iter_mut().find(|(name, _)| *name == k) {
            Some((_, group)) => group.push(item),
            None => groups.push((k, vec![item])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: &str) -> ArchiveItem {
        ArchiveItem::new(
            format!("Title {}", id),
            format!("https://archive.org/details/{}", id),
            category.into(),
        )
    }

    fn names(categories: &[ArchiveCategory]) -> Vec<&str> {
        categories.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_movies_and_audio_example() {
        let items = vec![
            item("doc", "movies/documentary"),
            item("film", "movies"),
            item("song", "audio"),
        ];

        let root = group_categories(&items);

        assert_eq!(root.name, "latest");
        assert_eq!(root.parent, None);
        assert_eq!(root.items, items);
        assert_eq!(names(&root.sub_categories), vec!["audio", "movies"]);

        let audio = &root.sub_categories[0];
        assert_eq!(audio.items.len(), 1);
        assert!(audio.sub_categories.is_empty());
        assert_eq!(audio.parent.as_deref(), Some("latest"));

        let movies = &root.sub_categories[1];
        assert_eq!(movies.items.len(), 1);
        assert_eq!(movies.items[0].identifier, "film");
        assert_eq!(names(&movies.sub_categories), vec!["movies/documentary"]);

        let documentary = &movies.sub_categories[0];
        assert_eq!(documentary.display_name, "documentary");
        assert_eq!(documentary.parent.as_deref(), Some("movies"));
        assert_eq!(documentary.items[0].identifier, "doc");
    }

    #[test]
    fn test_every_item_placed_exactly_once() {
        let items = vec![
            item("a", "texts/books"),
            item("b", "texts"),
            item("c", "texts/journals"),
            item("d", "movies/anime"),
            item("e", "texts/books"),
            item("f", "software"),
        ];

        let root = group_categories(&items);

        let placed: usize = root
            .sub_categories
            .iter()
            .map(ArchiveCategory::total_item_count)
            .sum();
        assert_eq!(placed, items.len());

        let mut seen: Vec<&str> = Vec::new();
        for main in &root.sub_categories {
            seen.extend(main.items.iter().map(|i| i.identifier.as_str()));
            for sub in &main.sub_categories {
                seen.extend(sub.items.iter().map(|i| i.identifier.as_str()));
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_sorted_and_stable_within_group() {
        let items = vec![
            item("z2", "texts/zines"),
            item("b1", "texts/books"),
            item("z1", "texts/zines"),
            item("m", "movies"),
        ];

        let root = group_categories(&items);
        assert_eq!(names(&root.sub_categories), vec!["movies", "texts"]);

        let texts = &root.sub_categories[1];
        assert_eq!(names(&texts.sub_categories), vec!["texts/books", "texts/zines"]);

        let zines: Vec<&str> = texts.sub_categories[1]
            .items
            .iter()
            .map(|i| i.identifier.as_str())
            .collect();
        assert_eq!(zines, vec!["z2", "z1"]);
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let items = vec![item("a", "audio/live"), item("b", "movies"), item("c", "audio")];
        assert_eq!(group_categories(&items), group_categories(&items));
    }

    #[test]
    fn test_empty_input() {
        let root = group_categories(&[]);
        assert!(root.items.is_empty());
        assert!(root.sub_categories.is_empty());
        assert_eq!(root.total_item_count(), 0);
    }
}

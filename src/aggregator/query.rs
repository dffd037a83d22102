use chrono::{Days, Months, NaiveDate};

use crate::domain::{HotPeriod, LATEST_CATEGORY};

pub const DEFAULT_ROWS: u32 = 50;

/// Media types offered as search filters, as (label, value).
pub const MEDIA_TYPES: [(&str, &str); 15] = [
    ("Texts", "texts"),
    ("Movies", "movies"),
    ("Audio", "audio"),
    ("Software", "software"),
    ("Image", "image"),
    ("Web", "web"),
    ("Data", "data"),
    ("Education", "education"),
    ("Collection", "collection"),
    ("Journals", "journals"),
    ("Etree", "etree"),
    ("Prelinger", "prelinger"),
    ("Podcasts", "podcasts"),
    ("Radio", "radio"),
    ("Additional Collections", "additional_collections"),
];

const SEARCH_FIELDS: [&str; 3] = ["identifier", "title", "mediatype"];
const CATEGORY_FIELDS: [&str; 5] = ["identifier", "title", "mediatype", "collection", "subject"];
const HOT_FIELDS: [&str; 5] = ["identifier", "title", "mediatype", "downloads", "addeddate"];

/// Parameters for one `advancedsearch.php` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub fields: Vec<String>,
    pub sorts: Vec<String>,
    pub rows: u32,
    pub page: u32,
}

impl SearchQuery {
    /// Free-text search, optionally narrowed to some media types.
    pub fn text(query: &str, media_types: &[String], page: u32, rows: u32) -> Self {
        let query = if media_types.is_empty() {
            query.to_string()
        } else {
            let filter = media_types
                .iter()
                .map(|m| format!("mediatype:{}", m))
                .collect::<Vec<_>>()
                .join(" OR ");
            format!("({}) AND ({})", query, filter)
        };

        Self {
            query,
            fields: to_strings(&SEARCH_FIELDS),
            sorts: Vec::new(),
            rows,
            page,
        }
    }

    pub fn category(name: &str, page: u32, rows: u32) -> Self {
        Self {
            query: category_query(name),
            fields: to_strings(&CATEGORY_FIELDS),
            sorts: Vec::new(),
            rows,
            page,
        }
    }

    /// Items added within `period` before `today`, most popular or newest first.
    pub fn hot(period: HotPeriod, today: NaiveDate, rows: u32) -> Self {
        let (from, to) = hot_date_range(period, today);
        let sorts: &[&str] = match period {
            HotPeriod::Month => &["-addeddate", "-downloads"],
            HotPeriod::Day | HotPeriod::Week | HotPeriod::Year => &["-downloads", "-addeddate"],
        };

        Self {
            query: format!("addeddate:[{} TO {}]", from, to),
            fields: to_strings(&HOT_FIELDS),
            sorts: to_strings(sorts),
            rows,
            page: 1,
        }
    }
}

/// Server-side query for browsing a category.
pub fn category_query(name: &str) -> String {
    if name == LATEST_CATEGORY {
        return "*".to_string();
    }
    match name.split_once('/') {
        Some((main, sub)) => format!("collection:{} AND mediatype:{}", main, sub),
        None => format!("collection:{}", name),
    }
}

pub fn hot_date_range(period: HotPeriod, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = match period {
        HotPeriod::Day => today.checked_sub_days(Days::new(1)),
        HotPeriod::Week => today.checked_sub_days(Days::new(7)),
        HotPeriod::Month => today.checked_sub_months(Months::new(1)),
        HotPeriod::Year => today.checked_sub_months(Months::new(12)),
    };
    (from.unwrap_or(NaiveDate::MIN), today)
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

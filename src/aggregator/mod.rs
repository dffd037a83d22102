pub mod pager;
pub mod query;
pub mod tree;

pub use pager::Pager;
pub use query::{category_query, hot_date_range, SearchQuery, DEFAULT_ROWS, MEDIA_TYPES};
pub use tree::group_categories;

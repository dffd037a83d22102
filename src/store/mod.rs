pub mod favorites;
pub mod sqlite;

use crate::app::Result;

pub use favorites::{FavoriteStore, FAVORITES_KEY};
pub use sqlite::SqliteStore;

/// Opaque string key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

use std::sync::Arc;

use crate::app::Result;
use crate::domain::ArchiveItem;
use crate::store::KeyValueStore;

/// Storage key holding the JSON-encoded favorites.
pub const FAVORITES_KEY: &str = "favorite_items";

/// Favorite items, keyed by identifier and kept in insertion order.
#[derive(Clone)]
pub struct FavoriteStore {
    store: Arc<dyn KeyValueStore + Send + Sync>,
}

impl FavoriteStore {
    pub fn new(store: Arc<dyn KeyValueStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Unreadable stored data counts as no favorites.
    pub fn list(&self) -> Result<Vec<ArchiveItem>> {
        let Some(json) = self.store.get(FAVORITES_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<ArchiveItem>>(&json) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!("Ignoring unreadable favorites: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub fn is_favorite(&self, identifier: &str) -> Result<bool> {
        Ok(self.list()?.iter().any(|i| i.identifier == identifier))
    }

    pub fn add(&self, item: &ArchiveItem) -> Result<()> {
        let mut items = self.list()?;
        if items.iter().any(|i| i.identifier == item.identifier) {
            return Ok(());
        }
        items.push(item.clone());
        self.save(&items)
    }

    pub fn remove(&self, identifier: &str) -> Result<()> {
        let mut items = self.list()?;
        items.retain(|i| i.identifier != identifier);
        self.save(&items)
    }

    /// Returns whether the item is a favorite afterwards.
    pub fn toggle(&self, item: &ArchiveItem) -> Result<bool> {
        if self.is_favorite(&item.identifier)? {
            self.remove(&item.identifier)?;
            Ok(false)
        } else {
            self.add(item)?;
            Ok(true)
        }
    }

    /// An empty list removes the key instead of storing `[]`.
    fn save(&self, items: &[ArchiveItem]) -> Result<()> {
        if items.is_empty() {
            return self.store.delete(FAVORITES_KEY);
        }
        let json = serde_json::to_string(items)?;
        self.store.put(FAVORITES_KEY, &json)
    }
}

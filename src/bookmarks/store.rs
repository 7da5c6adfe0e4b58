use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use log::debug;
use tokio::sync::Mutex;

use crate::{
    db::Database,
    models::{BookmarkedItem, InsightTag, NewsItem},
};

/// In-memory view of the user's saved items, written through to SQLite.
///
/// Entries are deduplicated by the `(title, stock, source)` identity key and
/// kept in insertion order. Mutations hold the list lock for their full
/// duration, so `toggle` is atomic with respect to a single caller.
#[derive(Clone)]
pub struct BookmarkStore {
    items: Arc<Mutex<Vec<BookmarkedItem>>>,
    db: Database,
}

impl BookmarkStore {
    /// Load persisted bookmarks. Insertion order survives restarts.
    pub async fn load(db: Database) -> Result<Self> {
        let items = db.list_bookmarks().await?;
        debug!("Loaded {} saved bookmarks", items.len());

        Ok(Self {
            items: Arc::new(Mutex::new(items)),
            db,
        })
    }

    /// Snapshot of the saved list in insertion order. Callers own the clone
    /// and may mutate it freely for display state.
    pub async fn get_all(&self) -> Vec<BookmarkedItem> {
        self.items.lock().await.clone()
    }

    pub async fn is_bookmarked(&self, item: &NewsItem) -> bool {
        self.items
            .lock()
            .await
            .iter()
            .any(|bookmark| bookmark.item.same_story(item))
    }

    /// Save an item. Re-adding an existing bookmark is a no-op.
    pub async fn add(&self, item: &NewsItem) -> Result<()> {
        let mut items = self.items.lock().await;
        self.insert_locked(&mut items, item).await
    }

    /// Drop any entry matching the identity key. Absent entries are ignored.
    pub async fn remove(&self, item: &NewsItem) -> Result<()> {
        let mut items = self.items.lock().await;
        self.remove_locked(&mut items, item).await
    }

    /// Primary UI entry point: removes if present, adds otherwise. Returns
    /// the resulting membership state (true = now bookmarked).
    pub async fn toggle(&self, item: &NewsItem) -> Result<bool> {
        let mut items = self.items.lock().await;
        if items.iter().any(|bookmark| bookmark.item.same_story(item)) {
            self.remove_locked(&mut items, item).await?;
            Ok(false)
        } else {
            self.insert_locked(&mut items, item).await?;
            Ok(true)
        }
    }

    /// Overwrite the tag on an existing bookmark. Returns false when no entry
    /// matches the identity key; nothing is created in that case.
    pub async fn update_tag(&self, item: &NewsItem, tag: InsightTag) -> Result<bool> {
        let mut items = self.items.lock().await;
        let Some(bookmark) = items
            .iter_mut()
            .find(|bookmark| bookmark.item.same_story(item))
        else {
            return Ok(false);
        };

        bookmark.item.tag = tag;
        self.db.update_bookmark_tag(item, tag).await?;
        Ok(true)
    }

    /// Overwrite the free-text note on an existing bookmark. Returns false
    /// when no entry matches; nothing is created in that case.
    pub async fn update_note(&self, item: &NewsItem, note: &str) -> Result<bool> {
        let mut items = self.items.lock().await;
        let Some(bookmark) = items
            .iter_mut()
            .find(|bookmark| bookmark.item.same_story(item))
        else {
            return Ok(false);
        };

        bookmark.note = Some(note.to_string());
        self.db.update_bookmark_note(item, note.to_string()).await?;
        Ok(true)
    }

    async fn insert_locked(
        &self,
        items: &mut Vec<BookmarkedItem>,
        item: &NewsItem,
    ) -> Result<()> {
        if items.iter().any(|bookmark| bookmark.item.same_story(item)) {
            return Ok(());
        }

        let bookmark = BookmarkedItem::new(item.clone(), Utc::now());
        self.db.insert_bookmark(&bookmark).await?;
        items.push(bookmark);
        Ok(())
    }

    async fn remove_locked(
        &self,
        items: &mut Vec<BookmarkedItem>,
        item: &NewsItem,
    ) -> Result<()> {
        items.retain(|bookmark| !bookmark.item.same_story(item));
        self.db.delete_bookmark(item).await
    }
}

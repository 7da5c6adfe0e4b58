use marketbrief::{
    db::Database,
    models::{InsightTag, NewsItem},
    BookmarkStore,
};
use tempfile::TempDir;

fn news(title: &str, stock: &str, source: &str) -> NewsItem {
    NewsItem {
        title: title.to_string(),
        summary: "Manufacturing output has increased month-over-month.".to_string(),
        stock: stock.to_string(),
        sector: "Technology".to_string(),
        tag: InsightTag::Neutral,
        source: source.to_string(),
        time: "2h ago".to_string(),
    }
}

async fn scratch_store() -> (TempDir, BookmarkStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Database::new(dir.path().join("test.sqlite3")).expect("database");
    let store = BookmarkStore::load(db).await.expect("bookmark store");
    (dir, store)
}

#[tokio::test]
async fn add_is_idempotent() {
    let (_dir, store) = scratch_store().await;
    let item = news("ASML Q3 Earnings Miss Expectations", "ASML", "Reuters");

    store.add(&item).await.unwrap();
    store.add(&item).await.unwrap();

    assert_eq!(store.get_all().await.len(), 1);
}

#[tokio::test]
async fn toggle_is_symmetric() {
    let (_dir, store) = scratch_store().await;
    let item = news("Apple Supply Chain Shifts to India", "AAPL", "Bloomberg");

    assert!(store.toggle(&item).await.unwrap());
    assert!(store.is_bookmarked(&item).await);

    assert!(!store.toggle(&item).await.unwrap());
    assert!(!store.is_bookmarked(&item).await);
}

#[tokio::test]
async fn identity_ignores_non_key_fields() {
    let (_dir, store) = scratch_store().await;
    let original = news("Fed signals pause in rate hikes", "JPM", "WSJ");

    let mut variant = original.clone();
    variant.summary = "Completely different summary text.".to_string();
    variant.tag = InsightTag::Opportunity;
    variant.sector = "Finance".to_string();

    store.add(&original).await.unwrap();
    store.add(&variant).await.unwrap();

    // Same (title, stock, source) means the same bookmark.
    assert_eq!(store.get_all().await.len(), 1);
    assert!(store.is_bookmarked(&variant).await);
}

#[tokio::test]
async fn updates_on_missing_entry_change_nothing() {
    let (_dir, store) = scratch_store().await;
    let item = news("EV market consolidation expected", "TSLA", "Reuters");

    assert!(!store.update_tag(&item, InsightTag::Risk).await.unwrap());
    assert!(!store.update_note(&item, "watch closely").await.unwrap());

    assert!(store.get_all().await.is_empty());
}

#[tokio::test]
async fn tag_and_note_updates_apply_to_saved_items() {
    let (_dir, store) = scratch_store().await;
    let item = news("Geopolitical tensions rise", "", "CNBC");

    store.add(&item).await.unwrap();
    assert!(store.update_tag(&item, InsightTag::Risk).await.unwrap());
    assert!(store.update_note(&item, "hedge exposure").await.unwrap());

    let saved = store.get_all().await;
    assert_eq!(saved[0].item.tag, InsightTag::Risk);
    assert_eq!(saved[0].note.as_deref(), Some("hedge exposure"));
}

#[tokio::test]
async fn remove_of_absent_entry_is_a_noop() {
    let (_dir, store) = scratch_store().await;
    let item = news("Never bookmarked", "MSFT", "Reuters");

    store.remove(&item).await.unwrap();
    assert!(store.get_all().await.is_empty());
}

#[tokio::test]
async fn bookmarks_survive_a_store_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("test.sqlite3");

    let first = news("First saved story", "AAPL", "Reuters");
    let second = news("Second saved story", "NVDA", "Bloomberg");

    {
        let db = Database::new(db_path.clone()).expect("database");
        let store = BookmarkStore::load(db).await.expect("bookmark store");
        store.add(&first).await.unwrap();
        store.add(&second).await.unwrap();
        store.update_note(&first, "kept across restarts").await.unwrap();
    }

    let db = Database::new(db_path).expect("database");
    let store = BookmarkStore::load(db).await.expect("bookmark store");

    let saved = store.get_all().await;
    assert_eq!(saved.len(), 2);
    // Insertion order is preserved across restarts.
    assert_eq!(saved[0].item.title, "First saved story");
    assert_eq!(saved[1].item.title, "Second saved story");
    assert_eq!(saved[0].note.as_deref(), Some("kept across restarts"));
}

#[tokio::test]
async fn get_all_hands_out_a_snapshot() {
    let (_dir, store) = scratch_store().await;
    let item = news("Snapshot semantics", "AAPL", "Reuters");
    store.add(&item).await.unwrap();

    let mut snapshot = store.get_all().await;
    snapshot.clear();

    assert_eq!(store.get_all().await.len(), 1);
}

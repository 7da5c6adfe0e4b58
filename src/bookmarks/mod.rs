mod store;

pub use store::BookmarkStore;

mod bookmark;
mod interests;
mod news;

pub use bookmark::BookmarkedItem;
pub use interests::{Membership, Theme, UserInterests};
pub use news::{InsightTag, NewsItem};

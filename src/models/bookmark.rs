use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::news::NewsItem;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkedItem {
    #[serde(flatten)]
    pub item: NewsItem,
    pub note: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl BookmarkedItem {
    pub fn new(item: NewsItem, saved_at: DateTime<Utc>) -> Self {
        Self {
            item,
            note: None,
            saved_at,
        }
    }
}

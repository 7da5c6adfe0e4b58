use serde::{Deserialize, Serialize};

/// Editorial signal attached to a news item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InsightTag {
    Risk,
    Opportunity,
    Neutral,
}

impl Default for InsightTag {
    fn default() -> Self {
        InsightTag::Neutral
    }
}

impl InsightTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightTag::Risk => "Risk",
            InsightTag::Opportunity => "Opportunity",
            InsightTag::Neutral => "Neutral",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    /// Ticker symbol, or empty when the story is not stock-specific.
    pub stock: String,
    pub sector: String,
    pub tag: InsightTag,
    pub source: String,
    /// Display string as delivered by the feed ("2h ago" etc.).
    pub time: String,
}

impl NewsItem {
    /// Items carry no surrogate ID; `(title, stock, source)` is the
    /// identity key used to deduplicate bookmarks.
    pub fn same_story(&self, other: &NewsItem) -> bool {
        self.title == other.title && self.stock == other.stock && self.source == other.source
    }
}

use anyhow::Result;
use serde::Deserialize;

use super::articles::Pagination;
use super::client::ApiClient;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightSignal {
    Positive,
    Mixed,
    Risk,
    Watching,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightArticle {
    pub id: String,
    pub headline: String,
    pub source: String,
    pub url: String,
    pub published_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub article_id: String,
    pub summary: String,
    pub signal: InsightSignal,
    pub created_at: String,
    pub article: Option<InsightArticle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsightsPage {
    pub insights: Vec<Insight>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default)]
pub struct InsightQuery {
    pub signal: Option<String>,
    pub article_id: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ApiClient {
    pub async fn insights(&self, query: &InsightQuery) -> Result<InsightsPage> {
        let mut params = Vec::new();
        if let Some(signal) = &query.signal {
            params.push(("signal", signal.clone()));
        }
        if let Some(article_id) = &query.article_id {
            params.push(("articleId", article_id.clone()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = query.offset {
            params.push(("offset", offset.to_string()));
        }

        self.get_json("/insights", &params).await
    }

    /// Per-entity insight feed. The backend's shape for this endpoint is
    /// still in flux, so the raw JSON is handed to the caller.
    pub async fn article_insights(
        &self,
        entity_type: Option<&str>,
        entity_id: Option<&str>,
    ) -> Result<serde_json::Value> {
        let mut params = Vec::new();
        if let Some(entity_type) = entity_type {
            params.push(("entityType", entity_type.to_string()));
        }
        if let Some(entity_id) = entity_id {
            params.push(("entityId", entity_id.to_string()));
        }

        self.get_json("/insights/article-insights", &params).await
    }

    pub async fn aggregate_insights(
        &self,
        entity_type: &str,
        entity_key: &str,
        timeframe: Option<&str>,
    ) -> Result<serde_json::Value> {
        let mut params = vec![
            ("entityType", entity_type.to_string()),
            ("entityKey", entity_key.to_string()),
        ];
        if let Some(timeframe) = timeframe {
            params.push(("timeframe", timeframe.to_string()));
        }

        self.get_json("/insights/aggregate", &params).await
    }
}

use anyhow::Result;
use serde::Deserialize;

use super::client::ApiClient;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub headline: String,
    pub source: String,
    pub url: String,
    pub published_at: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticlesPage {
    pub articles: Vec<Article>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestArticles {
    pub articles: Vec<Article>,
    pub count: u64,
    pub source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockArticles {
    pub articles: Vec<Article>,
    pub count: u64,
    pub symbol: String,
    pub source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectorArticles {
    pub articles: Vec<Article>,
    pub count: u64,
    pub sector: String,
    pub source: String,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    pub source: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ApiClient {
    pub async fn articles(&self, query: &ArticleQuery) -> Result<ArticlesPage> {
        let mut params = Vec::new();
        if let Some(source) = &query.source {
            params.push(("source", source.clone()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = query.offset {
            params.push(("offset", offset.to_string()));
        }

        self.get_json("/articles", &params).await
    }

    pub async fn latest_articles(&self) -> Result<LatestArticles> {
        self.get_json("/articles/latest", &[]).await
    }

    pub async fn articles_by_stock(&self, symbol: &str) -> Result<StockArticles> {
        self.get_json(&format!("/articles/stock/{symbol}"), &[]).await
    }

    pub async fn articles_by_sector(&self, sector: &str) -> Result<SectorArticles> {
        self.get_json(&format!("/articles/sector/{sector}"), &[]).await
    }
}

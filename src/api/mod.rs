mod articles;
mod auth;
mod client;
mod insights;
mod interests;

pub use articles::{
    Article, ArticleQuery, ArticlesPage, LatestArticles, Pagination, SectorArticles, StockArticles,
};
pub use auth::{AuthResponse, Credentials, Plan, User};
pub use client::ApiClient;
pub use insights::{Insight, InsightArticle, InsightQuery, InsightSignal, InsightsPage};
pub use interests::InterestsUpdate;

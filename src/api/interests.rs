use anyhow::Result;
use log::error;
use serde::Serialize;

use super::client::ApiClient;
use crate::models::UserInterests;

/// Partial update for `PUT /user/interests`; absent fields are left untouched
/// server-side.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stocks: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sectors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_country: Option<String>,
}

impl ApiClient {
    /// Fetch followed stocks/sectors. Degrades to the empty-interests object
    /// on failure; the user may simply not have picked any yet.
    pub async fn get_interests(&self) -> UserInterests {
        match self.get_json("/user/interests", &[]).await {
            Ok(interests) => interests,
            Err(err) => {
                error!("Error getting user interests: {err}");
                UserInterests::default()
            }
        }
    }

    pub async fn update_interests(&self, update: &InterestsUpdate) -> Result<()> {
        self.put_json("/user/interests", update).await
    }

    pub async fn update_stocks(&self, stocks: Vec<String>) -> Result<()> {
        self.update_interests(&InterestsUpdate {
            stocks: Some(stocks),
            ..InterestsUpdate::default()
        })
        .await
    }

    pub async fn update_sectors(&self, sectors: Vec<String>) -> Result<()> {
        self.update_interests(&InterestsUpdate {
            sectors: Some(sectors),
            ..InterestsUpdate::default()
        })
        .await
    }

    pub async fn update_preferred_country(&self, country: &str) -> Result<()> {
        self.update_interests(&InterestsUpdate {
            preferred_country: Some(country.to_string()),
            ..InterestsUpdate::default()
        })
        .await
    }
}

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use crate::models::Membership;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Plan {
    Free,
    Pro,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub plan: Plan,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

impl ApiClient {
    /// Exchange credentials for a bearer token. On success the token is
    /// persisted and the authenticated flag flips — that write is what moves
    /// the session resolver to the main surface.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let response: AuthResponse = self.post_json("/auth/login", credentials).await?;
        self.store_session(&response)?;
        Ok(response)
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let response: AuthResponse = self.post_json("/auth/register", credentials).await?;
        self.store_session(&response)?;
        Ok(response)
    }

    /// Local-only: drops the token and authentication flag. No server call.
    pub fn logout(&self) -> Result<()> {
        self.flags().clear_auth_token()?;
        self.flags().clear_authentication()
    }

    fn store_session(&self, auth: &AuthResponse) -> Result<()> {
        self.flags().set_auth_token(&auth.token)?;
        self.flags().set_authenticated(true)?;

        // The account plan feeds the feature-gating flag.
        self.flags().set_membership(match auth.user.plan {
            Plan::Pro => Membership::Pro,
            Plan::Free => Membership::Member,
        })
    }
}

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::error;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::session::FlagStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error payload shape used by the backend for non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Thin typed client for the news backend. Requests carry the stored bearer
/// token when one exists; a 401 response clears it so the next login starts
/// clean. No retry, backoff, or offline queueing.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    flags: FlagStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, flags: FlagStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            flags,
        })
    }

    pub(crate) fn flags(&self) -> &FlagStore {
        &self.flags
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .request(Method::GET, path)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?;
        self.decode(response, path).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .request(Method::POST, path)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {path} failed"))?;
        self.decode(response, path).await
    }

    /// PUT with a JSON body, discarding any response payload.
    pub(crate) async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let response = self
            .request(Method::PUT, path)
            .json(body)
            .send()
            .await
            .with_context(|| format!("PUT {path} failed"))?;
        self.check_status(response, path).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        if let Some(token) = self.flags.auth_token() {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        path: &str,
    ) -> Result<T> {
        let response = self.check_status(response, path).await?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("invalid response body from {path}"))
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            // Token expired or revoked.
            if let Err(err) = self.flags.clear_auth_token() {
                error!("Failed to clear stale auth token: {err}");
            }
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);

        Err(match message {
            Some(message) => anyhow!(message),
            None => anyhow!("request to {path} failed with status {status}"),
        })
    }
}

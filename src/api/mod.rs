//! HTTP client for the finance backend.
//!
//! [`ApiClient`] owns the base URL and the bearer token; the resource modules
//! add one typed method per backend endpoint on top of the generic verbs here.

pub mod accounts;
pub mod auth;
pub mod currency;
pub mod transactions;
pub mod user;

use anyhow::{Context, Result, anyhow};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Display;
use tracing::{debug, error, instrument};

use crate::core::model::Message;

/// A non-success response from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    /// The `message` field of the error body, when there was one.
    pub message: Option<String>,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{message}"),
            None => write!(f, "HTTP error: {}", self.status),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// The text shown to the user for a failed action: the backend's own message
/// if it sent one, otherwise `fallback`.
pub fn user_message(err: &anyhow::Error, fallback: &str) -> String {
    err.downcast_ref::<ApiError>()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| fallback.to_string())
}

/// Replaces `err` with its user-facing form, logging the original.
pub fn fail(err: anyhow::Error, fallback: &str) -> anyhow::Error {
    debug!(error = ?err, "{}", fallback);
    anyhow!(user_message(&err, fallback))
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fintrack/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            client,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn url_with_query(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        Url::parse_with_params(&self.url(path), params)
            .with_context(|| format!("Invalid request URL for {path}"))
    }

    fn request(&self, method: Method, url: impl reqwest::IntoUrl) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and returns the body of a successful response.
    async fn send_raw(&self, builder: RequestBuilder, path: &str) -> Result<String> {
        let response = builder
            .send()
            .await
            .with_context(|| format!("Request error for {path}"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for {path}"))?;
        debug!(%status, "Received response");

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message);
            return Err(ApiError { status, message }.into());
        }
        Ok(text)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, path: &str) -> Result<T> {
        let text = self.send_raw(builder, path).await?;
        match serde_json::from_str(&text) {
            Ok(data) => Ok(data),
            Err(e) => {
                error!(
                    error = ?e,
                    response = %text,
                    "Failed to parse response"
                );
                Err(e).with_context(|| format!("Failed to parse response from {path}"))
            }
        }
    }

    #[instrument(name = "GET", skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::GET, self.url(path)), path).await
    }

    #[instrument(name = "GET", skip(self, params))]
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url_with_query(path, params)?;
        self.send(self.request(Method::GET, url), path).await
    }

    #[instrument(name = "POST", skip(self, body))]
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, self.url(path)).json(body), path).await
    }

    #[instrument(name = "POST", skip(self))]
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::POST, self.url(path)), path).await
    }

    /// Posts a mutation and reads the reply as an acknowledgement only.
    #[instrument(name = "POST", skip(self, body))]
    pub async fn post_ack<B>(&self, path: &str, body: &B) -> Result<Message>
    where
        B: Serialize + ?Sized,
    {
        self.send_ack(self.request(Method::POST, self.url(path)).json(body), path).await
    }

    #[instrument(name = "PUT", skip(self, body))]
    pub async fn put_ack<B>(&self, path: &str, body: &B) -> Result<Message>
    where
        B: Serialize + ?Sized,
    {
        self.send_ack(self.request(Method::PUT, self.url(path)).json(body), path).await
    }

    #[instrument(name = "DELETE", skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Message> {
        self.send_ack(self.request(Method::DELETE, self.url(path)), path).await
    }

    /// Success status is what counts. Whatever the body holds beyond
    /// `message`, or an empty body, is ignored.
    async fn send_ack(&self, builder: RequestBuilder, path: &str) -> Result<Message> {
        let text = self.send_raw(builder, path).await?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }
}

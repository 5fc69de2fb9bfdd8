use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::web::types::ValidEmail;

pub const SUBSCRIBERS_ENDPOINT: &str = "subscribers";
pub const API_ERROR_FALLBACK: &str = "Failed to subscribe due to an API error.";

/// The capability of registering a subscriber with the provider.
/// `AppState` holds it as a trait object so tests can swap the HTTP client out.
#[async_trait]
pub trait SubscriberRegistry: Send + Sync {
    async fn create_subscriber(
        &self,
        api_key: &SecretString,
        payload: &SubscriberPayload<'_>,
    ) -> Result<SubscriptionResult>;
}

/// Outcome of a completed call to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionResult {
    Subscribed,
    Rejected { status: StatusCode, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    Active,
}

#[derive(Debug, Serialize)]
pub struct SubscriberPayload<'a> {
    pub email: &'a str,
    pub groups: Vec<&'a str>,
    pub status: SubscriberStatus,
}

impl<'a> SubscriberPayload<'a> {
    pub fn new(email: &'a ValidEmail, group_id: &'a str) -> Self {
        SubscriberPayload {
            email: email.as_ref(),
            groups: vec![group_id],
            status: SubscriberStatus::Active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailerLiteClient {
    http_client: Client,
    endpoint: reqwest::Url,
}

impl MailerLiteClient {
    /// `url` is the API base, the subscribers endpoint gets joined onto it.
    pub fn new<S: AsRef<str>>(url: S) -> Result<Self> {
        let mut base =
            reqwest::Url::parse(url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;
        // `Url::join` replaces the last segment unless the path ends with a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join(SUBSCRIBERS_ENDPOINT)
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().build()?;

        Ok(MailerLiteClient {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait]
impl SubscriberRegistry for MailerLiteClient {
    #[tracing::instrument(name = "Registering subscriber with MailerLite", skip_all)]
    async fn create_subscriber(
        &self,
        api_key: &SecretString,
        payload: &SubscriberPayload<'_>,
    ) -> Result<SubscriptionResult> {
        let resp = self
            .http_client
            .post(self.endpoint.clone())
            .bearer_auth(api_key.expose_secret())
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        // The success body is never read.
        if status.is_success() {
            info!("{:<12} - provider accepted subscriber", "MAILERLITE");
            return Ok(SubscriptionResult::Subscribed);
        }

        let body = resp.bytes().await?;
        error!(
            "{:<12} - provider rejected subscriber: {status} - {}",
            "MAILERLITE",
            String::from_utf8_lossy(&body)
        );
        let message = provider_error_message(&body).unwrap_or_else(|| API_ERROR_FALLBACK.into());

        Ok(SubscriptionResult::Rejected { status, message })
    }
}

// ###################################
// ->   PROVIDER ERROR BODY
// ###################################
#[derive(Deserialize)]
struct ProviderErrorBody {
    error: Option<ProviderErrorDetail>,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    #[serde(default)]
    message: Value,
}

/// Extracts `error.message` from the provider's error body.
/// Scalars other than empty strings, `0` and `false` get stringified, anything else is `None`.
fn provider_error_message(body: &[u8]) -> Option<String> {
    let message = serde_json::from_slice::<ProviderErrorBody>(body)
        .ok()?
        .error?
        .message;

    match message {
        Value::String(message) if !message.is_empty() => Some(message),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Bool(true) => Some(true.to_string()),
        _ => None,
    }
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

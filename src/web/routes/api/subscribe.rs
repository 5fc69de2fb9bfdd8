use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    Json,
};
use tracing::info;

use crate::{
    config::ConfigError,
    mailerlite::{self, SubscriberPayload, SubscriptionResult},
    web::{
        types::{DataParsingError, MessageBody, SubscribeRequest, ValidEmail},
        ClientError, WebResult,
    },
    AppState,
};

pub const SUBSCRIBED_MSG: &str = "Successfully subscribed!";

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("method not allowed: {0}")]
    MethodNotAllowed(Method),

    #[error("invalid subscriber email: {0}")]
    InvalidEmail(#[from] DataParsingError),

    #[error("server configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("provider rejected subscriber with status {status}: {message}")]
    ProviderRejected { status: StatusCode, message: String },

    #[error("provider request failed: {0}")]
    Provider(#[from] mailerlite::Error),
}

impl SubscribeError {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            SubscribeError::MethodNotAllowed(_) => {
                (StatusCode::METHOD_NOT_ALLOWED, MethodNotAllowed)
            }
            SubscribeError::InvalidEmail(_) => (StatusCode::BAD_REQUEST, InvalidEmail),
            SubscribeError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, ConfigurationError),
            SubscribeError::ProviderRejected { status, message } => {
                (*status, ProviderRejected(message.clone()))
            }
            SubscribeError::Provider(_) => (StatusCode::INTERNAL_SERVER_ERROR, ServiceError),
        }
    }
}

// ###################################
// ->   API
// ###################################
/// Validates the email, then registers it with the provider's configured group.
/// Every guard exits early, nothing is retried.
#[tracing::instrument(name = "Registering a new subscriber", skip_all, fields(method = %method))]
pub async fn subscribe(
    State(app_state): State<AppState>,
    method: Method,
    body: Result<Json<SubscribeRequest>, JsonRejection>,
) -> WebResult<(StatusCode, Json<MessageBody>)> {
    if method != Method::POST {
        return Err(SubscribeError::MethodNotAllowed(method).into());
    }

    let email = body
        .map_err(|rejection| DataParsingError::MalformedBody(rejection.body_text()))
        .and_then(|Json(request)| ValidEmail::parse(request.email.unwrap_or_default()))
        .map_err(SubscribeError::InvalidEmail)?;

    let credentials = app_state
        .provider_config
        .credentials()
        .map_err(SubscribeError::Config)?;
    let payload = SubscriberPayload::new(&email, credentials.group_id);

    let result = app_state
        .subscriber_registry
        .create_subscriber(credentials.api_key, &payload)
        .await
        .map_err(SubscribeError::Provider)?;

    match result {
        SubscriptionResult::Subscribed => {
            info!("SUCCESS");
            Ok((StatusCode::CREATED, Json(MessageBody::new(SUBSCRIBED_MSG))))
        }
        SubscriptionResult::Rejected { status, message } => {
            Err(SubscribeError::ProviderRejected { status, message }.into())
        }
    }
}

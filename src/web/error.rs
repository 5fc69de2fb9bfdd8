use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use super::routes::SubscribeError;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("subscribe error: {0}")]
    Subscribe(#[from] SubscribeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        match self {
            Error::Subscribe(er) => er.status_code_and_client_error(),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, ClientError::ServiceError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// What the caller gets to see. The `Display` output is the response message.
#[derive(Debug, Clone, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Method Not Allowed")]
    MethodNotAllowed,
    #[display("A valid email is required.")]
    InvalidEmail,
    #[display("Server configuration error.")]
    ConfigurationError,
    #[display("{_0}")]
    ProviderRejected(String),
    #[display("An internal server error occurred.")]
    ServiceError,
}

use std::sync::Arc;

use axum::{
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::web::{log, types::MessageBody, Error, REQUEST_ID_HEADER};

/// Turns a `web::Error` stashed in the response extensions into a `{ "message": .. }` response
/// and writes the request log line.
pub async fn response_mapper(
    req_method: Method,
    uri: Uri,
    headers: HeaderMap,
    resp: Response,
) -> Response {
    // Set by `SetRequestIdLayer` before the request reaches us.
    let req_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let web_error = resp.extensions().get::<Arc<Error>>().map(|er| &**er);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    if let (Some(er), Some((status, _))) = (web_error, client_status_and_error.as_ref()) {
        if status.is_server_error() {
            tracing::error!("{:<12} - {er} ID: {req_id}", "SERVER_ERROR");
        }
    }

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        let body = MessageBody::new(cl_err.to_string());
        (*status, Json(body)).into_response()
    });

    log::log_request(
        &req_id,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error,
    );

    err_resp.unwrap_or(resp)
}

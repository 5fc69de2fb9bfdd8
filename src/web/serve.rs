use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request, Response},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::App;

use super::{midware, routes::routes, WebResult, REQUEST_ID_HEADER};

/// Serves the application until the listener fails.
///
/// Every request gets an `x-request-id` and a tracing span,
/// errors get mapped to `{ "message": .. }` bodies.
pub async fn serve(app: App) -> WebResult<()> {
    let App {
        app_state,
        listener,
    } = app;

    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Outermost layer first. Responses pass the stack in reverse, so the id gets
    // propagated onto whatever the response mapper produced, error bodies included.
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(x_request_id))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_request(|req: &Request<Body>, _: &Span| {
                    tracing::info!("START {} @ {}", req.method(), req.uri())
                })
                .on_response(log_response),
        )
        .layer(middleware::map_response(midware::response_mapper));

    let app = Router::new()
        .merge(routes(app_state))
        .layer(middleware_stack);

    axum::serve(listener, app).await?;

    Ok(())
}

fn request_span(req: &Request<Body>) -> Span {
    let req_id = req
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or_default();

    tracing::error_span!(
        "serve",
        id = req_id,
        method = %req.method(),
        path = req.uri().path()
    )
}

fn log_response(res: &Response<Body>, latency: Duration, _: &Span) {
    let status = res.status();

    if status.is_client_error() || status.is_server_error() {
        tracing::warn!("END in: {latency:?} | STATUS: {}", status.as_u16())
    } else {
        tracing::info!("END in: {latency:?} | STATUS: {}", status.as_u16())
    }
}

//! Request handlers for the status service.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Path, Request, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tower::ServiceExt;

use crate::http::context::RenderContext;
use crate::http::server::StatusState;
use crate::observability::metrics;

/// `GET /assets/{type}/{file}`: serve from the assets directory with the
/// `/assets` prefix stripped.
pub async fn serve_asset(
    State(state): State<StatusState>,
    Path((kind, file)): Path<(String, String)>,
    mut request: Request,
) -> Response {
    tracing::debug!(kind = %kind, file = %file, "Serving asset");

    let uri = request.uri();
    let stripped = uri.path().strip_prefix("/assets").unwrap_or(uri.path());
    let rewritten = match uri.query() {
        Some(query) => format!("{stripped}?{query}"),
        None => stripped.to_string(),
    };
    match rewritten.parse::<Uri>() {
        Ok(uri) => *request.uri_mut() = uri,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    }

    match state.assets.clone().oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// `GET /`: render the default template.
pub async fn render_default(State(state): State<StatusState>, request: Request) -> Response {
    let template = state.templates.default_template().to_string();
    render_template(&state, &template, &request)
}

/// `GET /{template}`: render the named template.
pub async fn render_named(
    State(state): State<StatusState>,
    Path(template): Path<String>,
    request: Request,
) -> Response {
    render_template(&state, &template, &request)
}

fn render_template(state: &StatusState, template: &str, request: &Request) -> Response {
    let start = Instant::now();
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info!(
        remote_addr = %remote_addr,
        url = %request.uri(),
        request_id = %request_id,
        template = %template,
        "Serving template"
    );

    let context = RenderContext::capture(&state.interfaces, &state.stores, template);
    let response = match state.templates.render(template, &context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!(template = %template, error = %e, "Template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    };

    metrics::record_render(template, response.status().as_u16(), start);
    response
}

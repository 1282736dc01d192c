use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{debug, error, info};

use crate::config::AppConfig;

pub mod api;
pub mod routes;

pub fn run_server(config: &AppConfig) -> std::io::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(config.clone()))
}

async fn serve(config: AppConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("metaview server listening on http://{}", config.bind_addr);
    axum::serve(listener, app(config)).await
}

/// Every non-static request goes through [`routes::route_request`].
pub fn app(config: AppConfig) -> Router {
    let max_body_bytes = config.max_body_bytes;
    let static_dir = config.static_dir.clone();

    let mut router = Router::new()
        .fallback(dispatch)
        .with_state(Arc::new(config));
    if let Some(dir) = static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }
    router.layer(DefaultBodyLimit::max(max_body_bytes))
}

async fn dispatch(
    State(config): State<Arc<AppConfig>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let method = method.as_str().to_string();
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    debug!(%method, %path, bytes = body.len(), "request");

    // Fetching and normalizing are blocking; keep them off the async workers.
    let routed =
        tokio::task::spawn_blocking(move || routes::route_request(&config, &method, &path, &body))
            .await;
    match routed {
        Ok(response) => response.into_response(),
        Err(err) => {
            error!(error = %err, "request handler panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}

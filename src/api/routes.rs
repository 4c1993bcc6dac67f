//! HTTP API route definitions.

use std::future::Future;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::envelope::{DeletedItem, ErrorEnvelope};
use super::handlers::{health, prometheus_metrics, ready, route_not_found, status, AppState};
use super::items::{self, CreateItemRequest, UpdateItemRequest};
use crate::items::Item;
use crate::{metrics, ui};

/// OpenAPI document for the item endpoints.
#[derive(OpenApi)]
#[openapi(
    info(title = "Cherry CRUD API", description = "Manage items in an in-memory store"),
    paths(
        items::list_items,
        items::create_item,
        items::get_item,
        items::update_item,
        items::delete_item
    ),
    components(schemas(Item, CreateItemRequest, UpdateItemRequest, DeletedItem, ErrorEnvelope)),
    tags((name = "items", description = "Item management"))
)]
pub struct ApiDoc;

/// Create the application router.
pub fn create_router(state: AppState, swagger_ui: bool) -> Router {
    let mut router = Router::new()
        // UI
        .route("/", get(ui::index))
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Status and metrics
        .route("/api/v1/status", get(status))
        .route("/metrics", get(prometheus_metrics))
        // Items
        .route("/items", get(items::list_items).post(items::create_item))
        .route(
            "/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        );

    if swagger_ui {
        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
        .fallback(route_not_found)
        .layer(middleware::from_fn(track_http_latency))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> crate::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Record request latency labelled by route template.
async fn track_http_latency(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_http_latency(start, &endpoint);
    response
}

use crate::handlers;
use crate::state::MockApiState;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use invoicer_core::validation::MAX_FILE_SIZE_BYTES;
use invoicer_core::MockServerConfig;
use invoicer_infra::request_id_middleware;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Headroom over the largest accepted document for multipart framing.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

pub fn setup_routes(
    config: &MockServerConfig,
    state: Arc<MockApiState>,
) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config);
    let body_limit = usize::try_from(MAX_FILE_SIZE_BYTES + MULTIPART_OVERHEAD_BYTES)?;

    let app = Router::new()
        .route("/invoice/{id}", get(handlers::invoice_get::get_invoice))
        .route("/invoices", get(handlers::invoice_search::list_invoices))
        .route(
            "/invoices/vendor/{name}",
            get(handlers::invoice_search::search_by_vendor),
        )
        .route("/extract", post(handlers::extract::extract_invoice))
        .route("/health", get(handlers::health::health))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

/// Any origin may call the mock; it holds no real data.
fn setup_cors(config: &MockServerConfig) -> CorsLayer {
    if config.is_production() {
        tracing::warn!("Mock API started with a production environment; CORS still allows all origins");
    }

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

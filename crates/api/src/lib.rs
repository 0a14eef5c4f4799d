//! HTTP API server with observability for the storefront backend.
//!
//! Provides REST endpoints for the product catalog, user registration and
//! login, and order placement, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use domain::{
    CatalogService, InMemoryOrderStore, InMemoryProductStore, InMemoryUserStore, OrderService,
    TaxRate, UserDirectory,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Catalog service backed by the in-memory product store.
pub type Catalog = CatalogService<InMemoryProductStore>;

/// Order service reserving stock against [`Catalog`].
pub type Orders = OrderService<InMemoryOrderStore, Catalog>;

/// User directory backed by the in-memory user store.
pub type Users = UserDirectory<InMemoryUserStore>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub catalog: Catalog,
    pub orders: Orders,
    pub users: Users,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/products",
            post(routes::products::create).get(routes::products::list),
        )
        .route(
            "/products/{id}",
            get(routes::products::get)
                .put(routes::products::update)
                .delete(routes::products::delete),
        )
        .route("/users/register", post(routes::users::register))
        .route("/users/login", post(routes::users::login))
        .route(
            "/orders",
            post(routes::orders::create).get(routes::orders::list),
        )
        .route("/orders/{id}", get(routes::orders::for_user))
        .route("/orders/{id}/status", put(routes::orders::update_status))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over empty in-memory stores.
///
/// The order service and the HTTP product endpoints share one catalog, so
/// stock reserved by orders is visible through `/products`.
pub fn create_default_state(tax_rate: TaxRate) -> Arc<AppState> {
    let catalog = CatalogService::new(InMemoryProductStore::new());
    let orders = OrderService::new(InMemoryOrderStore::new(), catalog.clone(), tax_rate);
    let users = UserDirectory::new(InMemoryUserStore::new());

    Arc::new(AppState {
        catalog,
        orders,
        users,
    })
}

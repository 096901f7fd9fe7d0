use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::TokenIssuer;
use crate::clients::gemini::GeminiClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{RecommendationService, TextGenerator};

pub mod auth;
mod comments;
mod error;
mod observability;
mod types;
mod validation;
mod watchlist;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub tokens: TokenIssuer,

    pub recommendations: Arc<RecommendationService>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

#[must_use]
pub fn create_app_state(
    config: Config,
    store: Store,
    generator: Option<Arc<dyn TextGenerator>>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let tokens = TokenIssuer::new(&config.auth.jwt_secret, config.auth.token_ttl_days);
    let recommendations = Arc::new(RecommendationService::new(generator));

    Arc::new(AppState {
        config: Arc::new(config),
        store,
        tokens,
        recommendations,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let generator: Option<Arc<dyn TextGenerator>> = if config.gemini.api_key.is_empty() {
        info!("No Gemini API key configured; recommendations use the built-in catalog");
        None
    } else {
        Some(Arc::new(GeminiClient::from_config(&config.gemini)?))
    };

    Ok(create_app_state(config, store, generator, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    // Comment reads are public, so both verbs register here and `add_comment`
    // checks the bearer token itself.
    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/comments/{anime_id}",
            get(comments::list_comments).post(comments::add_comment),
        )
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/", get(liveness))
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

async fn liveness() -> &'static str {
    "Anime Watchlist API Running"
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/watchlist", get(watchlist::list_watchlist))
        .route("/watchlist", post(watchlist::add_entry))
        .route(
            "/watchlist/recommendations",
            get(watchlist::get_recommendations),
        )
        .route("/watchlist/{id}", put(watchlist::update_entry))
        .route("/watchlist/{id}", delete(watchlist::remove_entry))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::require_auth))
}

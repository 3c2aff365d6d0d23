pub mod pois;
pub mod search;
pub mod server;
pub mod users;

use axum::{
    http::{HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use poi_directory::config::CorsConfig;
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Handler failure. Clients only see the generic message; the source is logged.
/// 处理器错误，客户端只看到通用消息
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}: {source}")]
    Database {
        message: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl ApiError {
    /// For `map_err`: `.map_err(ApiError::database("Failed to fetch POIs"))`
    pub fn database(message: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| ApiError::Database { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        let message = match self {
            ApiError::Database { message, .. } => message,
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}

/// GET /api/* - 未匹配的API路由
async fn api_not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!("No API route for {}", uri);
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET])
            .allow_headers(Any)
    }
}

/// Build the application router / 构建应用路由
pub fn router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(server::health_check))
        .route("/pois", get(pois::list_pois))
        .route("/pois/filters", get(pois::filter_options))
        .route("/pois/autocomplete", get(search::autocomplete))
        .route("/users", get(users::list_users))
        .fallback(api_not_found);

    let mut app = Router::new().nest("/api", api_routes);

    // 单页应用：未知路径回退到 index.html，交给前端路由
    if let Some(dir) = state.config.get_static_dir() {
        tracing::info!("Serving frontend from {:?}", dir);
        let index = dir.join("index.html");
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    app.layer(cors_layer(&state.config.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use axum::{
    extract::{Query, State},
    Json,
};
use poi_directory::{
    models::{FilterOptions, PoiPage},
    poi::{self, PoiQuery},
};
use std::sync::Arc;

use super::ApiError;
use crate::state::AppState;

/// GET /api/pois - 分页筛选的POI列表
///
/// Query pairs are taken raw so filters may repeat (`city=A&city=B`).
pub async fn list_pois(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<PoiPage>, ApiError> {
    let query = PoiQuery::from_pairs(params);
    tracing::debug!("POI query: {:?}", query);

    let page = poi::list_pois(&state.db, &query)
        .await
        .map_err(ApiError::database("Failed to fetch POIs"))?;

    Ok(Json(page))
}

/// GET /api/pois/filters - 获取筛选选项（品牌、DMA、分类）
pub async fn filter_options(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilterOptions>, ApiError> {
    let options = poi::filter_options(&state.db)
        .await
        .map_err(ApiError::database("Failed to fetch filter options"))?;

    Ok(Json(options))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_pois_response_shape() {
        let (status, body) = get_json(app(seeded_pool().await), "/api/pois?limit=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["name"], "Best Buy Denver");
        assert_eq!(body["data"][0]["is_open"], true);
        assert_eq!(body["pagination"]["page"], 1);
        assert_eq!(body["pagination"]["limit"], 2);
        assert_eq!(body["pagination"]["total"], 3);
        assert_eq!(body["pagination"]["totalPages"], 2);
        assert_eq!(body["summary"]["totalVenues"], 3);
        assert_eq!(body["summary"]["totalFootTraffic"], 600);
    }

    #[tokio::test]
    async fn test_list_pois_filters_from_query_string() {
        let (status, body) = get_json(
            app(seeded_pool().await),
            "/api/pois?chain_name=Target&is_open=false&category=Department%20Stores",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["entity_id"], "e2");
        assert_eq!(data[0]["is_open"], false);
        assert_eq!(body["summary"]["totalFootTraffic"], 200);
    }

    #[tokio::test]
    async fn test_list_pois_repeated_keys() {
        let (_, body) = get_json(
            app(seeded_pool().await),
            "/api/pois?city%5B%5D=Austin&city%5B%5D=Denver&state=All",
        )
        .await;
        assert_eq!(body["pagination"]["total"], 2);
    }

    #[tokio::test]
    async fn test_list_pois_database_failure_is_500() {
        let pool = seeded_pool().await;
        let router = app(pool.clone());
        pool.close().await;

        let (status, body) = get_json(router, "/api/pois").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Failed to fetch POIs" }));
    }

    #[tokio::test]
    async fn test_filter_options() {
        let (status, body) = get_json(app(seeded_pool().await), "/api/pois/filters").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chains"], serde_json::json!(["Best Buy", "Target"]));
        assert_eq!(body["dmas"], serde_json::json!(["Austin", "Dallas", "Denver"]));
        assert_eq!(
            body["categories"],
            serde_json::json!(["Department Stores", "Electronics"])
        );
    }

    #[tokio::test]
    async fn test_filter_options_database_failure_is_500() {
        let pool = seeded_pool().await;
        let router = app(pool.clone());
        pool.close().await;

        let (status, body) = get_json(router, "/api/pois/filters").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Failed to fetch filter options" }));
    }
}

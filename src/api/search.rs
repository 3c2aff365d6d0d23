use axum::{
    extract::{Query, State},
    Json,
};
use poi_directory::search::{self, Suggestion};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default, alias = "query")]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct AutocompleteResponse {
    pub results: Vec<Suggestion>,
}

/// GET /api/pois/autocomplete?q= - 自动补全（名称、品牌、州、城市、地址）
pub async fn autocomplete(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AutocompleteQuery>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
    let results = search::autocomplete(&state.db, &params.q, &state.config.search)
        .await
        .map_err(ApiError::database("Failed to fetch autocomplete results"))?;

    Ok(Json(AutocompleteResponse { results }))
}

use axum::{extract::State, Json};
use poi_directory::models::User;
use std::sync::Arc;

use super::ApiError;
use crate::state::AppState;

/// GET /api/users - 获取用户列表（不含密码）
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = sqlx::query_as::<_, User>("SELECT id, username, password, role FROM users ORDER BY id")
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::database("Failed to fetch users"))?;

    Ok(Json(users))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_users_hides_passwords() {
        let (status, body) = get_json(app(seeded_pool().await), "/api/users").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                { "id": 1, "username": "admin", "role": "admin" },
                { "id": 2, "username": "viewer", "role": "user" }
            ])
        );
    }

    #[tokio::test]
    async fn test_list_users_empty() {
        let (status, body) = get_json(app(empty_pool().await), "/api/users").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}

use poi_directory::config::AppConfig;
use sqlx::SqlitePool;

/// Shared by every handler; requests never mutate it
pub struct AppState {
    pub db: SqlitePool,
    pub config: AppConfig,
}

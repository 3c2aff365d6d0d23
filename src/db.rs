use anyhow::Result;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::PoolConfig;

/// Open the connection pool with the configured sizing and timeouts / 创建数据库连接池
pub async fn connect(database_url: &str, pool: &PoolConfig) -> Result<SqlitePool> {
    let db = SqlitePoolOptions::new()
        .max_connections(pool.max_connections)
        .min_connections(pool.min_connections)
        .acquire_timeout(pool.acquire_timeout())
        .idle_timeout(pool.idle_timeout())
        .connect(database_url)
        .await?;

    tracing::info!(
        "Database pool ready (max={}, min={})",
        pool.max_connections,
        pool.min_connections
    );
    Ok(db)
}

/// Run database migrations / 运行数据库迁移
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pois (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entity_id TEXT NOT NULL UNIQUE,
            entity_type TEXT,
            name TEXT,
            foot_traffic INTEGER NOT NULL DEFAULT 0,
            sales REAL NOT NULL DEFAULT 0,
            avg_dwell_time_min REAL,
            area_sqft REAL,
            ft_per_sqft REAL,
            geolocation TEXT,
            country TEXT,
            state_code TEXT,
            state_name TEXT,
            city TEXT,
            postal_code TEXT,
            formatted_city TEXT,
            street_address TEXT,
            sub_category TEXT,
            dma TEXT,
            cbsa TEXT,
            chain_id TEXT,
            chain_name TEXT,
            store_id TEXT,
            date_opened DATE,
            date_closed DATE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            password TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user'
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 列表筛选和默认排序使用的列索引
    for (index, column) in [
        ("idx_pois_name", "name"),
        ("idx_pois_chain_name", "chain_name"),
        ("idx_pois_sub_category", "sub_category"),
        ("idx_pois_dma", "dma"),
        ("idx_pois_city", "city"),
        ("idx_pois_state_name", "state_name"),
        ("idx_pois_date_closed", "date_closed"),
    ] {
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS {} ON pois({})",
            index, column
        ))
        .execute(pool)
        .await?;
    }

    tracing::debug!("Database migrations applied");
    Ok(())
}

/// Check that the database answers / 检查数据库连接
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Single-connection in-memory database with the schema applied
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

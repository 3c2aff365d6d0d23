use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Point of interest row from the `pois` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Poi {
    pub id: i64,
    pub entity_id: String,
    pub entity_type: Option<String>,
    pub name: Option<String>,
    pub foot_traffic: i64,
    pub sales: f64,
    pub avg_dwell_time_min: Option<f64>,
    pub area_sqft: Option<f64>,
    pub ft_per_sqft: Option<f64>,
    pub geolocation: Option<String>,
    pub country: Option<String>,
    pub state_code: Option<String>,
    pub state_name: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub formatted_city: Option<String>,
    pub street_address: Option<String>,
    pub sub_category: Option<String>,
    pub dma: Option<String>,
    pub cbsa: Option<String>,
    pub chain_id: Option<String>,
    pub chain_name: Option<String>,
    pub store_id: Option<String>,
    pub date_opened: Option<NaiveDate>,
    pub date_closed: Option<NaiveDate>,
}

impl Poi {
    /// A venue is open until it has a closing date
    pub fn is_open(&self) -> bool {
        self.date_closed.is_none()
    }
}

/// POI as returned by the API, with the derived open status
#[derive(Debug, Clone, Serialize)]
pub struct PoiView {
    #[serde(flatten)]
    pub poi: Poi,
    pub is_open: bool,
}

impl From<Poi> for PoiView {
    fn from(poi: Poi) -> Self {
        let is_open = poi.is_open();
        Self { poi, is_open }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self { page, limit, total, total_pages }
    }
}

/// Aggregates over the whole filtered set, not just the current page
#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
pub struct Summary {
    #[serde(rename = "totalVenues")]
    pub total_venues: i64,
    #[serde(rename = "totalFootTraffic")]
    pub total_foot_traffic: i64,
}

/// One page of the POI listing
#[derive(Debug, Clone, Serialize)]
pub struct PoiPage {
    pub data: Vec<PoiView>,
    pub pagination: Pagination,
    pub summary: Summary,
}

/// Distinct values offered by the filter dropdowns
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterOptions {
    pub chains: Vec<String>,
    pub dmas: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
}

impl User {
    /// Check whether a user with this username exists
    pub async fn exists(pool: &sqlx::SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE username = ? LIMIT 1")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }
}

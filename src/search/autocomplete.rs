use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashSet;

use crate::config::SearchConfig;
use crate::utils::{contains_pattern, strip_street_number};

/// Address rows fetched per suggestion slot; many house numbers share one street
const ADDRESS_OVERFETCH: i64 = 10;

/// Column a suggestion was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestField {
    Name,
    ChainName,
    StateName,
    City,
    StreetAddress,
}

impl SuggestField {
    pub fn column(&self) -> &'static str {
        match self {
            SuggestField::Name => "name",
            SuggestField::ChainName => "chain_name",
            SuggestField::StateName => "state_name",
            SuggestField::City => "city",
            SuggestField::StreetAddress => "street_address",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SuggestField::Name => "Name",
            SuggestField::ChainName => "Chain",
            SuggestField::StateName => "State",
            SuggestField::City => "City",
            SuggestField::StreetAddress => "Address",
        }
    }
}

/// One autocomplete entry; `field` doubles as the listing filter key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub value: String,
    pub field: SuggestField,
    #[serde(rename = "fieldLabel")]
    pub field_label: &'static str,
}

impl Suggestion {
    pub fn new(value: String, field: SuggestField) -> Self {
        Self {
            value,
            field,
            field_label: field.label(),
        }
    }
}

/// Suggest column values containing `query`.
///
/// Queries shorter than `min_query_len` characters return nothing without
/// touching the database. Each column is searched independently and
/// concurrently, bounded by `per_field_limit`.
pub async fn autocomplete(
    pool: &SqlitePool,
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<Suggestion>, sqlx::Error> {
    let query = query.trim();
    if query.chars().count() < config.min_query_len {
        return Ok(Vec::new());
    }

    let pattern = contains_pattern(query);
    let limit = i64::from(config.per_field_limit);

    let (names, chains, states, cities, addresses) = tokio::try_join!(
        search_column(pool, SuggestField::Name, &pattern, limit),
        search_column(pool, SuggestField::ChainName, &pattern, limit),
        search_column(pool, SuggestField::StateName, &pattern, limit),
        search_column(pool, SuggestField::City, &pattern, limit),
        search_column(pool, SuggestField::StreetAddress, &pattern, limit.saturating_mul(ADDRESS_OVERFETCH)),
    )?;

    let groups = vec![
        (SuggestField::Name, names),
        (SuggestField::ChainName, chains),
        (SuggestField::StateName, states),
        (SuggestField::City, cities),
        (SuggestField::StreetAddress, strip_addresses(addresses, query, config.per_field_limit as usize)),
    ];

    let suggestions = merge_suggestions(groups, config.max_results);
    tracing::debug!("Autocomplete '{}' -> {} suggestions", query, suggestions.len());
    Ok(suggestions)
}

async fn search_column(
    pool: &SqlitePool,
    field: SuggestField,
    pattern: &str,
    limit: i64,
) -> Result<Vec<String>, sqlx::Error> {
    let sql = format!(
        "SELECT DISTINCT {col} FROM pois WHERE {col} LIKE ? ESCAPE '\\' ORDER BY {col} ASC LIMIT ?",
        col = field.column()
    );
    sqlx::query_scalar(&sql)
        .bind(pattern)
        .bind(limit)
        .fetch_all(pool)
        .await
}

/// Drop house numbers from address hits and keep those whose street still
/// contains the query ("12" matches "12 Oak St" in SQL but not "Oak St").
/// Streets are deduplicated before `limit` applies.
pub fn strip_addresses(addresses: Vec<String>, query: &str, limit: usize) -> Vec<String> {
    let needle = query.to_lowercase();
    let mut streets: Vec<String> = Vec::new();
    for street in addresses.iter().map(|a| strip_street_number(a)) {
        if streets.len() >= limit {
            break;
        }
        if street.to_lowercase().contains(&needle) && !streets.contains(&street) {
            streets.push(street);
        }
    }
    streets
}

/// Flatten per-column hits in order, dedupe by (value, field), cap at `max_results`
pub fn merge_suggestions(
    groups: Vec<(SuggestField, Vec<String>)>,
    max_results: usize,
) -> Vec<Suggestion> {
    let mut seen: HashSet<(String, SuggestField)> = HashSet::new();
    let mut merged = Vec::new();

    for (field, values) in groups {
        for value in values {
            if merged.len() >= max_results {
                return merged;
            }
            if seen.insert((value.clone(), field)) {
                merged.push(Suggestion::new(value, field));
            }
        }
    }
    merged
}

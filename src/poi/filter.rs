//! Listing query parsing and WHERE-clause composition
//!
//! Query parameters arrive as raw pairs so a key may repeat
//! (`city=Austin&city=Dallas` or `city[]=Austin&city[]=Dallas`).
//! Matching strategies per column:
//! - exact / set membership: chain_name, category, dma, city, state, state_code
//! - partial substring: name
//! - house-number-stripped substring: street_address
//! - open/closed: is_open

use sqlx::{QueryBuilder, Sqlite};

use crate::utils::{contains_pattern, parse_flag, strip_street_number};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Placeholder the UI sends for an unselected dropdown
const ALL_SENTINEL: &str = "All";

/// Parsed listing request: pagination plus filters
#[derive(Debug, Clone, PartialEq)]
pub struct PoiQuery {
    pub page: i64,
    pub limit: i64,
    pub filter: PoiFilter,
}

impl Default for PoiQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
            filter: PoiFilter::default(),
        }
    }
}

impl PoiQuery {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let key = key.as_ref();
            let key = key.strip_suffix("[]").unwrap_or(key);
            let value = value.as_ref();
            match key {
                "page" => {
                    query.page = value
                        .trim()
                        .parse::<i64>()
                        .ok()
                        .filter(|p| *p >= 1)
                        .unwrap_or(DEFAULT_PAGE);
                }
                "limit" => {
                    query.limit = value
                        .trim()
                        .parse::<i64>()
                        .ok()
                        .filter(|l| *l >= 1)
                        .map(|l| l.min(MAX_PAGE_SIZE))
                        .unwrap_or(DEFAULT_PAGE_SIZE);
                }
                _ => query.filter.apply(key, value),
            }
        }
        query
    }

    /// Saturates for huge pages, which then simply land past the last row
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Filters over the `pois` table. Empty vectors contribute no predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoiFilter {
    pub chain_name: Vec<String>,
    pub sub_category: Vec<String>,
    pub dma: Vec<String>,
    pub city: Vec<String>,
    pub state_name: Vec<String>,
    pub state_code: Vec<String>,
    pub name: Vec<String>,
    /// Stored already stripped of house numbers
    pub street_address: Vec<String>,
    pub is_open: Option<bool>,
}

impl PoiFilter {
    /// Apply one query parameter. Unknown keys and malformed values are ignored.
    pub fn apply(&mut self, key: &str, value: &str) {
        if key == "is_open" {
            if let Some(flag) = parse_flag(value) {
                self.is_open = Some(flag);
            }
            return;
        }

        let value = value.trim();
        if value.is_empty() || value == ALL_SENTINEL {
            return;
        }

        let (target, value) = match key {
            "chain_name" => (&mut self.chain_name, value.to_string()),
            "category" | "sub_category" => (&mut self.sub_category, value.to_string()),
            "dma" => (&mut self.dma, value.to_string()),
            "city" => (&mut self.city, value.to_string()),
            "state" | "state_name" => (&mut self.state_name, value.to_string()),
            "state_code" => (&mut self.state_code, value.to_string()),
            "name" => (&mut self.name, value.to_string()),
            "street_address" => (&mut self.street_address, strip_street_number(value)),
            _ => {
                tracing::debug!("Ignoring unknown POI filter: {}", key);
                return;
            }
        };

        if !target.contains(&value) {
            target.push(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chain_name.is_empty()
            && self.sub_category.is_empty()
            && self.dma.is_empty()
            && self.city.is_empty()
            && self.state_name.is_empty()
            && self.state_code.is_empty()
            && self.name.is_empty()
            && self.street_address.is_empty()
            && self.is_open.is_none()
    }

    /// Append ` WHERE ... AND ...` to the builder. All user text is bound, never inlined.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        let mut first = true;

        for (column, values) in [
            ("chain_name", &self.chain_name),
            ("sub_category", &self.sub_category),
            ("dma", &self.dma),
            ("city", &self.city),
            ("state_name", &self.state_name),
            ("state_code", &self.state_code),
        ] {
            if values.is_empty() {
                continue;
            }
            push_conjunction(qb, &mut first);
            push_membership(qb, column, values);
        }

        for (column, values) in [("name", &self.name), ("street_address", &self.street_address)] {
            if values.is_empty() {
                continue;
            }
            push_conjunction(qb, &mut first);
            push_contains_any(qb, column, values);
        }

        if let Some(is_open) = self.is_open {
            push_conjunction(qb, &mut first);
            qb.push(if is_open {
                "date_closed IS NULL"
            } else {
                "date_closed IS NOT NULL"
            });
        }
    }
}

fn push_conjunction(qb: &mut QueryBuilder<'_, Sqlite>, first: &mut bool) {
    qb.push(if *first { " WHERE " } else { " AND " });
    *first = false;
}

/// `col = ?` for one value, `col IN (?, ...)` for several
fn push_membership(qb: &mut QueryBuilder<'_, Sqlite>, column: &str, values: &[String]) {
    if let [value] = values {
        qb.push(column).push(" = ").push_bind(value.clone());
        return;
    }

    qb.push(column).push(" IN (");
    let mut separated = qb.separated(", ");
    for value in values {
        separated.push_bind(value.clone());
    }
    separated.push_unseparated(")");
}

/// `(col LIKE ? OR col LIKE ? ...)`, case-insensitive for ASCII in SQLite
fn push_contains_any(qb: &mut QueryBuilder<'_, Sqlite>, column: &str, values: &[String]) {
    qb.push("(");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(column)
            .push(" LIKE ")
            .push_bind(contains_pattern(value))
            .push(" ESCAPE '\\'");
    }
    qb.push(")");
}

//! POI listing and filter options over the `pois` table

pub mod filter;

pub use filter::{PoiFilter, PoiQuery};

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::{FilterOptions, Pagination, Poi, PoiPage, PoiView, Summary};

/// Fetch one page of POIs ordered by name, with totals over the whole filtered set
pub async fn list_pois(pool: &SqlitePool, query: &PoiQuery) -> Result<PoiPage, sqlx::Error> {
    let mut rows_qb = QueryBuilder::<Sqlite>::new("SELECT * FROM pois");
    query.filter.push_where(&mut rows_qb);
    rows_qb
        .push(" ORDER BY name ASC, id ASC LIMIT ")
        .push_bind(query.limit)
        .push(" OFFSET ")
        .push_bind(query.offset());

    let mut summary_qb = QueryBuilder::<Sqlite>::new(
        "SELECT COUNT(*) AS total_venues, COALESCE(SUM(foot_traffic), 0) AS total_foot_traffic FROM pois",
    );
    query.filter.push_where(&mut summary_qb);

    let (rows, summary) = tokio::try_join!(
        rows_qb.build_query_as::<Poi>().fetch_all(pool),
        summary_qb.build_query_as::<Summary>().fetch_one(pool),
    )?;

    tracing::debug!(
        "Listed {} POIs (page {}, {} matching)",
        rows.len(),
        query.page,
        summary.total_venues
    );

    Ok(PoiPage {
        data: rows.into_iter().map(PoiView::from).collect(),
        pagination: Pagination::new(query.page, query.limit, summary.total_venues),
        summary,
    })
}

/// Distinct chains, DMAs and categories for the filter dropdowns
pub async fn filter_options(pool: &SqlitePool) -> Result<FilterOptions, sqlx::Error> {
    let (chains, dmas, categories) = tokio::try_join!(
        distinct_values(pool, "chain_name"),
        distinct_values(pool, "dma"),
        distinct_values(pool, "sub_category"),
    )?;

    Ok(FilterOptions {
        chains,
        dmas,
        categories,
    })
}

async fn distinct_values(pool: &SqlitePool, column: &'static str) -> Result<Vec<String>, sqlx::Error> {
    let sql = format!(
        "SELECT DISTINCT {col} FROM pois WHERE {col} IS NOT NULL AND {col} != '' ORDER BY {col} ASC",
        col = column
    );
    sqlx::query_scalar(&sql).fetch_all(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{fixtures, test_pool};

    async fn seeded() -> SqlitePool {
        let pool = test_pool().await;
        fixtures::seed(&pool).await;
        pool
    }

    fn names(page: &PoiPage) -> Vec<Option<String>> {
        page.data.iter().map(|p| p.poi.name.clone()).collect()
    }

    #[tokio::test]
    async fn test_unfiltered_listing_orders_by_name() {
        let pool = seeded().await;
        let page = list_pois(&pool, &PoiQuery::default()).await.unwrap();

        assert_eq!(page.pagination.total, 5);
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(page.summary.total_venues, 5);
        assert_eq!(page.summary.total_foot_traffic, 6400);
        // NULL names sort first in SQLite
        assert_eq!(
            names(&page),
            vec![
                None,
                Some("Best Buy Denver".to_string()),
                Some("Target Austin North".to_string()),
                Some("Target Dallas".to_string()),
                Some("Walmart Supercenter".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_summary_covers_full_filtered_set_not_page() {
        let pool = seeded().await;
        let query = PoiQuery::from_pairs([("state_code", "TX"), ("limit", "1"), ("page", "2")]);
        let page = list_pois(&pool, &query).await.unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].poi.name.as_deref(), Some("Target Dallas"));
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.summary.total_foot_traffic, 6000);
    }

    #[tokio::test]
    async fn test_membership_and_open_filters() {
        let pool = seeded().await;
        let query = PoiQuery::from_pairs([("chain_name", "Target"), ("chain_name", "Walmart"), ("is_open", "true")]);
        let page = list_pois(&pool, &query).await.unwrap();
        assert_eq!(
            names(&page),
            vec![
                Some("Target Austin North".to_string()),
                Some("Walmart Supercenter".to_string()),
            ]
        );
        assert!(page.data.iter().all(|p| p.is_open));

        let query = PoiQuery::from_pairs([("is_open", "false")]);
        let page = list_pois(&pool, &query).await.unwrap();
        assert_eq!(names(&page), vec![Some("Target Dallas".to_string())]);
        assert!(!page.data[0].is_open);
    }

    #[tokio::test]
    async fn test_name_and_address_substring_filters() {
        let pool = seeded().await;
        let query = PoiQuery::from_pairs([("name", "target")]);
        let page = list_pois(&pool, &query).await.unwrap();
        assert_eq!(page.pagination.total, 2);

        // house number differs from both rows but the street matches
        let query = PoiQuery::from_pairs([("street_address", "999 Main St")]);
        let page = list_pois(&pool, &query).await.unwrap();
        assert_eq!(page.pagination.total, 2);

        let query = PoiQuery::from_pairs([("street_address", "Oak"), ("street_address", "Maple")]);
        let page = list_pois(&pool, &query).await.unwrap();
        assert_eq!(page.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_like_wildcards_are_literal() {
        let pool = seeded().await;
        let query = PoiQuery::from_pairs([("name", "%")]);
        let page = list_pois(&pool, &query).await.unwrap();
        assert_eq!(page.pagination.total, 0);
    }

    #[tokio::test]
    async fn test_empty_result_and_page_past_end() {
        let pool = seeded().await;
        let query = PoiQuery::from_pairs([("dma", "Nowhere")]);
        let page = list_pois(&pool, &query).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 0);
        assert_eq!(page.pagination.total_pages, 0);
        assert_eq!(page.summary.total_foot_traffic, 0);

        let query = PoiQuery::from_pairs([("page", "9")]);
        let page = list_pois(&pool, &query).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 5);
    }

    #[tokio::test]
    async fn test_huge_page_number_returns_empty_page() {
        let pool = seeded().await;
        let query = PoiQuery::from_pairs([("page", "9223372036854775807"), ("limit", "100")]);
        let page = list_pois(&pool, &query).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.page, i64::MAX);
        assert_eq!(page.pagination.total, 5);
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(page.summary.total_foot_traffic, 6400);
    }

    #[tokio::test]
    async fn test_filter_options_distinct_sorted_non_empty() {
        let pool = seeded().await;
        let options = filter_options(&pool).await.unwrap();
        assert_eq!(options.chains, vec!["Best Buy", "Target", "Walmart"]);
        assert_eq!(options.dmas, vec!["Austin", "Dallas-Ft. Worth", "Denver"]);
        assert_eq!(
            options.categories,
            vec!["Department Stores", "Electronics", "Warehouse Clubs"]
        );
    }
}

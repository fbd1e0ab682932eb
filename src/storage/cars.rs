//! Dynamic listing query for `GET /api/cars`: search, filters, sort, and
//! pagination over available cars. Everything user-supplied is bound, never
//! spliced into the SQL text.

use anyhow::Result;
use sqlx::QueryBuilder;

use super::Storage;
use crate::cars::{CarFilter, CarSort, CarWithSeller, MAX_PAGE_SIZE};

impl Storage {
    /// Page through available cars matching `filter`, returning the rows and
    /// the total match count. `page` is 1-based; out-of-range pages yield an
    /// empty list with the correct total.
    pub async fn list_cars(
        &self,
        filter: &CarFilter,
        sort: CarSort,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<CarWithSeller>, i64)> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        // Saturate rather than overflow on absurd page numbers.
        let offset = (page - 1).saturating_mul(limit);

        let mut qb = QueryBuilder::new(
            "SELECT cars.*, users.name AS seller_name, users.email AS seller_email
               FROM cars JOIN users ON users.id = cars.seller_id
              WHERE cars.status = 'available'",
        );
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY ")
            .push(sort.order_clause())
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows: Vec<CarWithSeller> = qb.build_query_as().fetch_all(&self.pool).await?;

        let mut count_qb =
            QueryBuilder::new("SELECT COUNT(*) FROM cars WHERE cars.status = 'available'");
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, sqlx::Sqlite>, filter: &CarFilter) {
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        // SQLite LIKE is case-insensitive for ASCII, matching the original
        // API's case-insensitive regex search.
        let pat = format!("%{search}%");
        qb.push(" AND (cars.title LIKE ")
            .push_bind(pat.clone())
            .push(" OR cars.brand LIKE ")
            .push_bind(pat.clone())
            .push(" OR cars.model LIKE ")
            .push_bind(pat.clone())
            .push(" OR cars.description LIKE ")
            .push_bind(pat)
            .push(")");
    }
    if let Some(brand) = filter.brand.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND cars.brand LIKE ")
            .push_bind(format!("%{brand}%"));
    }
    if let Some(min_year) = filter.min_year {
        qb.push(" AND cars.year >= ").push_bind(min_year);
    }
    if let Some(max_year) = filter.max_year {
        qb.push(" AND cars.year <= ").push_bind(max_year);
    }
    if let Some(min_price) = filter.min_price {
        qb.push(" AND cars.price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        qb.push(" AND cars.price <= ").push_bind(max_price);
    }
}

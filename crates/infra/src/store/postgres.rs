//! Postgres-backed product store.
//!
//! Each product is kept whole as `jsonb` in `document`; the columns used by
//! filters and orderings are denormalized next to it and rewritten on every
//! insert/replace.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / Other | N/A | `Backend` |
//!
//! Text search uses `ILIKE` with `%`, `_` and `\` escaped, so the term stays
//! a literal substring. Postgres case folding can differ from Rust's Unicode
//! lowercasing for a handful of characters.

use std::sync::Arc;

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use plantify_core::ProductId;
use plantify_products::{PageRequest, Product, ProductFilter, SortKey};

use super::{ProductStore, StoreError, StoreResult};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id                UUID PRIMARY KEY,
        sku               TEXT NOT NULL,
        name              TEXT NOT NULL,
        description       TEXT NOT NULL,
        short_description TEXT,
        category          TEXT NOT NULL,
        tags              TEXT[] NOT NULL DEFAULT '{}',
        price             DOUBLE PRECISION NOT NULL,
        rating_average    DOUBLE PRECISION NOT NULL,
        rating_count      BIGINT NOT NULL,
        is_active         BOOLEAN NOT NULL,
        created_at        TIMESTAMPTZ NOT NULL,
        document          JSONB NOT NULL
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS products_sku_key ON products (sku)",
    "CREATE INDEX IF NOT EXISTS products_active_category_price_idx ON products (is_active, category, price)",
    "CREATE INDEX IF NOT EXISTS products_created_at_idx ON products (created_at DESC)",
];

/// Base filter: `$1` category, `$2` min price, `$3` max price, `$4` ILIKE pattern.
const FILTER_SQL: &str = r#"
    WHERE is_active
        AND ($1::text IS NULL OR category = $1)
        AND ($2::float8 IS NULL OR price >= $2)
        AND ($3::float8 IS NULL OR price <= $3)
        AND ($4::text IS NULL
            OR name ILIKE $4
            OR description ILIKE $4
            OR short_description ILIKE $4
            OR category ILIKE $4
            OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $4))
"#;

#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect a small pool to `database_url`.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the products table and its indexes if missing.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        Ok(())
    }
}

/// Bind values for [`FILTER_SQL`].
struct FilterParams {
    category: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    pattern: Option<String>,
}

impl From<&ProductFilter> for FilterParams {
    fn from(filter: &ProductFilter) -> Self {
        Self {
            category: filter.category.clone(),
            min_price: filter.price_range.and_then(|r| r.min),
            max_price: filter.price_range.and_then(|r| r.max),
            pattern: filter.search.as_ref().map(|t| like_pattern(t.as_str())),
        }
    }
}

/// `%term%` with LIKE metacharacters escaped.
fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn order_sql(sort: SortKey) -> &'static str {
    match sort {
        SortKey::PriceLow => "ORDER BY price ASC, id ASC",
        SortKey::PriceHigh => "ORDER BY price DESC, id ASC",
        SortKey::Rating => "ORDER BY rating_average DESC, id ASC",
        SortKey::Newest => "ORDER BY created_at DESC, id ASC",
        SortKey::Popular => "ORDER BY rating_count DESC, id ASC",
    }
}

fn decode_document(row: &PgRow) -> StoreResult<Product> {
    row.try_get::<Json<Product>, _>("document")
        .map(|doc| doc.0)
        .map_err(|e| StoreError::Backend(format!("failed to decode product document: {e}")))
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait::async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, filter), fields(sort = ?sort, page = page.page, limit = page.limit), err)]
    async fn find(
        &self,
        filter: &ProductFilter,
        sort: SortKey,
        page: PageRequest,
    ) -> StoreResult<Vec<Product>> {
        let params = FilterParams::from(filter);
        let sql = format!(
            "SELECT document FROM products {FILTER_SQL} {} LIMIT $5 OFFSET $6",
            order_sql(sort)
        );

        let rows = sqlx::query(&sql)
            .bind(params.category)
            .bind(params.min_price)
            .bind(params.max_price)
            .bind(params.pattern)
            .bind(to_i64(page.limit))
            .bind(to_i64(page.skip()))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find", e))?;

        rows.iter().map(decode_document).collect()
    }

    #[instrument(skip(self, filter), err)]
    async fn count(&self, filter: &ProductFilter) -> StoreResult<u64> {
        let params = FilterParams::from(filter);
        let sql = format!("SELECT COUNT(*) AS total FROM products {FILTER_SQL}");

        let row = sqlx::query(&sql)
            .bind(params.category)
            .bind(params.min_price)
            .bind(params.max_price)
            .bind(params.pattern)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count", e))?;

        let total: i64 = row
            .try_get("total")
            .map_err(|e| StoreError::Backend(format!("failed to read count: {e}")))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    #[instrument(skip(self, filter), err)]
    async fn candidates(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let params = FilterParams::from(filter);
        let sql = format!("SELECT document FROM products {FILTER_SQL}");

        let rows = sqlx::query(&sql)
            .bind(params.category)
            .bind(params.min_price)
            .bind(params.max_price)
            .bind(params.pattern)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("candidates", e))?;

        rows.iter().map(decode_document).collect()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query("SELECT document FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref().map(decode_document).transpose()
    }

    #[instrument(skip(self, product), fields(product_id = %product.summary.id), err)]
    async fn insert(&self, product: Product) -> StoreResult<()> {
        let p = &product.summary;
        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name, description, short_description, category, tags,
                price, rating_average, rating_count, is_active, created_at, document
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(p.id.as_uuid())
        .bind(&p.sku)
        .bind(&p.name)
        .bind(&p.description)
        .bind(&p.short_description)
        .bind(p.category.label())
        .bind(&p.tags)
        .bind(p.price)
        .bind(p.rating.average)
        .bind(i64::from(p.rating.count))
        .bind(p.is_active)
        .bind(p.created_at)
        .bind(Json(&product))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        Ok(())
    }

    #[instrument(skip(self, product), fields(product_id = %product.summary.id), err)]
    async fn replace(&self, product: Product) -> StoreResult<()> {
        let p = &product.summary;
        let result = sqlx::query(
            r#"
            UPDATE products SET
                sku = $2,
                name = $3,
                description = $4,
                short_description = $5,
                category = $6,
                tags = $7,
                price = $8,
                rating_average = $9,
                rating_count = $10,
                is_active = $11,
                created_at = $12,
                document = $13
            WHERE id = $1
            "#,
        )
        .bind(p.id.as_uuid())
        .bind(&p.sku)
        .bind(&p.name)
        .bind(&p.description)
        .bind(&p.short_description)
        .bind(p.category.label())
        .bind(&p.tags)
        .bind(p.price)
        .bind(p.rating.average)
        .bind(i64::from(p.rating.count))
        .bind(p.is_active)
        .bind(p.created_at)
        .bind(Json(&product))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("replace", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}

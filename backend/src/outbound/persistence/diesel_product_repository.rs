//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{Product, ProductFilter, ProductId, ProductStatus, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewProductRow, ProductChangeset, ProductRow};
use super::pool::{DbPool, PoolError};
use super::schema::products;

/// Diesel-backed implementation of the `ProductRepository` port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ProductRepositoryError {
    map_pool_error(error, ProductRepositoryError::connection)
}

fn diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> ProductRepositoryError {
    move |error| {
        map_diesel_error(
            error,
            operation,
            ProductRepositoryError::query,
            ProductRepositoryError::connection,
        )
    }
}

fn row_to_product(row: ProductRow) -> Result<Product, ProductRepositoryError> {
    Product::try_from(row)
        .map_err(|error| ProductRepositoryError::query(format!("stored product: {error}")))
}

fn rows_to_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, ProductRepositoryError> {
    rows.into_iter().map(row_to_product).collect()
}

/// Escape `ILIKE` metacharacters so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(products::table)
            .values(NewProductRow::from(product))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error("insert product"))
    }

    async fn find_by_id(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ProductRow> = products::table
            .filter(products::id.eq(product_id.as_uuid()))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("find product"))?;
        row.map(row_to_product).transpose()
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
        status: Option<ProductStatus>,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = products::table
            .filter(products::owner_id.eq(owner_id.as_uuid()))
            .select(ProductRow::as_select())
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(products::status.eq(status.as_str()));
        }
        let rows = query
            .order((products::created_at.desc(), products::id.asc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error("list products by owner"))?;
        rows_to_products(rows)
    }

    async fn find_matching(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = products::table
            .filter(products::owner_id.eq(filter.owner_id.as_uuid()))
            .select(ProductRow::as_select())
            .into_boxed();
        if let Some(term) = &filter.name_contains {
            query = query.filter(products::name.ilike(like_pattern(term)));
        }
        if !filter.categories.is_empty() {
            query = query.filter(products::categories.overlaps_with(filter.categories.clone()));
        }
        if let Some((min, upper)) = filter.price_between {
            query = query.filter(products::price.ge(min).and(products::price.lt(upper)));
        }
        let rows = query
            .order((products::created_at.asc(), products::id.asc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error("find matching products"))?;
        rows_to_products(rows)
    }

    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(products::table.filter(products::id.eq(product.id.as_uuid())))
            .set(ProductChangeset::from(product))
            .execute(&mut conn)
            .await
            .map_err(diesel_error("update product"))?;
        Ok(updated > 0)
    }

    async fn delete(&self, product_id: &ProductId) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(products::table.filter(products::id.eq(product_id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error("delete product"))?;
        Ok(deleted > 0)
    }
}

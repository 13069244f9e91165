use crate::models::{NewProduct, Product};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use sqlx::SqliteConnection;
use tracing::{info, instrument};
use validator::Validate;

/// Product queries over a single borrowed connection.
///
/// The repository never owns the connection; whoever checked it out decides
/// when it goes back to the pool.
pub struct ProductRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ProductRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Exact-match lookup by barcode. A miss is `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn get_product(&mut self, barcode: &str) -> Result<Option<Product>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_product"])
            .start_timer();

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT barcode, name, price
            FROM products
            WHERE barcode = ?
            "#,
        )
        .bind(barcode)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get product: {}", e)))?;

        timer.observe_duration();

        Ok(product)
    }

    /// Insert a new product and return the stored row.
    ///
    /// A barcode that is already present is a hard failure.
    #[instrument(skip(self, input), fields(barcode = %input.barcode))]
    pub async fn add_product(&mut self, input: &NewProduct) -> Result<Product, AppError> {
        input.validate()?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["add_product"])
            .start_timer();

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (barcode, name, price)
            VALUES (?, ?, ?)
            RETURNING barcode, name, price
            "#,
        )
        .bind(&input.barcode)
        .bind(&input.name)
        .bind(input.price)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::DatabaseError(anyhow::anyhow!(
                    "Product with barcode '{}' already exists",
                    input.barcode
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to add product: {}", e)),
        })?;

        timer.observe_duration();

        info!(barcode = %product.barcode, name = %product.name, "Product added");

        Ok(product)
    }

    /// Insert unless the barcode exists. Returns whether a row was written.
    pub async fn insert_if_absent(&mut self, input: &NewProduct) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (barcode, name, price)
            VALUES (?, ?, ?)
            ON CONFLICT (barcode) DO NOTHING
            "#,
        )
        .bind(&input.barcode)
        .bind(&input.name)
        .bind(input.price)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to seed product: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::{Connection, Executor};

    async fn connection() -> SqliteConnection {
        let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();
        conn.execute(include_str!(
            "../../migrations/20240101000000_create_products.sql"
        ))
        .await
        .unwrap();
        conn
    }

    #[tokio::test]
    async fn missing_barcode_is_none() {
        let mut conn = connection().await;
        let mut repository = ProductRepository::new(&mut conn);

        assert_eq!(repository.get_product("000").await.unwrap(), None);
    }

    #[tokio::test]
    async fn added_product_can_be_found() {
        let mut conn = connection().await;
        let mut repository = ProductRepository::new(&mut conn);

        let stored = repository
            .add_product(&NewProduct::new("123", "Milk", 45.5))
            .await
            .unwrap();
        assert_eq!(stored.price, 45.5);

        let found = repository.get_product("123").await.unwrap();
        assert_eq!(found, Some(stored));
    }

    #[tokio::test]
    async fn duplicate_barcode_fails() {
        let mut conn = connection().await;
        let mut repository = ProductRepository::new(&mut conn);

        repository
            .add_product(&NewProduct::new("123", "Milk", 45.5))
            .await
            .unwrap();
        let err = repository
            .add_product(&NewProduct::new("123", "Oat Milk", 60.0))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DatabaseError(_)));
        // The first row is untouched.
        let found = repository.get_product("123").await.unwrap().unwrap();
        assert_eq!(found.name, "Milk");
    }

    #[tokio::test]
    async fn insert_if_absent_reports_conflicts() {
        let mut conn = connection().await;
        let mut repository = ProductRepository::new(&mut conn);
        let bread = NewProduct::new("5678901234567", "Bread", 2.5);

        assert!(repository.insert_if_absent(&bread).await.unwrap());
        assert!(!repository.insert_if_absent(&bread).await.unwrap());
    }
}

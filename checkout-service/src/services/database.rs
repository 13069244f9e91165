//! Database service for checkout-service.

use crate::config::DatabaseConfig;
use crate::models::NewProduct;
use crate::services::repository::ProductRepository;
use service_core::error::AppError;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};
use validator::Validate;

/// Connection pool handle, built once at startup and passed down through
/// application state.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the connection pool described by `config`.
    ///
    /// Connections are never recycled on idle or age: an in-memory database
    /// lives exactly as long as its connection.
    #[instrument(skip(config), fields(service = "checkout-service"))]
    pub async fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to SQLite"
        );

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid DATABASE_URL: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("SQLite connection pool established");

        Ok(Self { pool })
    }

    /// Check out one connection. It goes back to the pool when dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, AppError> {
        self.pool.acquire().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to acquire connection: {}", e))
        })
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Load a starting catalogue. Barcodes already present are left as they
    /// are. Returns the number of rows inserted.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn seed_products(&self, products: &[NewProduct]) -> Result<u64, AppError> {
        for product in products {
            product.validate()?;
        }

        let mut conn = self.acquire().await?;
        let mut repository = ProductRepository::new(&mut conn);

        let mut inserted = 0;
        for product in products {
            if repository.insert_if_absent(product).await? {
                inserted += 1;
            }
        }

        info!(
            inserted = inserted,
            skipped = products.len() as u64 - inserted,
            "Product catalogue seeded"
        );

        Ok(inserted)
    }

    /// Close every connection in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

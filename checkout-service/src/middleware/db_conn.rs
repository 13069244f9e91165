//! Request-scoped database connection.
//!
//! Handlers that touch storage take a `DbConn` argument. The connection is
//! checked out of the pool before the handler runs and returned when the
//! extractor is dropped at the end of the request, whether the handler
//! succeeded or failed.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use service_core::error::AppError;
use sqlx::pool::PoolConnection;
use sqlx::Sqlite;

use crate::services::{Database, ProductRepository};

pub struct DbConn(pub PoolConnection<Sqlite>);

impl DbConn {
    /// Product queries over this request's connection.
    pub fn products(&mut self) -> ProductRepository<'_> {
        ProductRepository::new(&mut self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for DbConn
where
    Database: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let db = Database::from_ref(state);
        let conn = db.acquire().await?;
        tracing::trace!("Database connection acquired for request");
        Ok(DbConn(conn))
    }
}

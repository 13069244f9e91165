use axum::{extract::Path, Json};
use service_core::error::AppError;

use crate::{dtos::ScanResponse, middleware::DbConn, services::metrics::record_scan};

/// Look up a scanned barcode.
pub async fn scan_item(
    Path(barcode): Path<String>,
    mut conn: DbConn,
) -> Result<Json<ScanResponse>, AppError> {
    match conn.products().get_product(&barcode).await? {
        Some(product) => {
            record_scan("hit");
            tracing::info!(barcode = %barcode, name = %product.name, "Item scanned");
            Ok(Json(product.into()))
        }
        None => {
            record_scan("miss");
            tracing::info!(barcode = %barcode, "Scanned barcode not in catalogue");
            Err(AppError::NotFound(anyhow::anyhow!("Item not found")))
        }
    }
}

//! Starting catalogue loaded from a JSON file.

use crate::models::NewProduct;
use service_core::error::AppError;
use std::path::Path;

/// Read a JSON array of `{barcode, name, price}` objects.
pub async fn load_seed_file(path: &Path) -> Result<Vec<NewProduct>, AppError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "Failed to read seed file {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&raw).map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "Invalid seed file {}: {}",
            path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bundled_catalogue_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("seed/products.json");
        let products = load_seed_file(&path).await.unwrap();

        assert_eq!(products.len(), 10);
        assert_eq!(products[0].name, "Apple");
    }

    #[tokio::test]
    async fn missing_file_is_config_error() {
        let err = load_seed_file(Path::new("/nonexistent/products.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}

//! Product catalogue model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A product row, keyed by its barcode.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub barcode: String,
    pub name: String,
    pub price: f64,
}

/// Input for inserting a product into the catalogue.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 20, message = "Barcode must be 1-20 characters"))]
    pub barcode: String,
    #[validate(length(min = 1, max = 100, message = "Product name must be 1-100 characters"))]
    pub name: String,
    #[validate(range(min = 0.0, max = 10000.0, message = "Price must be between 0 and 10000"))]
    pub price: f64,
}

impl NewProduct {
    pub fn new(barcode: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            barcode: barcode.into(),
            name: name.into(),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_barcodes_are_accepted() {
        assert!(NewProduct::new("123", "Milk", 45.5).validate().is_ok());
    }

    #[test]
    fn rejects_empty_name_and_negative_price() {
        let errors = NewProduct::new("4567890123456", "", -1.0)
            .validate()
            .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(!fields.contains_key("barcode"));
    }

    #[test]
    fn rejects_overlong_barcode() {
        let product = NewProduct::new("1".repeat(21), "Bread", 2.5);
        assert!(product.validate().is_err());
    }
}

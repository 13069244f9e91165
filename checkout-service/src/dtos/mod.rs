//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Product;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Result of a barcode scan.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub name: String,
    pub price: f64,
    pub barcode: String,
}

impl From<Product> for ScanResponse {
    fn from(p: Product) -> Self {
        Self {
            name: p.name,
            price: p.price,
            barcode: p.barcode,
        }
    }
}

/// Request to create a new payment order.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    /// Amount in major currency units (rupees for INR).
    #[validate(range(min = 0.01, message = "Amount must be at least 0.01"))]
    pub amount: f64,
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
    /// Empty receipts are accepted and left out of the gateway request.
    #[validate(length(max = 40, message = "Receipt must be at most 40 characters"))]
    pub receipt: Option<String>,
    pub notes: Option<serde_json::Map<String, serde_json::Value>>,
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Response after creating an order, consumed by the checkout widget.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
    pub key: String,
}

/// Values returned by the checkout widget after the customer pays.
///
/// Not field-validated: empty values simply fail the signature check.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_defaults_to_inr() {
        let request: CreateOrderRequest = serde_json::from_str(r#"{"amount": 10.0}"#).unwrap();
        assert_eq!(request.currency, "INR");
        assert!(request.receipt.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn rejects_zero_amount() {
        let request: CreateOrderRequest = serde_json::from_str(r#"{"amount": 0}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn accepts_empty_receipt() {
        let request: CreateOrderRequest =
            serde_json::from_str(r#"{"amount": 10.0, "receipt": ""}"#).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn rejects_long_receipt() {
        let request: CreateOrderRequest = serde_json::from_value(serde_json::json!({
            "amount": 10.0,
            "receipt": "r".repeat(41)
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn order_response_uses_camel_case() {
        let body = serde_json::to_value(CreateOrderResponse {
            order_id: "order_1".to_string(),
            amount: 10.0,
            currency: "INR".to_string(),
            key: "rzp_test".to_string(),
        })
        .unwrap();
        assert_eq!(body["orderId"], "order_1");
        assert_eq!(body["key"], "rzp_test");
    }
}

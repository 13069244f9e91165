//! Razorpay payment gateway client.
//!
//! Implements Razorpay's Orders API for payment initiation and the
//! checkout signature check for payment confirmation.

use crate::config::RazorpayConfig;
use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Everything that can go wrong talking to the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Razorpay request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Razorpay error: {code} - {description}")]
    Rejected { code: String, description: String },

    #[error("Unexpected Razorpay response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Payment signature mismatch")]
    InvalidSignature,

    #[error("Invalid signing key")]
    InvalidKey,
}

/// Razorpay client for interacting with the Razorpay API.
#[derive(Clone)]
pub struct RazorpayClient {
    client: Client,
    config: RazorpayConfig,
}

/// Body of `POST /orders`.
#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    /// Amount in smallest currency unit (paise for INR).
    amount: u64,
    currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a serde_json::Map<String, serde_json::Value>>,
}

/// Order entity returned by Razorpay.
#[derive(Debug, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    /// Amount in smallest currency unit.
    pub amount: u64,
    pub currency: String,
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: String,
}

/// Razorpay API error response.
#[derive(Debug, Deserialize)]
struct RazorpayErrorBody {
    error: RazorpayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorDetail {
    code: String,
    description: String,
}

/// An order ready to hand to the client-side checkout widget.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedOrder {
    pub order_id: String,
    /// Amount in major currency units.
    pub amount: f64,
    pub currency: String,
    /// Public key id the widget is initialised with.
    pub key: String,
}

/// Payment verification parameters.
#[derive(Debug)]
pub struct PaymentVerification {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Major units to the gateway's integer smallest unit, truncating.
pub fn to_smallest_unit(amount: f64) -> u64 {
    (amount * 100.0) as u64
}

/// Gateway smallest unit back to major units.
pub fn from_smallest_unit(amount: u64) -> f64 {
    amount as f64 / 100.0
}

impl RazorpayClient {
    /// Create a new Razorpay client.
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Public key id, safe to expose to browsers.
    pub fn key_id(&self) -> &str {
        &self.config.key_id
    }

    /// Create a new order in Razorpay.
    ///
    /// `amount` is in major units (rupees); the gateway receives paise.
    pub async fn create_order(
        &self,
        amount: f64,
        currency: &str,
        receipt: Option<&str>,
        notes: Option<&serde_json::Map<String, serde_json::Value>>,
    ) -> Result<CreatedOrder, GatewayError> {
        let body = CreateOrderBody {
            amount: to_smallest_unit(amount),
            currency,
            receipt,
            notes,
        };

        let url = format!("{}/orders", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(status = %status, body = %text, "Razorpay create_order response");

        if !status.is_success() {
            let error: RazorpayErrorBody =
                serde_json::from_str(&text).unwrap_or_else(|_| RazorpayErrorBody {
                    error: RazorpayErrorDetail {
                        code: status.to_string(),
                        description: text.clone(),
                    },
                });
            tracing::error!(
                code = %error.error.code,
                description = %error.error.description,
                "Razorpay order creation failed"
            );
            return Err(GatewayError::Rejected {
                code: error.error.code,
                description: error.error.description,
            });
        }

        let order: RazorpayOrder = serde_json::from_str(&text)?;
        tracing::info!(
            order_id = %order.id,
            amount = order.amount,
            currency = %order.currency,
            "Razorpay order created"
        );

        Ok(CreatedOrder {
            order_id: order.id,
            amount: from_smallest_unit(order.amount),
            currency: order.currency,
            key: self.key_id().to_string(),
        })
    }

    /// Verify the signature returned by Razorpay checkout.
    ///
    /// The signature is `hex(HMAC-SHA256(order_id + "|" + payment_id, key_secret))`.
    pub fn verify_payment(&self, verification: &PaymentVerification) -> Result<(), GatewayError> {
        let payload = format!(
            "{}|{}",
            verification.razorpay_order_id, verification.razorpay_payment_id
        );

        let result = hex::decode(&verification.razorpay_signature)
            .map_err(|_| GatewayError::InvalidSignature)
            .and_then(|signature| {
                let mut mac = self.mac()?;
                mac.update(payload.as_bytes());
                mac.verify_slice(&signature)
                    .map_err(|_| GatewayError::InvalidSignature)
            });

        match &result {
            Ok(()) => tracing::info!(
                order_id = %verification.razorpay_order_id,
                payment_id = %verification.razorpay_payment_id,
                "Payment signature verified successfully"
            ),
            Err(e) => tracing::warn!(
                order_id = %verification.razorpay_order_id,
                payment_id = %verification.razorpay_payment_id,
                error = %e,
                "Payment signature verification failed"
            ),
        }

        result
    }

    /// Compute the signature Razorpay would send for this order/payment pair.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> Result<String, GatewayError> {
        let mut mac = self.mac()?;
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn mac(&self) -> Result<HmacSha256, GatewayError> {
        HmacSha256::new_from_slice(self.config.key_secret.expose_secret().as_bytes())
            .map_err(|_| GatewayError::InvalidKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn test_config() -> RazorpayConfig {
        RazorpayConfig {
            key_id: "rzp_test_123".to_string(),
            key_secret: Secret::new("my_secret_key".to_string()),
            api_base_url: "https://api.razorpay.com/v1".to_string(),
        }
    }

    fn verification(signature: String) -> PaymentVerification {
        PaymentVerification {
            razorpay_order_id: "order_123".to_string(),
            razorpay_payment_id: "pay_456".to_string(),
            razorpay_signature: signature,
        }
    }

    #[test]
    fn smallest_unit_conversion_truncates() {
        assert_eq!(to_smallest_unit(10.0), 1000);
        assert_eq!(to_smallest_unit(45.5), 4550);
        assert_eq!(to_smallest_unit(0.019), 1);
        assert_eq!(from_smallest_unit(1000), 10.0);
        assert_eq!(from_smallest_unit(4550), 45.5);
    }

    #[test]
    fn test_payment_signature_verification() {
        let client = RazorpayClient::new(test_config());

        let mut mac = HmacSha256::new_from_slice(b"my_secret_key").unwrap();
        mac.update(b"order_123|pay_456");
        let expected = hex::encode(mac.finalize().into_bytes());

        assert_eq!(client.sign("order_123", "pay_456").unwrap(), expected);
        assert!(client.verify_payment(&verification(expected)).is_ok());
    }

    #[test]
    fn test_invalid_signature() {
        let client = RazorpayClient::new(test_config());
        let forged = client.sign("order_123", "pay_999").unwrap();

        assert!(matches!(
            client.verify_payment(&verification(forged)),
            Err(GatewayError::InvalidSignature)
        ));
    }

    #[test]
    fn test_malformed_signature() {
        let client = RazorpayClient::new(test_config());

        assert!(matches!(
            client.verify_payment(&verification("not-hex".to_string())),
            Err(GatewayError::InvalidSignature)
        ));
    }
}

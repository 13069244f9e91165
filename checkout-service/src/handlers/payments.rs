//! Razorpay payment handlers.
//!
//! Thin pass-throughs: nothing about the order or payment is stored.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{CreateOrderRequest, CreateOrderResponse, VerifyPaymentRequest, VerifyPaymentResponse},
    services::{
        metrics::{record_payment_order, record_payment_verification},
        razorpay::PaymentVerification,
    },
    startup::AppState,
    utils::ValidatedJson,
};

/// Create a Razorpay order for the checkout widget.
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    tracing::info!(
        amount = payload.amount,
        currency = %payload.currency,
        receipt = ?payload.receipt,
        "Creating Razorpay order"
    );

    let receipt = payload.receipt.as_deref().filter(|r| !r.is_empty());
    let notes = payload.notes.as_ref().filter(|n| !n.is_empty());

    let order = state
        .razorpay
        .create_order(payload.amount, &payload.currency, receipt, notes)
        .await
        .map_err(|e| {
            record_payment_order("failed");
            tracing::error!(error = %e, "Failed to create Razorpay order");
            AppError::InternalError(anyhow::anyhow!(e))
        })?;

    record_payment_order("created");

    Ok(Json(CreateOrderResponse {
        order_id: order.order_id,
        amount: order.amount,
        currency: order.currency,
        key: order.key,
    }))
}

fn verification_failed() -> AppError {
    record_payment_verification("failure");
    AppError::BadRequest(anyhow::anyhow!("Payment verification failed"))
}

/// Verify the payment signature returned by Razorpay checkout.
///
/// Every failure, an unreadable body included, looks the same to the caller.
pub async fn verify_payment(
    State(state): State<AppState>,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<Json<VerifyPaymentResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| {
        tracing::warn!(rejection = %e.body_text(), "Unreadable verification request");
        verification_failed()
    })?;

    let verification = PaymentVerification {
        razorpay_order_id: payload.razorpay_order_id,
        razorpay_payment_id: payload.razorpay_payment_id,
        razorpay_signature: payload.razorpay_signature,
    };

    if state.razorpay.verify_payment(&verification).is_err() {
        return Err(verification_failed());
    }

    record_payment_verification("success");

    Ok(Json(VerifyPaymentResponse {
        status: "success".to_string(),
        message: "Payment verified successfully".to_string(),
    }))
}

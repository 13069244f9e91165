//! Checkout Service - barcode lookup and Razorpay payments for a
//! self-checkout kiosk.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

pub use startup::{build_router, AppState, Application};

//! Domain models for checkout-service.

pub mod product;

pub use product::{NewProduct, Product};

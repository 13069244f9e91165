pub mod database;
pub mod metrics;
pub mod razorpay;
pub mod repository;
pub mod seed;

pub use database::Database;
pub use metrics::{get_metrics, init_metrics};
pub use razorpay::{GatewayError, RazorpayClient};
pub use repository::ProductRepository;
pub use seed::load_seed_file;

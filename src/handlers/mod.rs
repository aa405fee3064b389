mod health;
mod metrics;
mod signed_url;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use signed_url::{SignedUrlResponse, signed_url_handler};

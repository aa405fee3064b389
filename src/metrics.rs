use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, Histogram, register_counter, register_counter_vec, register_gauge,
    register_histogram,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter = register_counter!(
        "signed_url_requests_total",
        "Total number of signed-URL requests"
    )
    .unwrap();
    pub static ref SIGNED_URLS_ISSUED: Counter =
        register_counter!("signed_url_issued_total", "Signed URLs returned to clients").unwrap();
    pub static ref REJECTIONS: CounterVec = register_counter_vec!(
        "signed_url_rejections_total",
        "Requests answered with an error, by reason",
        &["reason"]
    )
    .unwrap();
    pub static ref PROVIDER_LATENCY: Histogram = register_histogram!(
        "signed_url_provider_latency_seconds",
        "Latency of storage provider signing calls in seconds"
    )
    .unwrap();
    pub static ref RATE_LIMIT_ENTRIES: Gauge = register_gauge!(
        "signed_url_rate_limit_entries",
        "Current number of tracked client IPs"
    )
    .unwrap();
}

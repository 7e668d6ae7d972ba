use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static LOGIN_ATTEMPTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "fieldsales_login_attempts_total",
        "Total login attempts issued against /user/token"
    )
    .expect("register login_attempts_total")
});

pub static LOGIN_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "fieldsales_login_failures_total",
        "Login attempts that ended in the failed state"
    )
    .expect("register login_failures_total")
});

pub static SECONDARY_FETCH_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "fieldsales_secondary_fetch_failures_total",
        "Profile or team fetches that failed and were swallowed"
    )
    .expect("register secondary_fetch_failures_total")
});

pub static FORCED_LOGOUTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "fieldsales_forced_logouts_total",
        "Sessions ended because the backend rejected the token with 401"
    )
    .expect("register forced_logouts_total")
});

/// Render the default registry in Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return format!("# metrics encode error: {e}\n");
    }
    String::from_utf8(buffer).unwrap_or_default()
}

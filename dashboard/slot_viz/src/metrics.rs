pub use metrics::*;
use std::sync::LazyLock;

pub static FETCH_REQUESTS_TOTAL: LazyLock<Result<IntCounter>> = LazyLock::new(|| {
    try_create_int_counter(
        "slot_viz_fetch_requests_total",
        "Count of slot visualization requests sent to the dashboard API",
    )
});
pub static FETCH_ERRORS_TOTAL: LazyLock<Result<IntCounter>> = LazyLock::new(|| {
    try_create_int_counter(
        "slot_viz_fetch_errors_total",
        "Count of slot visualization requests that failed",
    )
});
pub static FETCH_TIMES: LazyLock<Result<Histogram>> = LazyLock::new(|| {
    try_create_histogram(
        "slot_viz_fetch_seconds",
        "Time taken to fetch the slot visualization",
    )
});
pub static STALE_RESPONSES_TOTAL: LazyLock<Result<IntCounter>> = LazyLock::new(|| {
    try_create_int_counter(
        "slot_viz_stale_responses_total",
        "Count of responses discarded because the provider was stopped or restarted",
    )
});
pub static TICKS_TOTAL: LazyLock<Result<IntCounter>> = LazyLock::new(|| {
    try_create_int_counter(
        "slot_viz_ticks_total",
        "Count of slot boundary ticks of the slot visualization",
    )
});
pub static SLOT_COUNT: LazyLock<Result<IntGauge>> = LazyLock::new(|| {
    try_create_int_gauge(
        "slot_viz_slots",
        "Number of slots in the current slot visualization",
    )
});
pub static CURRENT_SLOT: LazyLock<Result<IntGauge>> = LazyLock::new(|| {
    try_create_int_gauge(
        "slot_viz_current_slot",
        "The current slot as last derived by the slot visualization",
    )
});
pub static ONLINE: LazyLock<Result<IntGauge>> = LazyLock::new(|| {
    try_create_int_gauge(
        "slot_viz_online",
        "Set to 1 if the last slot visualization fetch succeeded",
    )
});
pub static GENERATION: LazyLock<Result<IntGauge>> = LazyLock::new(|| {
    try_create_int_gauge(
        "slot_viz_generation",
        "Number of the current (or last) run of the slot visualization provider",
    )
});

/// Handles async task metrics
pub use metrics::*;
use std::sync::LazyLock;

pub static ASYNC_TASKS_COUNT: LazyLock<Result<IntGaugeVec>> = LazyLock::new(|| {
    try_create_int_gauge_vec(
        "async_tasks_count",
        "Number of async tasks currently running, by task name",
        &["async_task_count"],
    )
});
pub static TASKS_HISTOGRAM: LazyLock<Result<HistogramVec>> = LazyLock::new(|| {
    try_create_histogram_vec(
        "async_tasks_time_histogram",
        "Time taken by async tasks",
        &["async_task_hist"],
    )
});
pub static EXIT_SIGNALS_FIRED_TOTAL: LazyLock<Result<IntCounter>> = LazyLock::new(|| {
    try_create_int_counter(
        "exit_signals_fired_total",
        "Count of exit signals fired explicitly",
    )
});

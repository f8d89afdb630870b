#![cfg(test)]

use environment::{EnvironmentBuilder, LogFormat, LoggerConfig};
use futures::future;

fn builder() -> EnvironmentBuilder {
    EnvironmentBuilder::new()
        .single_thread_tokio_runtime()
        .expect("should set runtime")
        .null_logger()
        .expect("should set logger")
}

#[test]
fn runs_tasks_on_the_runtime() {
    let environment = builder().build().expect("should build environment");
    let context = environment.service_context("test".to_string());

    let handle = context.executor.spawn_handle(async { 7 }, "seven");
    let output = environment
        .runtime()
        .block_on(handle)
        .expect("task should not panic");
    assert_eq!(output, Some(7));
}

#[test]
fn fire_exit_cancels_tasks() {
    let mut environment = builder().build().expect("should build environment");
    let context = environment.core_context();
    let handle = context
        .executor
        .spawn_handle(future::pending::<()>(), "pending");

    environment.fire_exit();
    // Firing twice is harmless.
    environment.fire_exit();

    let output = environment
        .runtime()
        .block_on(handle)
        .expect("task should not panic");
    assert_eq!(output, None);
    assert!(context.executor.is_exited());

    environment.shutdown();
}

#[test]
fn requires_runtime_and_logger() {
    assert!(EnvironmentBuilder::new()
        .null_logger()
        .expect("should set logger")
        .build()
        .is_err());
    assert!(EnvironmentBuilder::new()
        .single_thread_tokio_runtime()
        .expect("should set runtime")
        .build()
        .is_err());
}

#[test]
fn rejects_unknown_debug_level() {
    let config = LoggerConfig {
        debug_level: "verbose".to_string(),
        log_format: LogFormat::Terminal,
        log_color: false,
    };
    assert!(EnvironmentBuilder::new().initialize_logger(config).is_err());
}

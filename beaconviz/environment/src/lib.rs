//! This crate provides the "environment" that `beaconviz` services run in: the tokio runtime, the
//! root logger and the exit signal every task listens to.
//!
//! The main thread creates an `Environment`, which is then used to hand out `RuntimeContext`s to
//! any service that wishes to start async tasks or perform logging.

use slog::{debug, info, o, Logger};
use std::sync::Arc;
use std::time::Duration;
use task_executor::{ExitSignal, TaskExecutor};
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};

pub use logging::{LogFormat, LoggerConfig};

/// How long `shutdown` waits for blocking tasks before dropping the runtime.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Builds an `Environment`.
#[derive(Default)]
pub struct EnvironmentBuilder {
    runtime: Option<Arc<Runtime>>,
    log: Option<Logger>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Specifies that a multi-threaded tokio runtime should be used. Ideal for production uses.
    pub fn multi_threaded_tokio_runtime(mut self) -> Result<Self, String> {
        self.runtime = Some(Arc::new(
            RuntimeBuilder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|e| format!("Failed to start runtime: {:?}", e))?,
        ));
        Ok(self)
    }

    /// Specifies that a single-threaded tokio runtime should be used. Ideal for testing purposes
    /// where tests are already multi-threaded.
    pub fn single_thread_tokio_runtime(mut self) -> Result<Self, String> {
        self.runtime = Some(Arc::new(
            RuntimeBuilder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| format!("Failed to start runtime: {:?}", e))?,
        ));
        Ok(self)
    }

    /// Specifies that all logs should be sent to `null` (i.e., ignored).
    pub fn null_logger(mut self) -> Result<Self, String> {
        self.log = Some(logging::null_logger()?);
        Ok(self)
    }

    /// Initializes the root logger from `config`.
    ///
    /// The terminal and JSON drains are asynchronous: a dedicated thread accepts logs and flushes
    /// them, so the thread that raised the log does not wait.
    pub fn initialize_logger(mut self, config: LoggerConfig) -> Result<Self, String> {
        self.log = Some(logging::build_logger(&config)?);
        Ok(self)
    }

    /// Consumes the builder, returning an `Environment`.
    pub fn build(self) -> Result<Environment, String> {
        let (exit_signal, exit) = ExitSignal::channel();
        Ok(Environment {
            runtime: self
                .runtime
                .ok_or_else(|| "Cannot build environment without runtime".to_string())?,
            log: self
                .log
                .ok_or_else(|| "Cannot build environment without log".to_string())?,
            exit_signal: Some(exit_signal),
            exit,
        })
    }
}

/// An execution context that can be used by a service.
///
/// Distinct from an `Environment` because a `RuntimeContext` cannot stop the runtime; it only
/// has access to a `TaskExecutor`.
#[derive(Clone)]
pub struct RuntimeContext {
    pub executor: TaskExecutor,
    pub log: Logger,
}

impl RuntimeContext {
    /// Returns a sub-context of this context.
    ///
    /// The generated service will have the `service_name` in all it's logs.
    pub fn service_context(&self, service_name: String) -> Self {
        Self {
            executor: self.executor.clone_with_name(service_name.clone()),
            log: self.log.new(o!("service" => service_name)),
        }
    }
}

/// An environment where `beaconviz` services can run.
pub struct Environment {
    runtime: Arc<Runtime>,
    log: Logger,
    exit_signal: Option<ExitSignal>,
    exit: async_channel::Receiver<()>,
}

impl Environment {
    /// Returns the `tokio` runtime.
    ///
    /// Useful in the rare scenarios where it's necessary to block the current thread until a task
    /// is finished (e.g., during testing).
    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }

    pub fn log(&self) -> &Logger {
        &self.log
    }

    /// Returns a `RuntimeContext` where no "service" has been added to the logger output.
    pub fn core_context(&self) -> RuntimeContext {
        RuntimeContext {
            executor: TaskExecutor::new(
                self.runtime.handle().clone(),
                self.exit.clone(),
                self.log.clone(),
            ),
            log: self.log.clone(),
        }
    }

    /// Returns a `RuntimeContext` where the `service_name` is added to the logger output.
    pub fn service_context(&self, service_name: String) -> RuntimeContext {
        self.core_context().service_context(service_name)
    }

    /// Block the current thread until Ctrl+C is received.
    pub fn block_until_ctrl_c(&self) -> Result<(), String> {
        self.runtime
            .block_on(tokio::signal::ctrl_c())
            .map_err(|e| format!("Could not listen for ctrl-c: {:?}", e))?;
        info!(self.log, "Received Ctrl+C");
        Ok(())
    }

    /// Fires the exit signal, cancelling every task spawned through a context of this
    /// environment. Does nothing if the signal has already fired.
    pub fn fire_exit(&mut self) {
        if let Some(exit_signal) = self.exit_signal.take() {
            debug!(self.log, "Firing exit signal");
            exit_signal.fire();
        }
    }

    /// Cancels all tasks and shuts down the runtime.
    pub fn shutdown(mut self) {
        self.fire_exit();
        info!(self.log, "Shutting down");

        match Arc::try_unwrap(self.runtime) {
            Ok(runtime) => runtime.shutdown_timeout(SHUTDOWN_TIMEOUT),
            Err(_) => debug!(self.log, "Runtime still shared, leaving shutdown to its owner"),
        }
    }
}

mod metrics;

use futures::future::{self, Either};
use futures::prelude::*;
use slog::{debug, o, trace};
use tokio::runtime::Handle;

/// The sending half of an exit channel.
///
/// Firing or dropping the signal cancels every task spawned on the executors listening to it.
pub struct ExitSignal {
    sender: async_channel::Sender<()>,
}

impl ExitSignal {
    /// Creates a signal and the receiver to hand to a `TaskExecutor`.
    pub fn channel() -> (Self, async_channel::Receiver<()>) {
        let (sender, receiver) = async_channel::bounded(1);
        (Self { sender }, receiver)
    }

    /// Cancels all tasks listening to this signal.
    pub fn fire(self) {
        metrics::inc_counter(&metrics::EXIT_SIGNALS_FIRED_TOTAL);
        self.sender.close();
    }

    /// Returns `true` once the signal has been fired.
    pub fn is_fired(&self) -> bool {
        self.sender.is_closed()
    }
}

/// A wrapper over a runtime handle which can spawn async tasks.
///
/// Spawned futures are raced against every exit receiver of the executor; the task is cancelled
/// when any of the corresponding `ExitSignal`s is fired or dropped.
#[derive(Clone)]
pub struct TaskExecutor {
    /// The handle to the runtime on which tasks are spawned.
    handle: Handle,
    /// Exit receivers of this executor and of all its ancestors.
    exits: Vec<async_channel::Receiver<()>>,
    log: slog::Logger,
}

impl TaskExecutor {
    /// Create a new task executor.
    ///
    /// Note: this is mainly useful in testing.
    pub fn new(handle: Handle, exit: async_channel::Receiver<()>, log: slog::Logger) -> Self {
        Self {
            handle,
            exits: vec![exit],
            log,
        }
    }

    /// Returns a child executor together with the signal that exits it.
    ///
    /// Tasks of the child stop when either the returned signal or any exit of `self` fires. Firing
    /// the returned signal leaves the tasks of `self` running.
    pub fn scoped(&self, scope: &'static str) -> (Self, ExitSignal) {
        let (signal, exit) = ExitSignal::channel();
        let mut exits = self.exits.clone();
        exits.push(exit);

        let executor = Self {
            handle: self.handle.clone(),
            exits,
            log: self.log.new(o!("scope" => scope)),
        };
        (executor, signal)
    }

    /// Clones the executor, adding `service_name` to its log output.
    pub fn clone_with_name(&self, service_name: String) -> Self {
        Self {
            handle: self.handle.clone(),
            exits: self.exits.clone(),
            log: self.log.new(o!("service" => service_name)),
        }
    }

    /// Spawn a future on the tokio runtime.
    ///
    /// The future is wrapped in the exit future of this executor and cancelled when it fires.
    ///
    /// This function generates prometheus metrics on number of tasks and task duration.
    pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static, name: &'static str) {
        // Dropping the handle detaches the task.
        drop(self.spawn_handle(task, name));
    }

    /// Spawn a future on the tokio runtime and return its join handle.
    ///
    /// The handle resolves to `Some(output)` if the task completed and to `None` if it was
    /// cancelled by an exit signal first.
    pub fn spawn_handle<R: Send + 'static>(
        &self,
        task: impl Future<Output = R> + Send + 'static,
        name: &'static str,
    ) -> tokio::task::JoinHandle<Option<R>> {
        let exit = self.exit();
        let log = self.log.clone();

        metrics::inc_gauge_vec(&metrics::ASYNC_TASKS_COUNT, &[name]);
        let timer = metrics::start_timer_vec(&metrics::TASKS_HISTOGRAM, &[name]);

        let future = async move {
            let result = match future::select(Box::pin(task), Box::pin(exit)).await {
                Either::Left((value, _)) => {
                    trace!(log, "Async task completed"; "task" => name);
                    Some(value)
                }
                Either::Right(_) => {
                    debug!(log, "Async task shutdown, exit received"; "task" => name);
                    None
                }
            };
            metrics::dec_gauge_vec(&metrics::ASYNC_TASKS_COUNT, &[name]);
            metrics::stop_timer(timer);
            result
        };

        self.handle.spawn(future)
    }

    /// Returns a future that resolves once any exit signal of this executor fires.
    pub fn exit(&self) -> impl Future<Output = ()> + Send + 'static {
        let exits = self.exits.clone();
        async move {
            if exits.is_empty() {
                return future::pending().await;
            }
            let waits = exits.into_iter().map(|exit| {
                Box::pin(async move {
                    // A closed channel is the exit condition; no value is ever sent.
                    let _ = exit.recv().await;
                })
            });
            future::select_all(waits).await;
        }
    }

    /// Returns `true` if any exit signal of this executor has fired.
    pub fn is_exited(&self) -> bool {
        self.exits.iter().any(|exit| exit.is_closed())
    }

    /// Returns a copy of the runtime handle.
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    /// Returns a reference to the logger.
    pub fn log(&self) -> &slog::Logger {
        &self.log
    }
}

//! Keeps the slot visualization of one dashboard group up to date.
//!
//! A running provider owns two tasks:
//!
//! - The tick timer, which wakes at every slot boundary of the active network and moves the
//!   current slot forward.
//! - The fetch loop, which fetches the slot visualization once per slot and replaces the slot
//!   collection.
//!
//! Every `start` opens a new generation with its own exit signal. `stop` fires the signal, which
//! cancels both tasks and any in-flight fetch, and every state change checks that the generation
//! it belongs to is still current. Observers receive immutable `SlotVizView` snapshots through a
//! watch channel whenever the slot collection or the tick changes.

use crate::config::Config;
use crate::duty::slot_has_duty;
use crate::metrics;
use dashboard_api::{
    slot_viz_resource, DashboardId, Error as ApiError, GroupId, SlotVizApi, SlotVizEpoch,
    SlotVizSlot, ALL_GROUPS,
};
use network_registry::find_chain_network_by_id;
use parking_lot::RwLock;
use slog::{debug, error, info, o, warn, Logger};
use slot_clock::{slot_to_timestamp, timestamp_to_slot, SlotClock};
use std::sync::{Arc, Weak};
use task_executor::{ExitSignal, TaskExecutor};
use tokio::sync::watch;
use tokio::time::{sleep, sleep_until, Instant};
use types::{ChainNetwork, Slot};

/// A consistent snapshot of the slot visualization, derived from the slot collection and the
/// latest tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotVizView {
    /// The network the current slot and timestamps are computed for.
    pub network: &'static ChainNetwork,
    /// Wall-clock milliseconds of the latest tick.
    pub tick: u64,
    /// All slots, ascending.
    pub slots: Vec<SlotVizSlot>,
    pub current_slot: Slot,
    /// Slots with a duty at or before the current slot, newest first.
    pub previous_duties: Vec<SlotVizSlot>,
    /// Slots with a duty after the current slot, oldest first.
    pub next_duties: Vec<SlotVizSlot>,
    /// Start (ms) of the next duty slot, or of the last known slot if no duty is ahead.
    pub next_duty_timestamp: Option<u64>,
    /// `false` while the latest fetch failed.
    pub online: bool,
}

impl SlotVizView {
    pub fn derive(
        mut slots: Vec<SlotVizSlot>,
        tick: u64,
        network: &'static ChainNetwork,
        online: bool,
    ) -> Self {
        slots.sort_by_key(|slot| slot.slot);
        let current_slot = timestamp_to_slot(network, tick);

        let previous_duties = slots
            .iter()
            .rev()
            .filter(|slot| slot_has_duty(slot) && slot.slot <= current_slot)
            .cloned()
            .collect::<Vec<_>>();
        let next_duties = slots
            .iter()
            .filter(|slot| slot.slot > current_slot && slot_has_duty(slot))
            .cloned()
            .collect::<Vec<_>>();
        let next_duty_timestamp = next_duties
            .first()
            .or(slots.last())
            .map(|slot| slot_to_timestamp(network, slot.slot));

        Self {
            network,
            tick,
            slots,
            current_slot,
            previous_duties,
            next_duties,
            next_duty_timestamp,
            online,
        }
    }

    /// The most recent slot with a duty at or before the current slot.
    pub fn previous_duty(&self) -> Option<&SlotVizSlot> {
        self.previous_duties.first()
    }

    /// The first slot with a duty after the current slot.
    pub fn next_duty(&self) -> Option<&SlotVizSlot> {
        self.next_duties.first()
    }
}

/// Flattens the slots of all epochs into one collection, ascending by slot.
pub fn flatten_epochs(epochs: Vec<SlotVizEpoch>) -> Vec<SlotVizSlot> {
    let mut slots = epochs
        .into_iter()
        .flat_map(|epoch| epoch.slots.unwrap_or_default())
        .collect::<Vec<_>>();
    slots.sort_by_key(|slot| slot.slot);
    slots
}

struct Running {
    generation: u64,
    /// Cancels the tasks of this generation when fired or dropped.
    exit: ExitSignal,
}

struct State {
    dashboard_id: Option<DashboardId>,
    group_id: GroupId,
    running: Option<Running>,
    last_generation: u64,
    tick: u64,
    network: &'static ChainNetwork,
    slots: Vec<SlotVizSlot>,
    online: bool,
}

impl State {
    fn is_current(&self, generation: u64) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| running.generation == generation)
    }

    fn view(&self) -> SlotVizView {
        SlotVizView::derive(self.slots.clone(), self.tick, self.network, self.online)
    }
}

struct Inner<T, A> {
    api: Arc<A>,
    clock: T,
    executor: TaskExecutor,
    config: Config,
    log: Logger,
    state: RwLock<State>,
    view_tx: watch::Sender<Arc<SlotVizView>>,
}

impl<T: SlotClock + 'static, A: SlotVizApi> Inner<T, A> {
    fn now_millis(&self) -> u64 {
        self.clock.now_millis().unwrap_or(0)
    }

    /// Applies `f` to the state and, if it returns `true`, publishes a new view.
    ///
    /// The view is published under the state lock so observers see views in mutation order.
    fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut State) -> bool,
    {
        let mut state = self.state.write();
        if !f(&mut state) {
            return false;
        }

        let view = state.view();
        metrics::set_gauge(&metrics::CURRENT_SLOT, view.current_slot.as_u64() as i64);
        metrics::set_gauge(&metrics::SLOT_COUNT, view.slots.len() as i64);
        self.view_tx.send_replace(Arc::new(view));
        true
    }

    /// Moves the tick to now. Returns `false` if `generation` has ended.
    fn on_tick(&self, generation: u64) -> bool {
        let now = self.now_millis();
        self.update(|state| {
            if !state.is_current(generation) {
                return false;
            }
            state.tick = now;
            true
        })
    }

    /// Applies a fetch result. Returns `false` (and drops the result) if `generation` has ended.
    fn on_fetch(&self, generation: u64, result: Result<Vec<SlotVizEpoch>, ApiError>) -> bool {
        let error = result.as_ref().err().map(ToString::to_string);

        let applied = self.update(|state| {
            if !state.is_current(generation) {
                return false;
            }
            match result {
                Ok(epochs) => {
                    state.slots = flatten_epochs(epochs);
                    state.online = true;
                }
                // Keep the last good slot collection.
                Err(_) => state.online = false,
            }
            true
        });

        if !applied {
            metrics::inc_counter(&metrics::STALE_RESPONSES_TOTAL);
            debug!(self.log, "Discarding stale slot visualization"; "generation" => generation);
            return false;
        }

        match error {
            Some(error) => {
                metrics::inc_counter(&metrics::FETCH_ERRORS_TOTAL);
                metrics::set_gauge(&metrics::ONLINE, 0);
                error!(
                    self.log,
                    "Error updating slot visualization";
                    "error" => error,
                    "generation" => generation,
                );
            }
            None => {
                metrics::set_gauge(&metrics::ONLINE, 1);
                debug!(self.log, "Slot visualization updated"; "generation" => generation);
            }
        }
        true
    }

    /// Switches to the network the API currently serves, if it changed.
    fn on_network(&self, generation: u64, network: &'static ChainNetwork) {
        let changed = self.update(|state| {
            if !state.is_current(generation) || state.network.id == network.id {
                return false;
            }
            state.network = network;
            true
        });

        if changed {
            info!(
                self.log,
                "Slot visualization network changed";
                "network" => network.name,
                "chain_id" => network.id,
            );
        }
    }
}

/// Wakes at every slot boundary of the active network and moves the tick forward.
async fn tick_timer<T: SlotClock + 'static, A: SlotVizApi>(
    weak: Weak<Inner<T, A>>,
    generation: u64,
) {
    loop {
        let duration = {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let network = inner.state.read().network;
            let Some(duration) = inner.clock.duration_to_next_slot(network) else {
                warn!(inner.log, "Unable to determine duration to next slot");
                return;
            };
            duration
        };

        sleep(duration).await;

        let Some(inner) = weak.upgrade() else {
            return;
        };
        if !inner.on_tick(generation) {
            return;
        }
        metrics::inc_counter(&metrics::TICKS_TOTAL);
        let network = inner.state.read().network;
        slot_clock::scrape_for_metrics(&inner.clock, network);
    }
}

/// Fetches the slot visualization once per slot of the active network.
///
/// The next iteration starts one slot duration after the previous one started, or immediately if
/// the fetch took longer than that, so fetches never overlap.
async fn fetch_loop<T: SlotClock + 'static, A: SlotVizApi>(
    weak: Weak<Inner<T, A>>,
    api: Arc<A>,
    generation: u64,
) {
    loop {
        let iteration_start = Instant::now();

        let (dashboard_id, group_id, bypass_cache, log) = {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let state = inner.state.read();
            if !state.is_current(generation) {
                return;
            }
            let Some(dashboard_id) = state.dashboard_id.clone() else {
                return;
            };
            let group_id = state.group_id;
            let bypass_cache = inner.config.bypass_cache;
            let log = inner.log.clone();
            (dashboard_id, group_id, bypass_cache, log)
        };

        debug!(
            log,
            "Fetching slot visualization";
            "resource" => slot_viz_resource(&dashboard_id, group_id),
        );
        metrics::inc_counter(&metrics::FETCH_REQUESTS_TOTAL);
        let timer = metrics::start_timer(&metrics::FETCH_TIMES);
        let result = api.get_slot_viz(&dashboard_id, group_id, bypass_cache).await;
        metrics::stop_timer(timer);

        let network = find_chain_network_by_id(api.current_chain_id());
        {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if !inner.on_fetch(generation, result) {
                return;
            }
            inner.on_network(generation, network);
        }

        sleep_until(iteration_start + network.slot_duration()).await;
    }
}

/// The slot visualization of one dashboard group.
///
/// Handles are cheap to clone and share one state. Dropping the last handle ends a running
/// generation.
pub struct SlotVizProvider<T, A> {
    inner: Arc<Inner<T, A>>,
}

impl<T, A> Clone for SlotVizProvider<T, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: SlotClock + 'static, A: SlotVizApi> SlotVizProvider<T, A> {
    pub fn new(api: Arc<A>, clock: T, executor: TaskExecutor, config: Config) -> Self {
        let log = executor.log().new(o!("service" => "slot_viz"));
        let state = State {
            dashboard_id: None,
            group_id: ALL_GROUPS,
            running: None,
            last_generation: 0,
            tick: clock.now_millis().unwrap_or(0),
            network: find_chain_network_by_id(api.current_chain_id()),
            slots: vec![],
            online: true,
        };
        let (view_tx, _) = watch::channel(Arc::new(state.view()));

        Self {
            inner: Arc::new(Inner {
                api,
                clock,
                executor,
                config,
                log,
                state: RwLock::new(state),
                view_tx,
            }),
        }
    }

    /// Shows `dashboard_id`/`group_id` and starts the tick timer and the fetch loop.
    ///
    /// When already running only the parameters change; they are used from the next fetch on.
    pub fn start(&self, dashboard_id: DashboardId, group_id: GroupId) {
        let inner = &self.inner;
        let resource = slot_viz_resource(&dashboard_id, group_id);
        let now = inner.now_millis();
        let mut started = None;

        inner.update(|state| {
            state.dashboard_id = Some(dashboard_id);
            state.group_id = group_id;
            if state.running.is_some() {
                return false;
            }

            state.last_generation += 1;
            let generation = state.last_generation;
            let (executor, exit) = inner.executor.scoped("slot_viz");
            state.running = Some(Running { generation, exit });
            state.network = find_chain_network_by_id(inner.api.current_chain_id());
            state.tick = now;
            started = Some((generation, executor));
            true
        });

        let Some((generation, executor)) = started else {
            debug!(inner.log, "Slot visualization already running"; "resource" => resource);
            return;
        };

        metrics::set_gauge(&metrics::GENERATION, generation as i64);
        executor.spawn(
            tick_timer(Arc::downgrade(inner), generation),
            "slot_viz_tick",
        );
        executor.spawn(
            fetch_loop(Arc::downgrade(inner), inner.api.clone(), generation),
            "slot_viz_fetch",
        );

        info!(
            inner.log,
            "Slot visualization started";
            "resource" => resource,
            "generation" => generation,
        );
    }

    /// Ends the running generation. Its timers stop and an in-flight fetch is discarded.
    pub fn stop(&self) {
        let running = self.inner.state.write().running.take();
        match running {
            Some(running) => {
                running.exit.fire();
                info!(
                    self.inner.log,
                    "Slot visualization stopped";
                    "generation" => running.generation,
                );
            }
            None => debug!(self.inner.log, "Slot visualization not running"),
        }
    }

    /// Switches the dashboard. The next fetch uses it; derived values are republished now.
    pub fn change_dashboard(&self, dashboard_id: DashboardId) {
        let now = self.inner.now_millis();
        self.inner.update(|state| {
            state.dashboard_id = Some(dashboard_id);
            state.tick = now;
            true
        });
    }

    /// Switches the group. The next fetch uses it; derived values are republished now.
    pub fn change_group_id(&self, group_id: GroupId) {
        let now = self.inner.now_millis();
        self.inner.update(|state| {
            state.group_id = group_id;
            state.tick = now;
            true
        });
    }

    /// Returns a receiver of every new view.
    ///
    /// Do not hold a borrow of the receiver while calling into the provider.
    pub fn subscribe(&self) -> watch::Receiver<Arc<SlotVizView>> {
        self.inner.view_tx.subscribe()
    }

    /// The latest view.
    pub fn view(&self) -> Arc<SlotVizView> {
        self.inner.view_tx.borrow().clone()
    }

    pub fn slots(&self) -> Vec<SlotVizSlot> {
        self.view().slots.clone()
    }

    pub fn current_slot(&self) -> Slot {
        self.view().current_slot
    }

    pub fn previous_duties(&self) -> Vec<SlotVizSlot> {
        self.view().previous_duties.clone()
    }

    pub fn previous_duty(&self) -> Option<SlotVizSlot> {
        self.view().previous_duty().cloned()
    }

    pub fn next_duties(&self) -> Vec<SlotVizSlot> {
        self.view().next_duties.clone()
    }

    pub fn next_duty(&self) -> Option<SlotVizSlot> {
        self.view().next_duty().cloned()
    }

    pub fn next_duty_timestamp(&self) -> Option<u64> {
        self.view().next_duty_timestamp
    }

    /// `false` while the latest fetch failed.
    pub fn is_online(&self) -> bool {
        self.view().online
    }

    pub fn is_running(&self) -> bool {
        self.inner.state.read().running.is_some()
    }

    pub fn network(&self) -> &'static ChainNetwork {
        self.inner.state.read().network
    }

    pub fn dashboard_id(&self) -> Option<DashboardId> {
        self.inner.state.read().dashboard_id.clone()
    }

    pub fn group_id(&self) -> GroupId {
        self.inner.state.read().group_id
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}

#![cfg(test)]

use async_trait::async_trait;
use dashboard_api::{
    ChainId, DashboardId, Error, GroupId, SlotStatus, SlotVizApi, SlotVizDuty, SlotVizEpoch,
    SlotVizSlot, SlotVizStatus, ALL_GROUPS,
};
use network_registry::{ETHEREUM, GNOSIS};
use parking_lot::Mutex;
use slot_clock::ManualSlotClock;
use slot_viz::{Config, SlotVizProvider, SlotVizView};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use task_executor::{ExitSignal, TaskExecutor};
use tokio::runtime::Handle;
use tokio::sync::{watch, Notify};
use tokio::time::{sleep, timeout};
use types::{Epoch, Slot};

const START_SLOT: u64 = 100;

/// Replays queued responses. Requests past the end of the queue never complete.
struct MockApi {
    responses: Mutex<VecDeque<Result<Vec<SlotVizEpoch>, String>>>,
    calls: Mutex<Vec<(DashboardId, GroupId)>>,
    /// When set, each request waits for a permit before answering.
    gate: Option<Arc<Notify>>,
    chain_id: AtomicU64,
}

impl MockApi {
    fn new(responses: Vec<Result<Vec<SlotVizEpoch>, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(vec![]),
            gate: None,
            chain_id: AtomicU64::new(ETHEREUM.id),
        }
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn calls(&self) -> Vec<(DashboardId, GroupId)> {
        self.calls.lock().clone()
    }

    fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

#[async_trait]
impl SlotVizApi for MockApi {
    async fn get_slot_viz(
        &self,
        dashboard_id: &DashboardId,
        group_id: GroupId,
        _bypass_cache: bool,
    ) -> Result<Vec<SlotVizEpoch>, Error> {
        self.calls.lock().push((dashboard_id.clone(), group_id));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let response = self.responses.lock().pop_front();
        match response {
            Some(response) => response.map_err(Error::Transport),
            None => std::future::pending().await,
        }
    }

    fn current_chain_id(&self) -> ChainId {
        self.chain_id.load(Ordering::Relaxed)
    }
}

struct Harness {
    api: Arc<MockApi>,
    clock: ManualSlotClock,
    provider: SlotVizProvider<ManualSlotClock, MockApi>,
    views: watch::Receiver<Arc<SlotVizView>>,
    _exit: ExitSignal,
}

impl Harness {
    fn new(api: MockApi) -> Self {
        let api = Arc::new(api);
        let clock = ManualSlotClock::at_slot(&ETHEREUM, Slot::new(START_SLOT));
        let (exit_signal, exit) = ExitSignal::channel();
        let executor = TaskExecutor::new(Handle::current(), exit, logging::test_logger());
        let provider =
            SlotVizProvider::new(api.clone(), clock.clone(), executor, Config::default());
        let views = provider.subscribe();

        Self {
            api,
            clock,
            provider,
            views,
            _exit: exit_signal,
        }
    }

    fn start(&self) {
        self.provider.start(DashboardId::Private(1), ALL_GROUPS);
    }

    async fn wait_for<F>(&mut self, mut predicate: F) -> Arc<SlotVizView>
    where
        F: FnMut(&SlotVizView) -> bool,
    {
        let view = timeout(
            Duration::from_secs(600),
            self.views.wait_for(|view| predicate(view.as_ref())),
        )
        .await
        .expect("view should change before the timeout")
        .expect("provider should be alive");
        Arc::clone(&view)
    }
}

fn attested(slot: u64) -> SlotVizSlot {
    SlotVizSlot {
        attestations: Some(SlotVizStatus {
            success: Some(SlotVizDuty {
                total_count: 1,
                validators: vec![],
            }),
            ..SlotVizStatus::default()
        }),
        ..SlotVizSlot::empty(Slot::new(slot), SlotStatus::Proposed)
    }
}

fn epoch(slots: &[u64]) -> Vec<SlotVizEpoch> {
    vec![SlotVizEpoch {
        epoch: Epoch::new(3),
        state: None,
        progress: None,
        slots: Some(slots.iter().copied().map(attested).collect()),
    }]
}

#[tokio::test(start_paused = true)]
async fn start_twice_runs_one_fetch_loop() {
    let mut harness = Harness::new(MockApi::new(vec![
        Ok(epoch(&[98, 99])),
        Ok(epoch(&[99, 100])),
    ]));

    harness.start();
    harness.provider.start(DashboardId::Private(2), 5);
    assert_eq!(harness.provider.dashboard_id(), Some(DashboardId::Private(2)));
    assert_eq!(harness.provider.group_id(), 5);

    let view = harness.wait_for(|view| !view.slots.is_empty()).await;
    assert_eq!(view.slots.len(), 2);

    sleep(Duration::from_secs(1)).await;
    assert!(harness.provider.is_running());
    assert_eq!(harness.api.calls(), vec![(DashboardId::Private(2), 5)]);
}

#[tokio::test(start_paused = true)]
async fn stop_discards_in_flight_response() {
    let gate = Arc::new(Notify::new());
    let harness = Harness::new(MockApi::new(vec![Ok(epoch(&[99]))]).gated(gate.clone()));

    harness.start();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(harness.api.calls().len(), 1);

    harness.provider.stop();
    gate.notify_one();
    sleep(Duration::from_secs(30)).await;

    assert!(!harness.provider.is_running());
    assert!(harness.provider.slots().is_empty());
    assert_eq!(harness.api.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn restart_fetches_again() {
    let gate = Arc::new(Notify::new());
    let mut harness = Harness::new(MockApi::new(vec![Ok(epoch(&[99]))]).gated(gate.clone()));

    harness.start();
    sleep(Duration::from_millis(10)).await;
    harness.provider.stop();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(harness.api.remaining(), 1);

    harness.start();
    gate.notify_one();

    let view = harness.wait_for(|view| !view.slots.is_empty()).await;
    assert_eq!(view.slots[0].slot, Slot::new(99));
    assert_eq!(harness.api.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn tick_timer_moves_to_next_slot() {
    let mut harness = Harness::new(MockApi::new(vec![]));

    harness.start();
    assert_eq!(harness.provider.current_slot(), Slot::new(START_SLOT));

    harness.clock.advance_slot(&ETHEREUM);
    let view = harness
        .wait_for(|view| view.current_slot == Slot::new(START_SLOT + 1))
        .await;
    assert_eq!(view.network.id, ETHEREUM.id);
}

#[tokio::test(start_paused = true)]
async fn duties_around_current_slot() {
    let mut harness = Harness::new(MockApi::new(vec![Ok(epoch(&[99, 100, 101, 102]))]));

    harness.start();
    let view = harness.wait_for(|view| !view.slots.is_empty()).await;

    assert_eq!(view.current_slot, Slot::new(START_SLOT));
    assert_eq!(view.previous_duty().map(|slot| slot.slot), Some(Slot::new(100)));
    assert_eq!(view.next_duty().map(|slot| slot.slot), Some(Slot::new(101)));
    assert_eq!(harness.provider.previous_duties().len(), 2);
    assert_eq!(harness.provider.next_duties().len(), 2);
    assert_eq!(
        harness.provider.next_duty_timestamp(),
        Some(slot_clock::slot_to_timestamp(&ETHEREUM, Slot::new(101)))
    );
}

#[tokio::test(start_paused = true)]
async fn fetch_error_keeps_last_slots() {
    let mut harness = Harness::new(MockApi::new(vec![
        Ok(epoch(&[99, 100])),
        Err("connection refused".to_string()),
    ]));

    harness.start();
    let view = harness.wait_for(|view| !view.slots.is_empty()).await;
    assert!(view.online);

    let view = harness.wait_for(|view| !view.online).await;
    assert_eq!(view.slots.len(), 2);
    assert!(!harness.provider.is_online());
    assert_eq!(harness.api.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn changed_dashboard_is_used_by_next_fetch() {
    let mut harness = Harness::new(MockApi::new(vec![
        Ok(epoch(&[99])),
        Ok(epoch(&[100])),
    ]));

    harness.start();
    harness.wait_for(|view| !view.slots.is_empty()).await;

    let public = DashboardId::Public("v-80d7edaa".to_string());
    harness.provider.change_dashboard(public.clone());
    harness.provider.change_group_id(3);
    assert_eq!(harness.api.calls().len(), 1);

    harness
        .wait_for(|view| view.slots.first().map(|slot| slot.slot) == Some(Slot::new(100)))
        .await;
    assert_eq!(harness.api.calls()[1], (public.clone(), 3));
    assert_eq!(harness.provider.dashboard_id(), Some(public));
    assert_eq!(harness.provider.group_id(), 3);
}

#[tokio::test(start_paused = true)]
async fn network_follows_api() {
    let mut harness = Harness::new(MockApi::new(vec![Ok(epoch(&[99])), Ok(epoch(&[100]))]));

    harness.start();
    harness.wait_for(|view| !view.slots.is_empty()).await;
    assert_eq!(harness.provider.network().id, ETHEREUM.id);

    harness.api.chain_id.store(GNOSIS.id, Ordering::Relaxed);
    let view = harness.wait_for(|view| view.network.id == GNOSIS.id).await;
    assert_eq!(harness.provider.network().name, GNOSIS.name);
    assert_eq!(
        view.current_slot,
        slot_clock::timestamp_to_slot(&GNOSIS, view.tick)
    );
}

#[tokio::test(start_paused = true)]
async fn dropping_provider_stops_fetching() {
    let harness = Harness::new(MockApi::new(
        (0..10).map(|_| Ok(epoch(&[99]))).collect(),
    ));

    harness.start();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(harness.api.calls().len(), 1);

    let Harness {
        api,
        provider,
        views,
        _exit,
        ..
    } = harness;
    drop(provider);

    sleep(Duration::from_secs(120)).await;
    assert_eq!(api.calls().len(), 1);
    assert!(views.has_changed().is_err());
}

#[tokio::test(start_paused = true)]
async fn tick_timer_stops_with_provider() {
    let harness = Harness::new(MockApi::new(vec![]));

    harness.start();
    sleep(Duration::from_millis(10)).await;
    harness.provider.stop();
    let before = harness.provider.view();

    harness.clock.advance_slot(&ETHEREUM);
    sleep(Duration::from_secs(60)).await;

    assert_eq!(harness.provider.current_slot(), Slot::new(START_SLOT));
    assert!(Arc::ptr_eq(&before, &harness.provider.view()));
}

#[tokio::test(start_paused = true)]
async fn quick_restarts_leave_one_fetch_loop() {
    let harness = Harness::new(MockApi::new(
        (0..20).map(|_| Ok(epoch(&[99]))).collect(),
    ));

    for _ in 0..5 {
        harness.start();
        harness.provider.stop();
    }
    harness.start();

    sleep(Duration::from_millis(10)).await;
    assert_eq!(harness.api.calls().len(), 1);

    // One fetch per slot from here on.
    let slot_duration = ETHEREUM.slot_duration();
    sleep(slot_duration * 5 + slot_duration / 2).await;
    assert_eq!(harness.api.calls().len(), 6);
    assert!(harness.provider.is_running());
}

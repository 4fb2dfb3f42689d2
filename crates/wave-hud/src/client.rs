//! HUD client: snapshot ownership, bridge wiring and the poll loop
//!
//! The inbound update handler and the poll task share the client through an
//! `Arc`. Every merge and render happens under one lock, so a render always
//! reads a consistent snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::bridge::{HostBridge, NoopBridge, READY_EVENT, REQUEST_DATA_EVENT, UPDATE_DATA_EVENT};
use crate::config::HudConfig;
use crate::error::Result;
use crate::render::{self, HudRegion, RenderTarget};
use crate::snapshot::{HudSnapshot, HudUpdate};

struct HudState {
    snapshot: HudSnapshot,
    target: Box<dyn RenderTarget>,
}

/// The HUD client
pub struct HudClient {
    config: HudConfig,
    bridge: Arc<dyn HostBridge>,
    state: Mutex<HudState>,
    ready: AtomicBool,
}

impl HudClient {
    /// Client with no host attached
    pub fn new(config: HudConfig, target: impl RenderTarget + 'static) -> Arc<Self> {
        Self::with_bridge(config, Arc::new(NoopBridge), target)
    }

    /// Client talking to `bridge`
    pub fn with_bridge(
        config: HudConfig,
        bridge: Arc<dyn HostBridge>,
        target: impl RenderTarget + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            bridge,
            state: Mutex::new(HudState {
                snapshot: HudSnapshot::default(),
                target: Box::new(target),
            }),
            ready: AtomicBool::new(false),
        })
    }

    /// Register for host updates and start polling.
    ///
    /// Polling stops when the returned handle is dropped.
    pub fn start(self: &Arc<Self>) -> PollHandle {
        tracing::info!("[HUD] Initializing HUD system");
        self.attach();
        let handle = self.start_polling();
        tracing::info!("[HUD] HUD system initialized");
        handle
    }

    /// Register the `updateData` handler on the bridge
    pub fn attach(self: &Arc<Self>) {
        let client = Arc::downgrade(self);
        self.bridge.on_event(
            UPDATE_DATA_EVENT,
            Box::new(move |payload| {
                let Some(client) = client.upgrade() else {
                    return;
                };
                if let Err(e) = client.on_data_received(payload) {
                    tracing::warn!("[HUD] Dropped update: {e}");
                }
            }),
        );
    }

    /// Emit `requestData` on every poll tick, first tick one period from now
    pub fn start_polling(self: &Arc<Self>) -> PollHandle {
        let period = self.config.poll_interval();
        let client = Arc::downgrade(self);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match Weak::upgrade(&client) {
                    Some(client) => client.request_data(),
                    None => break,
                }
            }
        });

        PollHandle { task }
    }

    /// Ask the host for fresh data
    pub fn request_data(&self) {
        self.bridge.emit(REQUEST_DATA_EVENT, Value::Null);
    }

    /// Handle an `updateData` payload: merge, render, hide the loading
    /// indicator. A `null` payload is ignored; fields of the wrong type are
    /// skipped.
    pub fn on_data_received(&self, payload: Value) -> Result<()> {
        if payload.is_null() {
            return Ok(());
        }
        let update = HudUpdate::from_payload(payload)?;

        let mut state = self.lock();
        state.snapshot.merge_update(&update);
        let HudState { snapshot, target } = &mut *state;
        render::render(snapshot, &self.config, target.as_mut());
        target.set_loading(false);
        Ok(())
    }

    /// Merge `update` into the snapshot and render
    pub fn update(&self, update: &HudUpdate) {
        let mut state = self.lock();
        state.snapshot.merge_update(update);
        let HudState { snapshot, target } = &mut *state;
        render::render(snapshot, &self.config, target.as_mut());
    }

    /// Render the current snapshot
    pub fn render(&self) {
        let mut state = self.lock();
        let HudState { snapshot, target } = &mut *state;
        render::render(snapshot, &self.config, target.as_mut());
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> HudSnapshot {
        self.lock().snapshot.clone()
    }

    /// Page finished loading: announce readiness once, then render whatever
    /// the snapshot holds. Returns false if readiness was already announced.
    pub fn on_load(&self) -> bool {
        if self.ready.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.bridge.emit(READY_EVENT, Value::Null);
        tracing::info!("[HUD] Notified host that HUD is ready");
        self.render();
        true
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn show(&self) {
        self.set_regions_visible(true);
    }

    pub fn hide(&self) {
        self.set_regions_visible(false);
    }

    pub fn show_loading(&self) {
        self.lock().target.set_loading(true);
    }

    pub fn hide_loading(&self) {
        self.lock().target.set_loading(false);
    }

    fn set_regions_visible(&self, visible: bool) {
        let mut state = self.lock();
        for region in HudRegion::ALL {
            state.target.set_region_visible(region, visible);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HudState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Running poll loop; aborted on drop
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

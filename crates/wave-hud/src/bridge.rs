//! Message bridge between the HUD and its host application

use serde_json::Value;

/// Inbound: the host pushes a sparse stats update
pub const UPDATE_DATA_EVENT: &str = "wave_hud:updateData";
/// Outbound: ask the host for fresh stats
pub const REQUEST_DATA_EVENT: &str = "wave_hud:requestData";
/// Outbound: the HUD has loaded
pub const READY_EVENT: &str = "wave_hud:ready";

/// Callback invoked with the payload of an inbound event
pub type EventHandler = Box<dyn Fn(Value) + Send + Sync>;

/// The host's message-passing facility
pub trait HostBridge: Send + Sync {
    /// Register `handler` for inbound events named `name`
    fn on_event(&self, name: &str, handler: EventHandler);

    /// Send an event to the host. Delivery is fire-and-forget.
    fn emit(&self, name: &str, payload: Value);
}

/// Bridge used when no host is attached; every call is a no-op
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBridge;

impl HostBridge for NoopBridge {
    fn on_event(&self, name: &str, _handler: EventHandler) {
        tracing::trace!("No host bridge, ignoring handler for {name}");
    }

    fn emit(&self, _name: &str, _payload: Value) {}
}

//! Integration tests for the HUD client against a recording host bridge

use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wave_hud::bridge::{READY_EVENT, REQUEST_DATA_EVENT, UPDATE_DATA_EVENT};
use wave_hud::layout::{PULSE_ANIMATION, ids};
use wave_hud::testing::{RecordingBridge, RecordingTarget};
use wave_hud::{HudClient, HudConfig, HudLayout, HudRegion, HudSnapshot, NullTarget};

// =============================================================================
// Test Fixtures
// =============================================================================

struct Harness {
    bridge: Arc<RecordingBridge>,
    layout: Arc<Mutex<HudLayout>>,
    client: Arc<HudClient>,
}

fn harness() -> Harness {
    let bridge = Arc::new(RecordingBridge::new());
    let layout = Arc::new(Mutex::new(HudLayout::new()));
    let client = HudClient::with_bridge(HudConfig::default(), bridge.clone(), layout.clone());
    client.attach();
    Harness {
        bridge,
        layout,
        client,
    }
}

impl Harness {
    fn text(&self, id: &str) -> String {
        self.layout.lock().unwrap().text(id).unwrap_or_default().to_string()
    }

    fn style(&self, id: &str, property: &str) -> String {
        self.layout
            .lock()
            .unwrap()
            .element(id)
            .and_then(|e| e.style(property))
            .unwrap_or_default()
            .to_string()
    }
}

// =============================================================================
// Bridge-driven updates
// =============================================================================

mod update_tests {
    use super::*;

    #[test]
    fn test_update_event_renders_layout() {
        let h = harness();
        let delivered = h.bridge.deliver(
            UPDATE_DATA_EVENT,
            json!({
                "id": 7,
                "name": "Andrei",
                "bankMoney": 1234567,
                "cashMoney": 2500,
                "faction": "Police",
                "group": "admin",
                "health": 25,
                "armor": 30,
                "energy": 64.8
            }),
        );
        assert_eq!(delivered, 1);

        assert_eq!(h.text(ids::PLAYER_ID), "0007");
        assert_eq!(h.text(ids::PLAYER_NAME), "Andrei");
        assert_eq!(h.text(ids::BANK_MONEY), "$1,234,567");
        assert_eq!(h.text(ids::CASH_MONEY), "$2,500");
        assert_eq!(h.text(ids::FACTION_NAME), "Police");
        assert_eq!(h.text(ids::GROUP_NAME), "ADMIN");
        assert_eq!(h.text(ids::ENERGY_VALUE), "64");

        assert_eq!(h.style(ids::HEALTH_BAR, "animation"), PULSE_ANIMATION);
        assert_eq!(h.style(ids::HEALTH_BAR, "width"), "25%");
        assert_eq!(h.style(ids::ARMOR_BAR, "animation"), "none");
        assert_eq!(h.style(ids::ARMOR_BAR, "width"), "30%");
    }

    #[test]
    fn test_zero_values_do_not_clear_fields() {
        let h = harness();
        h.bridge.deliver(
            UPDATE_DATA_EVENT,
            json!({"bankMoney": 5000, "health": 80, "name": "Ana"}),
        );
        h.bridge.deliver(
            UPDATE_DATA_EVENT,
            json!({"bankMoney": 0, "health": 0, "name": ""}),
        );

        let snapshot = h.client.snapshot();
        assert_eq!(snapshot.bank_money, 5000);
        assert_eq!(snapshot.health, 80.0);
        assert_eq!(snapshot.player_name, "Ana");
        assert_eq!(h.text(ids::BANK_MONEY), "$5,000");
    }

    #[test]
    fn test_non_object_update_is_dropped() {
        let h = harness();
        h.bridge.deliver(UPDATE_DATA_EVENT, json!("a lot"));

        assert_eq!(h.client.snapshot(), HudSnapshot::default());
        assert_eq!(h.text(ids::BANK_MONEY), "");
    }

    #[test]
    fn test_mixed_update_applies_valid_fields() {
        let h = harness();
        h.bridge.deliver(
            UPDATE_DATA_EVENT,
            json!({"name": "Ana", "health": 40, "cashMoney": 10.5}),
        );

        let snapshot = h.client.snapshot();
        assert_eq!(snapshot.player_name, "Ana");
        assert_eq!(snapshot.health, 40.0);
        assert_eq!(snapshot.cash_money, 0);
        assert_eq!(h.text(ids::PLAYER_NAME), "Ana");
        assert_eq!(h.text(ids::HEALTH_VALUE), "40");
        assert_eq!(h.text(ids::CASH_MONEY), "$0");
    }

    #[test]
    fn test_update_hides_loading_indicator() {
        let h = harness();
        h.client.show_loading();
        assert!(
            h.layout
                .lock()
                .unwrap()
                .element(ids::LOADING_INDICATOR)
                .unwrap()
                .has_class("active")
        );

        h.bridge.deliver(UPDATE_DATA_EVENT, json!({"energy": 50}));
        assert!(
            !h.layout
                .lock()
                .unwrap()
                .element(ids::LOADING_INDICATOR)
                .unwrap()
                .has_class("active")
        );
    }

    #[test]
    fn test_handler_outliving_client_is_harmless() {
        let bridge = Arc::new(RecordingBridge::new());
        let client = HudClient::with_bridge(HudConfig::default(), bridge.clone(), NullTarget);
        client.attach();
        drop(client);

        assert_eq!(bridge.deliver(UPDATE_DATA_EVENT, json!({"id": 1})), 1);
    }
}

// =============================================================================
// Readiness and visibility
// =============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_ready_announced_once_then_initial_render() {
        let h = harness();
        assert!(h.client.on_load());
        assert!(!h.client.on_load());

        assert_eq!(h.bridge.emitted_count(READY_EVENT), 1);
        assert_eq!(h.text(ids::PLAYER_ID), "0000");
        assert_eq!(h.text(ids::PLAYER_NAME), "Unknown");
        assert_eq!(h.text(ids::GROUP_NAME), "USER");
        assert_eq!(h.text(ids::HEALTH_VALUE), "100");
    }

    #[test]
    fn test_ready_after_update_renders_latest_values() {
        let h = harness();
        h.bridge.deliver(UPDATE_DATA_EVENT, json!({"cashMoney": 42}));
        h.client.on_load();
        assert_eq!(h.text(ids::CASH_MONEY), "$42");
    }

    #[test]
    fn test_hide_and_show_regions() {
        let h = harness();
        h.client.hide();
        {
            let layout = h.layout.lock().unwrap();
            assert!(!layout.is_visible(HudRegion::TopRight));
            assert!(!layout.is_visible(HudRegion::BottomCenter));
        }

        h.client.show();
        let layout = h.layout.lock().unwrap();
        assert!(layout.is_visible(HudRegion::TopRight));
        assert!(layout.is_visible(HudRegion::BottomCenter));
    }
}

// =============================================================================
// Polling
// =============================================================================

mod polling_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_requests_data_every_interval() {
        let h = harness();
        let _poll = h.client.start_polling();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(h.bridge.emitted_count(REQUEST_DATA_EVENT), 0);

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(h.bridge.emitted_count(REQUEST_DATA_EVENT), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_are_not_coalesced_without_replies() {
        let h = harness();
        let _poll = h.client.start_polling();

        // The host never answers; the client keeps asking.
        tokio::time::sleep(Duration::from_millis(5_100)).await;
        assert_eq!(h.bridge.emitted_count(REQUEST_DATA_EVENT), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_interval() {
        let bridge = Arc::new(RecordingBridge::new());
        let config = HudConfig::from_toml("poll_interval_ms = 100").unwrap();
        let client = HudClient::with_bridge(config, bridge.clone(), RecordingTarget::default());
        let _poll = client.start_polling();

        tokio::time::sleep(Duration::from_millis(1_050)).await;
        assert_eq!(bridge.emitted_count(REQUEST_DATA_EVENT), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_polling() {
        let h = harness();
        let poll = h.client.start_polling();

        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(h.bridge.emitted_count(REQUEST_DATA_EVENT), 2);

        poll.stop();
        tokio::time::sleep(Duration::from_millis(2_000)).await;
        assert_eq!(h.bridge.emitted_count(REQUEST_DATA_EVENT), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_wires_updates_and_polling() {
        let bridge = Arc::new(RecordingBridge::new());
        let layout = Arc::new(Mutex::new(HudLayout::new()));
        let client = HudClient::with_bridge(HudConfig::default(), bridge.clone(), layout.clone());
        let poll = client.start();

        assert_eq!(bridge.handler_count(UPDATE_DATA_EVENT), 1);
        assert!(poll.is_running());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(bridge.emitted_count(REQUEST_DATA_EVENT), 1);

        bridge.deliver(UPDATE_DATA_EVENT, json!({"id": 42}));
        assert_eq!(layout.lock().unwrap().text(ids::PLAYER_ID), Some("0042"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_without_host_is_silent() {
        let client = HudClient::new(HudConfig::default(), NullTarget);
        let poll = client.start();

        tokio::time::sleep(Duration::from_millis(2_000)).await;
        assert!(poll.is_running());
    }
}

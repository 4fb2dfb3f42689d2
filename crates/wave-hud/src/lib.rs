//! Wave HUD - player stats heads-up display client
//!
//! Polls a host bridge for player stats, merges the sparse updates it receives
//! into a [`HudSnapshot`] and renders the snapshot through a [`RenderTarget`].
//! The host and the display are both traits so the client runs without any
//! host runtime attached.

pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod layout;
pub mod render;
pub mod snapshot;
pub mod testing;

pub use bridge::{HostBridge, NoopBridge};
pub use client::{HudClient, PollHandle};
pub use config::HudConfig;
pub use error::HudError;
pub use layout::HudLayout;
pub use render::{HudRegion, NullTarget, RenderTarget};
pub use snapshot::{HudSnapshot, HudUpdate};

//! Wave Radio - audio streaming proxy
//!
//! Accepts `GET /stream?url=...` requests, hands the source URL to an external
//! extraction tool and relays the tool's standard output to the client as an
//! audio stream.

pub mod config;
pub mod error;
pub mod proxy;
pub mod testing;

pub use error::RadioError;

//! Test utilities for wave-radio
//!
//! Stub extraction tools are shell one-liners run through `sh -c`, so no
//! executable files need to be written during tests.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ExtractorConfig;
use crate::proxy::{AppState, Extractor};

/// Extractor config that runs `script` with `sh -c`.
///
/// The per-request arguments are available to the script as `"$@"`.
pub fn sh_extractor(script: &str) -> ExtractorConfig {
    ExtractorConfig {
        program: PathBuf::from("sh"),
        leading_args: vec!["-c".to_string(), script.to_string(), "extractor".to_string()],
        ..ExtractorConfig::default()
    }
}

/// Application state whose extractor runs `script` with `sh -c`
pub fn sh_state(script: &str) -> Arc<AppState> {
    Arc::new(AppState {
        extractor: Extractor::new(sh_extractor(script)),
    })
}

//! Invocation of the external audio extraction tool

use std::ffi::OsString;
use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::config::ExtractorConfig;
use crate::error::{RadioError, Result};

use super::request::StreamRequest;

/// Builds and spawns the extraction tool for a stream request
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Arguments for one invocation: best audio, transcoded to the requested
    /// format, no playlist expansion, written to stdout.
    pub fn args(request: &StreamRequest) -> Vec<OsString> {
        [
            request.source_url.as_str(),
            "-o",
            "-",
            "-f",
            "bestaudio",
            "--extract-audio",
            "--audio-format",
            request.format.as_str(),
            "--no-playlist",
        ]
        .into_iter()
        .map(OsString::from)
        .collect()
    }

    /// Prepare the command with stdout and stderr piped
    pub fn command(&self, request: &StreamRequest) -> Command {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.leading_args)
            .args(Self::args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// Start the tool for `request`
    pub fn spawn(&self, request: &StreamRequest) -> Result<Child> {
        self.command(request).spawn().map_err(|e| {
            RadioError::Extractor(format!(
                "Failed to start {}: {e}",
                self.config.program.display()
            ))
        })
    }
}

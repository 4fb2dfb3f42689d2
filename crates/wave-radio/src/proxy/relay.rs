//! Per-request stream lifecycle and the stdout relay
//!
//! Every `/stream` request moves through `Validating -> Streaming -> Finished`.
//! The response body is fed by an mpsc channel whose only sender lives in the
//! [`StreamLifecycle`]; finishing drops that sender, which ends the body. A
//! second `finish` finds no sender and is a no-op, so the response is
//! finalized exactly once whichever event comes first.

use std::io;
use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

/// Buffered chunks between the relay task and the HTTP body
const CHANNEL_CAPACITY: usize = 16;

/// Byte stream handed to the response body
pub type AudioStream = ReceiverStream<io::Result<Bytes>>;

/// Where a request currently is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamPhase {
    /// Query parameters not yet accepted
    Validating,
    /// Extraction tool running, bytes flowing to the client
    Streaming,
    /// Response finalized
    Finished(FinishReason),
}

/// Why a stream was finalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    /// The request failed validation; no process was started
    Rejected,
    /// The extraction tool could not be started
    SpawnFailed,
    /// The tool closed its stdout; everything it wrote was relayed
    Completed,
    /// The client stopped reading; the tool was killed
    ClientDisconnected,
}

/// Explicit lifecycle state for one streaming request
#[derive(Debug)]
pub struct StreamLifecycle {
    id: Uuid,
    phase: StreamPhase,
    sender: Option<mpsc::Sender<io::Result<Bytes>>>,
}

impl StreamLifecycle {
    /// Create a lifecycle in the `Validating` phase along with the stream
    /// that will become the response body.
    pub fn new(id: Uuid) -> (Self, AudioStream) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let lifecycle = Self {
            id,
            phase: StreamPhase::Validating,
            sender: Some(tx),
        };
        (lifecycle, ReceiverStream::new(rx))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> &StreamPhase {
        &self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, StreamPhase::Finished(_))
    }

    /// Move from `Validating` to `Streaming`. Returns false from any other
    /// phase.
    pub fn begin_streaming(&mut self) -> bool {
        if self.phase != StreamPhase::Validating {
            return false;
        }
        self.phase = StreamPhase::Streaming;
        true
    }

    /// Send one chunk to the client.
    ///
    /// Returns false when the stream isn't in the `Streaming` phase or the
    /// client has gone away.
    pub async fn forward(&self, chunk: Bytes) -> bool {
        if self.phase != StreamPhase::Streaming {
            return false;
        }
        match &self.sender {
            Some(tx) => tx.send(Ok(chunk)).await.is_ok(),
            None => false,
        }
    }

    /// Resolves once the client side of the body has been dropped, or
    /// immediately when already finished.
    pub async fn client_gone(&self) {
        if let Some(tx) = &self.sender {
            tx.closed().await;
        }
    }

    /// Finalize the response. Only the first call has any effect; it returns
    /// true, every later call returns false.
    pub fn finish(&mut self, reason: FinishReason) -> bool {
        if self.is_finished() {
            tracing::trace!(stream_id = %self.id, ?reason, "Stream already finished");
            return false;
        }
        self.sender = None;
        self.phase = StreamPhase::Finished(reason);
        true
    }
}

enum RelayEnd {
    StdoutClosed,
    ClientGone,
}

/// Result of relaying one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Reason the response was finalized
    pub reason: FinishReason,
    /// Tool exit code; `None` when it was terminated by a signal or could not
    /// be reaped
    pub exit_code: Option<i32>,
}

/// Relay the child's stdout to the client until stdout closes or the client
/// disconnects, then finalize the lifecycle and reap the child.
///
/// The body ends as soon as stdout closes. A tool still running `exit_grace`
/// after that is killed. stderr is logged line by line and never reaches the
/// response.
pub async fn relay(
    mut lifecycle: StreamLifecycle,
    mut child: Child,
    chunk_bytes: usize,
    exit_grace: Duration,
) -> RelayOutcome {
    let id = lifecycle.id();
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(log_stderr(id, stderr));
    }

    let end = match child.stdout.take() {
        Some(stdout) => pump(&lifecycle, stdout, chunk_bytes.max(1)).await,
        None => RelayEnd::StdoutClosed,
    };

    let reason = match end {
        RelayEnd::StdoutClosed => FinishReason::Completed,
        RelayEnd::ClientGone => {
            tracing::info!(stream_id = %id, "Client disconnected, stopping extractor");
            if let Err(e) = child.start_kill() {
                tracing::warn!(stream_id = %id, "Failed to kill extractor: {e}");
            }
            FinishReason::ClientDisconnected
        }
    };
    lifecycle.finish(reason.clone());

    let exit_code = reap(id, &mut child, exit_grace).await;
    RelayOutcome { reason, exit_code }
}

/// Wait up to `grace` for the child to exit, killing it afterwards
async fn reap(id: Uuid, child: &mut Child, grace: Duration) -> Option<i32> {
    let status = match tokio::time::timeout(grace, child.wait()).await {
        Ok(status) => status,
        Err(_) => {
            tracing::warn!(stream_id = %id, "Extractor still running {grace:?} after closing stdout, killing it");
            if let Err(e) = child.start_kill() {
                tracing::warn!(stream_id = %id, "Failed to kill extractor: {e}");
            }
            child.wait().await
        }
    };

    match status {
        Ok(status) => {
            tracing::info!(stream_id = %id, "Extractor exited with code {:?}", status.code());
            status.code()
        }
        Err(e) => {
            tracing::error!(stream_id = %id, "Failed to wait for extractor: {e}");
            None
        }
    }
}

async fn pump<R>(lifecycle: &StreamLifecycle, mut stdout: R, chunk_bytes: usize) -> RelayEnd
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; chunk_bytes];
    let mut total: u64 = 0;

    loop {
        tokio::select! {
            read = stdout.read(&mut buf) => match read {
                Ok(0) => {
                    tracing::debug!(stream_id = %lifecycle.id(), bytes = total, "Extractor stdout closed");
                    return RelayEnd::StdoutClosed;
                }
                Ok(n) => {
                    total += n as u64;
                    if !lifecycle.forward(Bytes::copy_from_slice(&buf[..n])).await {
                        return RelayEnd::ClientGone;
                    }
                }
                Err(e) => {
                    tracing::warn!(stream_id = %lifecycle.id(), "Failed to read extractor stdout: {e}");
                    return RelayEnd::StdoutClosed;
                }
            },
            _ = lifecycle.client_gone() => return RelayEnd::ClientGone,
        }
    }
}

async fn log_stderr<R>(id: Uuid, stderr: R)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stderr).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                tracing::warn!(target: "wave_radio::extractor", stream_id = %id, "{line}")
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(stream_id = %id, "Stopped reading extractor stderr: {e}");
                break;
            }
        }
    }
}

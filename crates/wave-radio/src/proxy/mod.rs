mod error;
mod extractor;
mod relay;
mod request;
mod server;

pub use error::StreamError;
pub use extractor::Extractor;
pub use relay::{AudioStream, FinishReason, RelayOutcome, StreamLifecycle, StreamPhase, relay};
pub use request::StreamRequest;
pub use server::{AppState, ProxyServer, STATUS_MESSAGE, create_router};

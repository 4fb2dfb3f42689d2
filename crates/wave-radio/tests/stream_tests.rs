//! Integration tests for the `/stream` endpoint
//!
//! The extraction tool is replaced with `sh -c` scripts that write known
//! bytes to stdout.

#![cfg(unix)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use std::time::{Duration, Instant};
use tokio_stream::StreamExt;
use tower::ServiceExt;
use uuid::Uuid;

use wave_radio::config::ExtractorConfig;
use wave_radio::proxy::{
    AudioStream, Extractor, FinishReason, StreamLifecycle, StreamRequest, create_router, relay,
};
use wave_radio::testing::{sh_extractor, sh_state};

// =============================================================================
// Helpers
// =============================================================================

fn app(script: &str) -> Router {
    create_router(sh_state(script))
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect the whole body, failing the test if it doesn't finish in time
async fn body_bytes(response: Response) -> Vec<u8> {
    tokio::time::timeout(
        Duration::from_secs(10),
        axum::body::to_bytes(response.into_body(), usize::MAX),
    )
    .await
    .expect("response body did not terminate")
    .unwrap()
    .to_vec()
}

// =============================================================================
// Validation
// =============================================================================

mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_url_returns_400_without_spawning() {
        // The script would write to the body if it ever ran.
        let response = get(app("printf spawned"), "/stream?format=mp3").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_bytes(response).await, b"Missing url parameter");
    }

    #[tokio::test]
    async fn test_ftp_scheme_returns_400() {
        let response = get(app("printf spawned"), "/stream?url=ftp://example.com/a").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_bytes(response).await, b"Invalid protocol");
    }

    #[tokio::test]
    async fn test_garbage_url_returns_400() {
        let response = get(app("printf spawned"), "/stream?url=%3A%2F%2F").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_bytes(response).await, b"Invalid url");
    }
}

// =============================================================================
// Relay
// =============================================================================

mod relay_tests {
    use super::*;

    #[tokio::test]
    async fn test_stdout_is_relayed_exactly() {
        let response = get(
            app("printf 'ID3-audio-bytes'"),
            "/stream?url=https://example.com/a",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "audio/mpeg"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-cache"
        );
        assert_eq!(body_bytes(response).await, b"ID3-audio-bytes");
    }

    #[tokio::test]
    async fn test_large_output_spans_many_chunks() {
        let response = get(
            app("yes wave | head -c 200000"),
            "/stream?url=https://example.com/a",
        )
        .await;

        let expected: Vec<u8> = b"wave\n".iter().copied().cycle().take(200_000).collect();
        let body = body_bytes(response).await;
        assert_eq!(body.len(), 200_000);
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_nonzero_exit_keeps_partial_bytes_and_terminates() {
        let response = get(
            app("printf partial; exit 3"),
            "/stream?url=https://example.com/a",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"partial");
    }

    #[tokio::test]
    async fn test_empty_output_gives_empty_body() {
        let response = get(app("exit 1"), "/stream?url=https://example.com/a").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_stderr_is_not_mixed_into_body() {
        let response = get(
            app("echo 'ERROR: unsupported site' >&2; printf ok"),
            "/stream?url=https://example.com/a",
        )
        .await;

        assert_eq!(body_bytes(response).await, b"ok");
    }

    #[tokio::test]
    async fn test_tool_receives_expected_arguments() {
        let response = get(
            app("printf '%s\\n' \"$@\""),
            "/stream?url=https%3A%2F%2Fexample.com%2Fwatch%3Fv%3D1&format=opus",
        )
        .await;

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        let args: Vec<&str> = body.lines().collect();
        assert_eq!(
            args,
            vec![
                "https://example.com/watch?v=1",
                "-o",
                "-",
                "-f",
                "bestaudio",
                "--extract-audio",
                "--audio-format",
                "opus",
                "--no-playlist",
            ]
        );
    }

    #[tokio::test]
    async fn test_format_defaults_to_mp3() {
        let response = get(
            app("printf '%s\\n' \"$@\""),
            "/stream?url=https://example.com/a",
        )
        .await;

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(body.lines().any(|line| line == "mp3"));
    }

    #[tokio::test]
    async fn test_concurrent_streams_are_independent() {
        let router = app("printf '%s' \"$1\"");

        let first = get(router.clone(), "/stream?url=https://one.example/");
        let second = get(router, "/stream?url=https://two.example/");
        let (first, second) = tokio::join!(first, second);

        assert_eq!(body_bytes(first).await, b"https://one.example/");
        assert_eq!(body_bytes(second).await, b"https://two.example/");
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

mod lifecycle_tests {
    use super::*;

    fn request() -> StreamRequest {
        StreamRequest::new(Some("https://example.com/a"), None, "mp3").unwrap()
    }

    fn spawn_streaming(
        config: ExtractorConfig,
    ) -> (StreamLifecycle, AudioStream, tokio::process::Child) {
        let extractor = Extractor::new(config);
        let (mut lifecycle, stream) = StreamLifecycle::new(Uuid::new_v4());
        lifecycle.begin_streaming();
        let child = extractor.spawn(&request()).unwrap();
        (lifecycle, stream, child)
    }

    fn collect(stream: AudioStream) -> tokio::task::JoinHandle<Vec<u8>> {
        tokio::spawn(async move {
            stream
                .map(|chunk| chunk.unwrap().to_vec())
                .collect::<Vec<_>>()
                .await
                .concat()
        })
    }

    #[tokio::test]
    async fn test_relay_reports_exit_code() {
        let (lifecycle, stream, child) = spawn_streaming(sh_extractor("printf abc; exit 7"));
        let consumer = collect(stream);

        let outcome = relay(lifecycle, child, 4, Duration::from_secs(5)).await;
        assert_eq!(outcome.reason, FinishReason::Completed);
        assert_eq!(outcome.exit_code, Some(7));
        assert_eq!(consumer.await.unwrap(), b"abc");
    }

    #[tokio::test]
    async fn test_client_disconnect_kills_tool() {
        let (lifecycle, stream, child) =
            spawn_streaming(sh_extractor("while :; do printf x; sleep 0.05; done"));
        drop(stream);

        let outcome = tokio::time::timeout(
            Duration::from_secs(10),
            relay(lifecycle, child, 1024, Duration::from_secs(5)),
        )
        .await
        .expect("relay did not stop after the client went away");
        assert_eq!(outcome.reason, FinishReason::ClientDisconnected);
        assert_eq!(outcome.exit_code, None);
    }

    #[tokio::test]
    async fn test_body_ends_when_stdout_closes() {
        let response = get(
            app("printf abc; exec >&-; sleep 3"),
            "/stream?url=https://example.com/a",
        )
        .await;

        let started = Instant::now();
        assert_eq!(body_bytes(response).await, b"abc");
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "body waited for the tool to exit: {:?}",
            started.elapsed()
        );
    }

    #[tokio::test]
    async fn test_tool_lingering_after_stdout_closes_is_killed() {
        let config = ExtractorConfig {
            exit_grace_ms: 100,
            ..sh_extractor("printf abc; exec >&-; sleep 30")
        };
        let grace = config.exit_grace();
        let (lifecycle, stream, child) = spawn_streaming(config);
        let consumer = collect(stream);

        let outcome = tokio::time::timeout(
            Duration::from_secs(10),
            relay(lifecycle, child, 1024, grace),
        )
        .await
        .expect("lingering tool was not killed");
        assert_eq!(outcome.reason, FinishReason::Completed);
        assert_eq!(outcome.exit_code, None);
        assert_eq!(consumer.await.unwrap(), b"abc");
    }
}

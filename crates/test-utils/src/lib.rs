pub mod builders;
pub mod files;

use std::sync::Once;
use std::time::Duration;

use pollwatch::FileChangeEvent;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// Uses `with_test_writer()`, so output is only shown for failing tests
/// (unless run with `-- --nocapture`). Enable levels with e.g.
/// `RUST_LOG=pollwatch=debug cargo test`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Receive the next event, failing the test after 5 seconds or if the
/// channel closed.
pub async fn next_event(rx: &mut mpsc::Receiver<FileChangeEvent>) -> FileChangeEvent {
    with_timeout(rx.recv())
        .await
        .expect("event channel closed unexpectedly")
}

/// Assert that no event arrives within `window`.
pub async fn assert_quiet(rx: &mut mpsc::Receiver<FileChangeEvent>, window: Duration) {
    if let Ok(Some(event)) = tokio::time::timeout(window, rx.recv()).await {
        panic!("expected no event, got {event}");
    }
}

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use assetpipe::task::TaskAction;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
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

/// Shared event log recording `start:<name>` / `end:<name>` markers.
pub type ActionLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> ActionLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &ActionLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Index of the first occurrence of `event` in the log.
pub fn index_of(events: &[String], event: &str) -> usize {
    events
        .iter()
        .position(|e| e == event)
        .unwrap_or_else(|| panic!("event '{event}' not found in {events:?}"))
}

/// Count of occurrences of `event` in the log.
pub fn count_of(events: &[String], event: &str) -> usize {
    events.iter().filter(|e| *e == event).count()
}

/// An action that records start/end markers around a short sleep and
/// succeeds.
pub fn recording(log: &ActionLog, name: &'static str) -> impl TaskAction + use<> {
    let log = Arc::clone(log);
    move || {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push(format!("start:{name}"));
            tokio::time::sleep(Duration::from_millis(20)).await;
            log.lock().unwrap().push(format!("end:{name}"));
            anyhow::Ok(())
        }
    }
}

/// An action that records start/end markers and then fails.
pub fn failing(log: &ActionLog, name: &'static str) -> impl TaskAction + use<> {
    let log = Arc::clone(log);
    move || {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push(format!("start:{name}"));
            tokio::time::sleep(Duration::from_millis(20)).await;
            log.lock().unwrap().push(format!("end:{name}"));
            Err(anyhow::anyhow!("synthetic failure from {name}"))
        }
    }
}

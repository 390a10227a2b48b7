pub mod builders;
pub mod fake_runner;

use std::sync::Once;
use std::time::Duration;

use faas_stacks::config::Settings;
use tracing_subscriber::{EnvFilter, fmt};

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
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Default settings with the waiting taken out: a 1ms poll interval, no
/// settle delays and no kubeconfigs, so command lines stay short.
pub fn fast_settings() -> Settings {
    let mut settings = Settings::default();
    settings.polling.interval = Duration::from_millis(1);
    settings.runner.echo_output = false;

    for platform in [
        &mut settings.fission.platform,
        &mut settings.knative,
        &mut settings.kubeless,
        &mut settings.openfaas.platform,
    ] {
        platform.kubeconfig = None;
        platform.settle = Duration::ZERO;
    }

    settings
}

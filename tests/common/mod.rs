use tracing_subscriber::{fmt, EnvFilter};

/// Route crate logs to the test harness. Filter with `RUST_LOG=wobble=trace`.
pub fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

use std::env;

use tracing_subscriber::FmtSubscriber;

/// Initialize a logger for the test environment honoring `RUST_LOG`
pub fn init_logger() {
    if let Some(level) = env::var("RUST_LOG").ok().map(|x| x.parse().ok()) {
        let subscriber =
            FmtSubscriber::builder().with_max_level(level).finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

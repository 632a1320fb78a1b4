use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Set to `1` to emit JSON log lines instead of human-readable ones.
pub const JSON_LOG_ENV: &str = "BIPV_LOG_JSON";

/// Install the global subscriber. `RUST_LOG` overrides the default `info`
/// filter. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json = std::env::var(JSON_LOG_ENV).is_ok_and(|value| value == "1");

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
}

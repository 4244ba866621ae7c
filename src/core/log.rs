use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, fmt::format::FmtSpan,
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

const APP_TARGET: &str = "roundup";

/// Verbose runs show our own events, including run state changes, plus
/// request-level events from the HTTP client used by the live backend.
fn app_filter(verbose: bool) -> Targets {
    if verbose {
        Targets::new()
            .with_target(APP_TARGET, LevelFilter::DEBUG)
            .with_target("reqwest", LevelFilter::INFO)
    } else {
        Targets::new().with_target(APP_TARGET, LevelFilter::OFF)
    }
}

pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "off" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Closing a gateway span reports how long the bank call took.
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_span_events(FmtSpan::CLOSE),
        )
        .with(app_filter(verbose))
        .with(env_filter)
        .init();
}

use tracing_subscriber::EnvFilter;
use crate::core::domain::Configuration;

const DEFAULT_FILTER: &str = "info";

pub(crate) fn setup_tracing(config: &Configuration) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        // disable printing the name of the module in every log line.
        .with_target(false)
        .with_ansi(false);
    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::AppEnvironment;

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(environment: AppEnvironment) -> &'static str {
    match environment {
        AppEnvironment::Production => "account_service=info,auth=info,tower_http=info",
        AppEnvironment::Test => "warn",
        AppEnvironment::Development => "account_service=debug,auth=debug,tower_http=debug",
    }
}

/// Install the global subscriber. Production logs are JSON lines.
pub fn init(environment: AppEnvironment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(environment).into());

    let registry = tracing_subscriber::registry().with(filter);

    match environment {
        AppEnvironment::Production => registry.with(fmt::layer().json()).init(),
        AppEnvironment::Test => registry.with(fmt::layer().with_ansi(false)).init(),
        AppEnvironment::Development => registry.with(fmt::layer()).init(),
    }
}

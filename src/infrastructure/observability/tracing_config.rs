use crate::presentation::config::Environment;

pub const DEFAULT_LOG_FILTER: &str = "info,parchment=debug,tower_http=debug";

/// Configuration for tracing initialization. `RUST_LOG` overrides the filter,
/// `LOG_FORMAT=json` switches to JSON lines.
pub struct TracingConfig {
    pub environment: Environment,
    pub json_format: bool,
    pub default_filter: String,
}

impl TracingConfig {
    pub fn from_env(environment: Environment) -> Self {
        Self {
            environment,
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            default_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::from_env(Environment::Local)
    }
}
